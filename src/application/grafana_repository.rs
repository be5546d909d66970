// Repository trait for Grafana API access
use crate::domain::dashboard::{Dashboard, DashboardHit};
use crate::domain::datasource::Datasource;
use crate::domain::folder::Folder;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of a dashboard import
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportStatus {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: i64,
}

/// Generic `{"message": ...}` reply from mutating endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: String,
}

#[async_trait]
pub trait GrafanaRepository: Send + Sync {
    /// List every dashboard visible to the token
    async fn search_dashboards(&self) -> Result<Vec<DashboardHit>, ApiError>;

    /// Fetch a dashboard body and its metadata
    async fn get_dashboard(&self, uid: &str) -> Result<Dashboard, ApiError>;

    /// Save a dashboard body into a folder
    async fn import_dashboard(
        &self,
        body: Value,
        folder_id: i64,
        overwrite: bool,
    ) -> Result<ImportStatus, ApiError>;

    async fn list_folders(&self) -> Result<Vec<Folder>, ApiError>;

    async fn create_folder(&self, title: &str) -> Result<Folder, ApiError>;

    async fn list_datasources(&self) -> Result<Vec<Datasource>, ApiError>;

    async fn get_datasource(&self, id: i64) -> Result<Datasource, ApiError>;

    async fn get_datasource_by_name(&self, name: &str) -> Result<Datasource, ApiError>;

    async fn create_datasource(&self, datasource: &Datasource) -> Result<StatusMessage, ApiError>;

    /// Replace the datasource stored under `datasource.id`
    async fn update_datasource(&self, datasource: &Datasource) -> Result<StatusMessage, ApiError>;
}
