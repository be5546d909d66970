// Grafana HTTP API client
use crate::application::grafana_repository::{ApiError, GrafanaRepository, ImportStatus, StatusMessage};
use crate::domain::dashboard::{Dashboard, DashboardHit, DashboardMeta};
use crate::domain::datasource::Datasource;
use crate::domain::folder::Folder;
use crate::infrastructure::config::Settings;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

/// Page size for search and folder listings
const PAGE_SIZE: usize = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GrafanaClient {
    host: String,
    token: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DashboardEnvelope {
    dashboard: Value,
    #[serde(default)]
    meta: DashboardMeta,
}

#[derive(Debug, Serialize)]
struct ImportRequest {
    dashboard: Value,
    #[serde(rename = "folderId")]
    folder_id: i64,
    overwrite: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GrafanaClient {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let host = settings.api_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&host).with_context(|| format!("Invalid Grafana API URL {}", settings.api_url))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            host,
            token: settings.api_token.clone(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = check_status(request.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!("GET {}", path);
        self.execute(self.request(Method::GET, path)).await
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!("{} {}", method, path);
        self.execute(self.request(method, path).json(body)).await
    }

    async fn get_paged<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        collect_pages(path, PAGE_SIZE, |page_path| async move { self.get::<Vec<T>>(&page_path).await }).await
    }
}

/// Fetch `path` page by page until a short page comes back
async fn collect_pages<T, F, Fut>(path: &str, page_size: usize, mut fetch: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let separator = if path.contains('?') { '&' } else { '?' };
    let mut items = Vec::new();

    for page in 1.. {
        let batch = fetch(format!("{}{}limit={}&page={}", path, separator, page_size, page)).await?;
        let done = batch.len() < page_size;
        items.extend(batch);
        if done {
            break;
        }
    }

    Ok(items)
}

fn dashboard_path(uid: &str) -> String {
    format!("/api/dashboards/uid/{}", urlencoding::encode(uid))
}

fn datasource_by_name_path(name: &str) -> String {
    format!("/api/datasources/name/{}", urlencoding::encode(name))
}

/// Map non-success responses onto the error kinds callers branch on
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, body))
}

fn error_for_status(status: StatusCode, body: String) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::CONFLICT => {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(body);
            ApiError::AlreadyExists(message)
        }
        _ => ApiError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl GrafanaRepository for GrafanaClient {
    async fn search_dashboards(&self) -> Result<Vec<DashboardHit>, ApiError> {
        self.get_paged("/api/search?type=dash-db").await
    }

    async fn get_dashboard(&self, uid: &str) -> Result<Dashboard, ApiError> {
        let envelope: DashboardEnvelope = self
            .get(&dashboard_path(uid))
            .await?;
        Ok(Dashboard::new(envelope.dashboard, envelope.meta))
    }

    async fn import_dashboard(
        &self,
        body: Value,
        folder_id: i64,
        overwrite: bool,
    ) -> Result<ImportStatus, ApiError> {
        let request = ImportRequest {
            dashboard: body,
            folder_id,
            overwrite,
        };
        self.send(Method::POST, "/api/dashboards/db", &request).await
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, ApiError> {
        self.get_paged("/api/folders").await
    }

    async fn create_folder(&self, title: &str) -> Result<Folder, ApiError> {
        self.send(Method::POST, "/api/folders", &json!({ "title": title })).await
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>, ApiError> {
        self.get("/api/datasources").await
    }

    async fn get_datasource(&self, id: i64) -> Result<Datasource, ApiError> {
        self.get(&format!("/api/datasources/{}", id)).await
    }

    async fn get_datasource_by_name(&self, name: &str) -> Result<Datasource, ApiError> {
        self.get(&datasource_by_name_path(name)).await
    }

    async fn create_datasource(&self, datasource: &Datasource) -> Result<StatusMessage, ApiError> {
        self.send(Method::POST, "/api/datasources", datasource).await
    }

    async fn update_datasource(&self, datasource: &Datasource) -> Result<StatusMessage, ApiError> {
        self.send(
            Method::PUT,
            &format!("/api/datasources/{}", datasource.id),
            datasource,
        )
        .await
    }
}
