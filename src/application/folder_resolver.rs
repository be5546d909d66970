// Folder resolution - find a remote folder by title or create it
use crate::application::grafana_repository::{ApiError, GrafanaRepository};
use crate::domain::folder::Folder;
use std::sync::Arc;

#[derive(Clone)]
pub struct FolderResolver {
    repository: Arc<dyn GrafanaRepository>,
}

impl FolderResolver {
    pub fn new(repository: Arc<dyn GrafanaRepository>) -> Self {
        Self { repository }
    }

    /// "General" maps to the built-in folder without touching the API.
    pub async fn resolve(&self, name: &str) -> Result<Folder, ApiError> {
        if Folder::is_general_title(name) {
            return Ok(Folder::general());
        }

        let folders = self.repository.list_folders().await?;
        if let Some(folder) = folders.into_iter().find(|f| f.title == name) {
            return Ok(folder);
        }

        tracing::info!("Creating folder {}", name);
        self.repository.create_folder(name).await
    }
}
