// Restore service - Push local dashboard and datasource files to the server
use crate::application::folder_resolver::FolderResolver;
use crate::application::grafana_repository::{ApiError, GrafanaRepository, StatusMessage};
use crate::application::report::RestoreReport;
use crate::domain::dashboard::prepare_for_import;
use crate::domain::datasource::Datasource;
use crate::domain::folder::Folder;
use crate::infrastructure::files::{is_json_file, read_json};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

#[derive(Clone)]
pub struct RestoreService {
    repository: Arc<dyn GrafanaRepository>,
    folders: FolderResolver,
}

impl RestoreService {
    pub fn new(repository: Arc<dyn GrafanaRepository>) -> Self {
        let folders = FolderResolver::new(repository.clone());
        Self { repository, folders }
    }

    /// Import every `*.json` below `source` into the folder named by its
    /// parent directory
    pub async fn restore_dashboards(&self, source: &Path) -> anyhow::Result<RestoreReport> {
        let root = std::path::absolute(source)
            .with_context(|| format!("Failed to resolve {}", source.display()))?;
        anyhow::ensure!(root.is_dir(), "Source directory {} does not exist", root.display());

        let mut report = RestoreReport::default();

        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Warning: Skipping unreadable entry: {}", e);
                    report.failed += 1;
                    continue;
                }
            };
            let candidate = entry.path();

            if entry.file_type().is_dir() {
                tracing::debug!("Skipping directory {}", candidate.display());
                continue;
            }

            if !is_json_file(candidate) {
                tracing::debug!("Skipping non-JSON file {}", candidate.display());
                report.skipped += 1;
                continue;
            }

            let relative = candidate.strip_prefix(&root).unwrap_or(candidate);
            let folder_name = Folder::name_for_relative_path(relative);

            match self.restore_dashboard(candidate, &folder_name).await {
                Ok(()) => report.restored += 1,
                Err(e) => {
                    tracing::warn!("Warning: Skipping import of {}: {}", candidate.display(), e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    async fn restore_dashboard(&self, candidate: &Path, folder_name: &str) -> anyhow::Result<()> {
        tracing::info!("Importing {} into folder {}", candidate.display(), folder_name);

        let body = read_json(candidate).context("could not be read")?;
        let folder = self
            .folders
            .resolve(folder_name)
            .await
            .with_context(|| format!("could not resolve folder {}", folder_name))?;

        let status = self
            .repository
            .import_dashboard(prepare_for_import(body), folder.id, true)
            .await?;

        tracing::info!("{} (uid={}, version={})", status.status, status.uid, status.version);
        Ok(())
    }

    /// Create or update a datasource for every `*.json` directly inside
    /// `source`. With `force`, a datasource that exists under the same name
    /// but a different ID is overwritten.
    pub async fn restore_datasources(&self, source: &Path, force: bool) -> anyhow::Result<RestoreReport> {
        let entries = std::fs::read_dir(source)
            .with_context(|| format!("Failed to read {}", source.display()))?
            .map(|entry| entry.map(|e| e.path()));

        let mut report = RestoreReport::default();
        let files = readable_paths(entries, &mut report);

        for file_name in &files {
            if file_name.is_dir() || !is_json_file(file_name) {
                tracing::debug!("Skipping {}", file_name.display());
                report.skipped += 1;
                continue;
            }

            tracing::info!("Importing {} ...", file_name.display());

            let datasource = match read_json(file_name)
                .and_then(|value| serde_json::from_value::<Datasource>(value).map_err(Into::into))
            {
                Ok(datasource) => datasource,
                Err(e) => {
                    tracing::warn!("Warning: Skipping {} because it could not be parsed: {}", file_name.display(), e);
                    report.failed += 1;
                    continue;
                }
            };

            match self.upsert_datasource(&datasource, force).await {
                Ok(Some(status)) => {
                    tracing::info!("{} (id={})", status.message, status.id.unwrap_or(datasource.id));
                    report.restored += 1;
                }
                Ok(None) => {
                    tracing::warn!(
                        "Warning: Skipping {} (read from {}): a datasource with this name already exists. Consider using --force.",
                        datasource.name,
                        file_name.display()
                    );
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Warning: Skipping {} (read from {}): {:#}",
                        datasource.name,
                        file_name.display(),
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// `Ok(None)` means a name conflict was left alone
    async fn upsert_datasource(
        &self,
        datasource: &Datasource,
        force: bool,
    ) -> anyhow::Result<Option<StatusMessage>> {
        match self.repository.get_datasource(datasource.id).await {
            Ok(_) => {
                tracing::info!(
                    "Datasource {} already exists (id={}); updating...",
                    datasource.name,
                    datasource.id
                );
                let status = self
                    .repository
                    .update_datasource(datasource)
                    .await
                    .context("could not be updated")?;
                Ok(Some(status))
            }
            Err(ApiError::NotFound) => {
                tracing::info!("Creating new datasource {} (id={})", datasource.name, datasource.id);
                match self.repository.create_datasource(datasource).await {
                    Ok(status) => Ok(Some(status)),
                    Err(ApiError::AlreadyExists(_)) if force => self.overwrite_by_name(datasource).await.map(Some),
                    Err(ApiError::AlreadyExists(_)) => Ok(None),
                    Err(e) => Err(anyhow::Error::new(e).context("could not be created")),
                }
            }
            Err(e) => Err(anyhow::Error::new(e).context("could not check whether it already exists")),
        }
    }

    async fn overwrite_by_name(&self, datasource: &Datasource) -> anyhow::Result<StatusMessage> {
        let existing = self
            .repository
            .get_datasource_by_name(&datasource.name)
            .await
            .context("could not look up the existing datasource")?;

        tracing::info!(
            "Overwriting datasource {} (id={}) with id={} from backup",
            datasource.name,
            existing.id,
            datasource.id
        );

        let mut replacement = datasource.clone();
        replacement.id = existing.id;
        self.repository
            .update_datasource(&replacement)
            .await
            .context("could not be overwritten")
    }
}

/// Sorted paths of the readable entries; unreadable ones are logged and
/// counted as failed
fn readable_paths<I>(entries: I, report: &mut RestoreReport) -> Vec<PathBuf>
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => {
                tracing::warn!("Warning: Skipping unreadable entry: {}", e);
                report.failed += 1;
            }
        }
    }
    files.sort();
    files
}
