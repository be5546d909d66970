// Backup service - Copy remote dashboards and datasources to local files
use crate::application::grafana_repository::GrafanaRepository;
use crate::application::report::BackupReport;
use crate::infrastructure::files::{ensure_dir, write_json};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct BackupService {
    repository: Arc<dyn GrafanaRepository>,
}

impl BackupService {
    pub fn new(repository: Arc<dyn GrafanaRepository>) -> Self {
        Self { repository }
    }

    /// Write every dashboard to `<target>/<folder>/<slug>.json`
    pub async fn backup_dashboards(&self, target: &Path) -> anyhow::Result<BackupReport> {
        ensure_dir(target)
            .with_context(|| format!("Failed to create dashboard backup folder {}", target.display()))?;

        let hits = self
            .repository
            .search_dashboards()
            .await
            .context("Failed to list dashboards")?;

        let mut report = BackupReport::default();

        for hit in &hits {
            let dashboard = match self.repository.get_dashboard(&hit.uid).await {
                Ok(dashboard) => dashboard,
                Err(e) => {
                    tracing::warn!("Error: {} for {}", e, hit.uri);
                    report.failed += 1;
                    continue;
                }
            };

            let file_name = target.join(dashboard.relative_path(hit));
            if let Some(directory) = file_name.parent() {
                if let Err(e) = ensure_dir(directory) {
                    tracing::warn!("Error creating dashboard backup folder {}: {}", directory.display(), e);
                    report.failed += 1;
                    continue;
                }
            }

            tracing::info!(
                "Writing dashboard '{}/{}' (folder id {}) to {}",
                dashboard.folder_title(hit),
                hit.title,
                dashboard.meta.folder_id,
                file_name.display()
            );

            match write_json(&file_name, &dashboard.body) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    tracing::warn!("Error writing {}: {}", file_name.display(), e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Write every datasource to `<target>/<name>.json`
    pub async fn backup_datasources(&self, target: &Path) -> anyhow::Result<BackupReport> {
        ensure_dir(target)
            .with_context(|| format!("Failed to create datasource backup folder {}", target.display()))?;

        let datasources = self
            .repository
            .list_datasources()
            .await
            .context("Failed to list datasources")?;

        let mut report = BackupReport::default();

        for datasource in &datasources {
            let file_name = target.join(datasource.file_name());
            tracing::info!("Writing datasource '{}' to {}", datasource.name, file_name.display());

            match write_json(&file_name, datasource) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    tracing::warn!("Error writing {}: {}", file_name.display(), e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
