// Command dispatch - wires settings, client and services together
use crate::application::backup_service::BackupService;
use crate::application::grafana_repository::GrafanaRepository;
use crate::application::restore_service::RestoreService;
use crate::presentation::cli::{BackupCommand, Command, RestoreCommand};
use std::sync::Arc;

pub async fn run(command: Command, repository: Arc<dyn GrafanaRepository>) -> anyhow::Result<()> {
    match command {
        Command::Backup(BackupCommand::Dashboards(args)) => {
            let report = BackupService::new(repository).backup_dashboards(&args.target).await?;
            tracing::info!("Dashboard backup finished: {}", report);
        }
        Command::Backup(BackupCommand::Datasources(args)) => {
            let report = BackupService::new(repository).backup_datasources(&args.target).await?;
            tracing::info!("Datasource backup finished: {}", report);
        }
        Command::Restore(RestoreCommand::Dashboards(args)) => {
            let report = RestoreService::new(repository).restore_dashboards(&args.source).await?;
            tracing::info!("Dashboard restore finished: {}", report);
        }
        Command::Restore(RestoreCommand::Datasources(args)) => {
            let report = RestoreService::new(repository)
                .restore_datasources(&args.restore.source, args.force)
                .await?;
            tracing::info!("Datasource restore finished: {}", report);
        }
    }

    Ok(())
}
