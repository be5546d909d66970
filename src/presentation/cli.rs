// Command line definition
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "grafana-backup-restore")]
#[command(about = "Simple backup and restore of Grafana")]
pub struct Cli {
    /// Verbose output
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Backup Grafana items
    #[command(subcommand)]
    Backup(BackupCommand),
    /// Restore Grafana items
    #[command(subcommand)]
    Restore(RestoreCommand),
}

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// Backup all dashboards
    Dashboards(BackupArgs),
    /// Backup all datasources
    Datasources(BackupArgs),
}

#[derive(Debug, Subcommand)]
pub enum RestoreCommand {
    /// Restore all dashboards
    Dashboards(RestoreArgs),
    /// Restore all datasources
    Datasources(RestoreDatasourcesArgs),
}

#[derive(Debug, Args)]
pub struct ApiArgs {
    /// Grafana API URL
    #[arg(short = 'U', long)]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Target directory to write to. Defaults to the current working directory.
    #[arg(short = 'T', long, default_value = ".")]
    pub target: PathBuf,
}

#[derive(Debug, Args)]
pub struct RestoreArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Source directory to read from. Defaults to the current working directory.
    #[arg(short = 'S', long, default_value = ".")]
    pub source: PathBuf,
}

#[derive(Debug, Args)]
pub struct RestoreDatasourcesArgs {
    #[command(flatten)]
    pub restore: RestoreArgs,

    /// Overwrite datasources that already exist under the same name
    #[arg(long)]
    pub force: bool,
}

impl Command {
    pub fn api_url(&self) -> &str {
        match self {
            Command::Backup(BackupCommand::Dashboards(args) | BackupCommand::Datasources(args)) => &args.api.url,
            Command::Restore(RestoreCommand::Dashboards(args)) => &args.api.url,
            Command::Restore(RestoreCommand::Datasources(args)) => &args.restore.api.url,
        }
    }
}
