// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod files;
pub mod grafana_client;
pub mod logging;
