// Domain layer - Grafana entities and on-disk naming rules
pub mod dashboard;
pub mod datasource;
pub mod folder;
