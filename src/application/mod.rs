// Application layer - Backup and restore use cases
pub mod backup_service;
pub mod folder_resolver;
pub mod grafana_repository;
pub mod report;
pub mod restore_service;

#[cfg(test)]
pub mod fake_grafana;
