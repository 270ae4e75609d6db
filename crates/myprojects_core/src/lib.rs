//! Persistence and validation core for portfolio projects.
//! This crate owns the `Project` field rules and its data access over a
//! document collection.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError, ConfigResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{Project, ProjectId, STATUS_COMPLETED, STATUS_IN_PROGRESS};
pub use model::validation::{FieldError, ValidationErrors, ValidationSink};
pub use repo::observer::{LogObserver, RepoObserver, RepoOperation};
pub use repo::project_repo::{
    parse_project_id, ProjectRepository, ProjectScan, RepoError, RepoResult, PROJECTS_COLLECTION,
};
pub use service::project_service::ProjectService;
pub use store::{DocumentCollection, DocumentId, RawDocument, SqliteCollection, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
