//! Core domain logic for Composify.
//! Projects hold ordered sections; sections hold recordings.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{init_logging, logging_status, LogLevel, LogSettings, LoggingError};
pub use model::project::{Project, ProjectId};
pub use model::recording::{Recording, RecordingId};
pub use model::section::{Section, SectionId};
pub use model::ValidationError;
pub use ordering::{ChildAccessor, ChildIndexManager, IndexError, OrderedChild, PersistenceGateway};
pub use repo::preference_repo::{PreferenceRepository, SqlitePreferenceRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::recording_repo::{RecordingRepository, SqliteRecordingRepository};
pub use repo::section_repo::{SectionRepository, SqliteSectionRepository};
pub use repo::{RepoError, RepoResult};
pub use service::project_service::ProjectService;
pub use service::recording_service::RecordingService;
pub use service::section_service::SectionService;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for host wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
