//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Validate caller input and parent existence above the repository layer.
//! - Route every structural section change through the index manager.
//! - Keep callers (CLI, tests, future UI bindings) away from storage details.

pub mod project_service;
pub mod recording_service;
pub mod section_service;

use crate::model::project::ProjectId;
use crate::model::recording::RecordingId;
use crate::model::section::SectionId;
use crate::model::ValidationError;
use crate::ordering::IndexError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from use-case services.
#[derive(Debug)]
pub enum ServiceError {
    /// Title is blank after trimming.
    InvalidTitle,
    /// Another recording of the same section already carries this title.
    DuplicateTitle(String),
    /// File extension cannot name an audio file.
    InvalidFileExtension(String),
    ProjectNotFound(ProjectId),
    SectionNotFound(SectionId),
    RecordingNotFound(RecordingId),
    /// No section of `project_uuid` carries `index`.
    InvalidIndex { project_uuid: ProjectId, index: i64 },
    /// Storage failure, passed through unchanged.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "title must not be blank"),
            Self::DuplicateTitle(title) => {
                write!(f, "a recording titled `{title}` already exists in this section")
            }
            Self::InvalidFileExtension(value) => {
                write!(f, "invalid recording file extension `{value}`")
            }
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::RecordingNotFound(id) => write!(f, "recording not found: {id}"),
            Self::InvalidIndex {
                project_uuid,
                index,
            } => write!(f, "project {project_uuid} has no section at index {index}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::BlankTitle => Self::InvalidTitle,
            ValidationError::InvalidFileExtension(value) => Self::InvalidFileExtension(value),
            other => Self::Repo(RepoError::Validation(other)),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => err.into(),
            RepoError::NotFound {
                entity: "project",
                id,
            } => Self::ProjectNotFound(id),
            RepoError::NotFound {
                entity: "section",
                id,
            } => Self::SectionNotFound(id),
            RepoError::NotFound {
                entity: "recording",
                id,
            } => Self::RecordingNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<IndexError<ProjectId, RepoError>> for ServiceError {
    fn from(value: IndexError<ProjectId, RepoError>) -> Self {
        match value {
            IndexError::InvalidIndex { parent, index } => Self::InvalidIndex {
                project_uuid: parent,
                index,
            },
            IndexError::IndexOverflow { parent } => Self::InvalidIndex {
                project_uuid: parent,
                index: i64::MAX,
            },
            IndexError::Persistence(err) => err.into(),
        }
    }
}
