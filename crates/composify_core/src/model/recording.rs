//! Recording record.
//!
//! Only the metadata row is modelled here. Audio bytes live in files named by
//! [`Recording::file_name`] and are managed outside this crate.

use crate::model::project::ProjectId;
use crate::model::section::SectionId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stable recording identifier.
pub type RecordingId = Uuid;

/// Title used when a recording is created without one.
pub const DEFAULT_RECORDING_TITLE: &str = "Recording";

/// Extension used when a recording is created without one.
pub const DEFAULT_FILE_EXTENSION: &str = "caf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub uuid: RecordingId,
    /// Always the owning section's project.
    pub project_uuid: ProjectId,
    pub section_uuid: SectionId,
    pub title: String,
    /// Audio container extension without the leading dot.
    pub file_extension: String,
    /// Epoch ms.
    pub created_at: i64,
}

/// Trims a file extension and rejects values that would not form `<uuid>.<ext>`.
pub fn normalize_file_extension(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim().trim_start_matches('.');
    let valid = !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_alphanumeric());
    if !valid {
        return Err(ValidationError::InvalidFileExtension(value.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

impl Recording {
    /// Audio file name, `<uuid>.<extension>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.uuid, self.file_extension)
    }

    /// Audio file location under the given recordings directory.
    pub fn audio_path(&self, recordings_dir: &Path) -> PathBuf {
        recordings_dir.join(self.file_name())
    }
}
