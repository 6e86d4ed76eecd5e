//! Recording use-case service.
//!
//! Recording titles are unique within their section after trimming. Untitled
//! recordings take the first free of `Recording`, `Recording 2`, ...

use crate::model::normalize_title;
use crate::model::recording::{
    normalize_file_extension, Recording, RecordingId, DEFAULT_FILE_EXTENSION,
    DEFAULT_RECORDING_TITLE,
};
use crate::model::section::SectionId;
use crate::repo::recording_repo::RecordingRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Recording service facade.
pub struct RecordingService<R: RecordingRepository> {
    repo: R,
    default_extension: String,
}

impl<R: RecordingRepository> RecordingService<R> {
    /// Creates a service that falls back to the `caf` extension.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            default_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }

    /// Overrides the extension used when callers give none.
    pub fn with_default_extension(mut self, extension: &str) -> ServiceResult<Self> {
        self.default_extension = normalize_file_extension(extension)?;
        Ok(self)
    }

    /// Creates a recording in `section_uuid`, inheriting the section's project.
    pub fn create_recording(
        &self,
        section_uuid: SectionId,
        title: Option<String>,
        file_extension: Option<&str>,
    ) -> ServiceResult<Recording> {
        self.ensure_section(section_uuid)?;
        let title = match title {
            Some(value) => {
                let title = normalize_title(&value)?;
                self.ensure_title_free(section_uuid, &title, None)?;
                title
            }
            None => self.free_default_title(section_uuid)?,
        };
        let extension =
            normalize_file_extension(file_extension.unwrap_or(self.default_extension.as_str()))?;

        let recording = self
            .repo
            .create_recording(section_uuid, &title, &extension)?;
        info!(
            "event=recording_create module=service status=ok section={section_uuid} recording={}",
            recording.uuid
        );
        Ok(recording)
    }

    pub fn get_recording(&self, recording_uuid: RecordingId) -> ServiceResult<Option<Recording>> {
        Ok(self.repo.get_recording(recording_uuid)?)
    }

    /// Lists a section's recordings by title.
    pub fn list_recordings(&self, section_uuid: SectionId) -> ServiceResult<Vec<Recording>> {
        self.ensure_section(section_uuid)?;
        Ok(self.repo.list_recordings(section_uuid)?)
    }

    pub fn rename_recording(
        &self,
        recording_uuid: RecordingId,
        title: impl Into<String>,
    ) -> ServiceResult<()> {
        let title = normalize_title(&title.into())?;
        let Some(recording) = self.repo.get_recording(recording_uuid)? else {
            return Err(ServiceError::RecordingNotFound(recording_uuid));
        };
        self.ensure_title_free(recording.section_uuid, &title, Some(recording_uuid))?;
        self.repo.rename_recording(recording_uuid, &title)?;
        Ok(())
    }

    /// Deletes recording metadata. The audio file is the caller's to remove.
    pub fn delete_recording(&self, recording_uuid: RecordingId) -> ServiceResult<()> {
        self.repo.delete_recording(recording_uuid)?;
        info!("event=recording_delete module=service status=ok recording={recording_uuid}");
        Ok(())
    }

    fn free_default_title(&self, section_uuid: SectionId) -> ServiceResult<String> {
        let mut candidate = DEFAULT_RECORDING_TITLE.to_string();
        let mut suffix = 1u32;
        while self.repo.title_in_use(section_uuid, &candidate, None)? {
            suffix += 1;
            candidate = format!("{DEFAULT_RECORDING_TITLE} {suffix}");
        }
        Ok(candidate)
    }

    fn ensure_title_free(
        &self,
        section_uuid: SectionId,
        title: &str,
        except: Option<RecordingId>,
    ) -> ServiceResult<()> {
        if self.repo.title_in_use(section_uuid, title, except)? {
            return Err(ServiceError::DuplicateTitle(title.to_string()));
        }
        Ok(())
    }

    fn ensure_section(&self, section_uuid: SectionId) -> ServiceResult<()> {
        if self.repo.section_project(section_uuid)?.is_none() {
            return Err(ServiceError::SectionNotFound(section_uuid));
        }
        Ok(())
    }
}
