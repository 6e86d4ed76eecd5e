//! Section use-case service.
//!
//! # Responsibility
//! - Thin caller of the index manager for every section insert, delete and
//!   reorder, so the dense-index rules live in exactly one place.
//!
//! # Invariants
//! - The owning project must exist before any section operation.
//! - New sections are appended at the project's next index.
//! - The remembered section is forgotten when that section is deleted.

use crate::model::normalize_title;
use crate::model::project::ProjectId;
use crate::model::section::{Section, SectionId, DEFAULT_SECTION_TITLE};
use crate::ordering::ChildIndexManager;
use crate::repo::preference_repo::{get_uuid_preference, PreferenceRepository, LAST_SECTION_KEY};
use crate::repo::section_repo::SectionRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Section service facade.
pub struct SectionService<R: SectionRepository, P: PreferenceRepository> {
    repo: R,
    preferences: P,
}

impl<R: SectionRepository, P: PreferenceRepository> SectionService<R, P> {
    pub fn new(repo: R, preferences: P) -> Self {
        Self { repo, preferences }
    }

    /// Appends a section to `project_uuid`.
    ///
    /// A `None` title falls back to the default section title.
    pub fn add_section(
        &self,
        project_uuid: ProjectId,
        title: Option<String>,
    ) -> ServiceResult<Section> {
        self.ensure_project(project_uuid)?;
        let title = match title {
            Some(value) => normalize_title(&value)?,
            None => DEFAULT_SECTION_TITLE.to_string(),
        };

        let mut section = Section::new(project_uuid, title);
        self.index_manager().insert_child(project_uuid, &mut section)?;
        info!(
            "event=section_add module=service status=ok project={project_uuid} section={} index={}",
            section.uuid, section.index
        );
        Ok(section)
    }

    /// Lists sections of a project in index order.
    pub fn list_sections(&self, project_uuid: ProjectId) -> ServiceResult<Vec<Section>> {
        self.ensure_project(project_uuid)?;
        Ok(self.repo.list_sections(project_uuid)?)
    }

    pub fn get_section(&self, section_uuid: SectionId) -> ServiceResult<Option<Section>> {
        Ok(self.repo.get_section(section_uuid)?)
    }

    /// Returns the section whose index equals `index`, if any.
    pub fn section_at(&self, project_uuid: ProjectId, index: i64) -> ServiceResult<Option<Section>> {
        self.ensure_project(project_uuid)?;
        Ok(self.index_manager().child_at_index(project_uuid, index)?)
    }

    /// Index the next added section will receive.
    pub fn next_section_index(&self, project_uuid: ProjectId) -> ServiceResult<i64> {
        self.ensure_project(project_uuid)?;
        Ok(self.index_manager().next_index(project_uuid)?)
    }

    pub fn rename_section(
        &self,
        section_uuid: SectionId,
        title: impl Into<String>,
    ) -> ServiceResult<()> {
        let title = normalize_title(&title.into())?;
        self.repo.rename_section(section_uuid, &title)?;
        Ok(())
    }

    /// Deletes the section at `index` and closes the gap behind it.
    ///
    /// Recordings of the deleted section go with it. On a storage failure
    /// the project may be left partially renumbered; run
    /// [`SectionService::repair_sections`] before trusting its indices.
    pub fn delete_section(&self, project_uuid: ProjectId, index: i64) -> ServiceResult<Section> {
        self.ensure_project(project_uuid)?;
        let removed = self
            .index_manager()
            .delete_child_and_normalize(project_uuid, index)?;
        if get_uuid_preference(&self.preferences, LAST_SECTION_KEY)? == Some(removed.uuid) {
            self.preferences.remove_preference(LAST_SECTION_KEY)?;
        }
        Ok(removed)
    }

    /// Moves the section at `from` to position `to`.
    pub fn move_section(&self, project_uuid: ProjectId, from: i64, to: i64) -> ServiceResult<usize> {
        self.ensure_project(project_uuid)?;
        Ok(self.index_manager().move_child(project_uuid, from, to)?)
    }

    /// Rewrites the project's section indices to `0..n`.
    pub fn repair_sections(&self, project_uuid: ProjectId) -> ServiceResult<usize> {
        self.ensure_project(project_uuid)?;
        Ok(self.index_manager().repair(project_uuid)?)
    }

    /// Remembers `section_uuid` as the section to reopen next time.
    pub fn set_last_section(&self, section_uuid: SectionId) -> ServiceResult<()> {
        if self.repo.get_section(section_uuid)?.is_none() {
            return Err(ServiceError::SectionNotFound(section_uuid));
        }
        self.preferences
            .set_preference(LAST_SECTION_KEY, &section_uuid.to_string())?;
        Ok(())
    }

    /// Returns the remembered section when it belongs to `project_uuid`,
    /// otherwise the project's section at index `0`.
    pub fn last_section(&self, project_uuid: ProjectId) -> ServiceResult<Option<Section>> {
        self.ensure_project(project_uuid)?;
        if let Some(section_uuid) = get_uuid_preference(&self.preferences, LAST_SECTION_KEY)? {
            if let Some(section) = self.repo.get_section(section_uuid)? {
                if section.project_uuid == project_uuid {
                    return Ok(Some(section));
                }
            }
        }
        Ok(self.index_manager().child_at_index(project_uuid, 0)?)
    }

    fn index_manager(&self) -> ChildIndexManager<'_, R, R> {
        ChildIndexManager::new(&self.repo, &self.repo)
    }

    fn ensure_project(&self, project_uuid: ProjectId) -> ServiceResult<()> {
        if !self.repo.project_exists(project_uuid)? {
            return Err(ServiceError::ProjectNotFound(project_uuid));
        }
        Ok(())
    }
}
