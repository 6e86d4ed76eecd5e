//! Project use-case service.
//!
//! # Invariants
//! - Project titles are trimmed and non-blank.
//! - The remembered project and section never resolve to deleted rows.

use crate::model::normalize_title;
use crate::model::project::{Project, ProjectId};
use crate::repo::preference_repo::{
    get_uuid_preference, PreferenceRepository, LAST_PROJECT_KEY, LAST_SECTION_KEY,
};
use crate::repo::project_repo::ProjectRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Project service facade.
pub struct ProjectService<R: ProjectRepository, P: PreferenceRepository> {
    repo: R,
    preferences: P,
}

impl<R: ProjectRepository, P: PreferenceRepository> ProjectService<R, P> {
    pub fn new(repo: R, preferences: P) -> Self {
        Self { repo, preferences }
    }

    /// Creates an empty project.
    pub fn create_project(&self, title: impl Into<String>) -> ServiceResult<Project> {
        let title = normalize_title(&title.into())?;
        let project = self.repo.create_project(&title)?;
        info!(
            "event=project_create module=service status=ok project={}",
            project.uuid
        );
        Ok(project)
    }

    pub fn get_project(&self, id: ProjectId) -> ServiceResult<Option<Project>> {
        Ok(self.repo.get_project(id)?)
    }

    /// Lists projects oldest first.
    pub fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.list_projects()?)
    }

    pub fn rename_project(&self, id: ProjectId, title: impl Into<String>) -> ServiceResult<()> {
        let title = normalize_title(&title.into())?;
        self.repo.rename_project(id, &title)?;
        Ok(())
    }

    /// Deletes a project with all of its sections and recordings.
    pub fn delete_project(&self, id: ProjectId) -> ServiceResult<()> {
        // Ownership of the remembered section is gone once the cascade runs.
        let owns_last_section = match get_uuid_preference(&self.preferences, LAST_SECTION_KEY)? {
            Some(section_uuid) => self.repo.section_project(section_uuid)? == Some(id),
            None => false,
        };

        self.repo.delete_project(id)?;
        if get_uuid_preference(&self.preferences, LAST_PROJECT_KEY)? == Some(id) {
            self.preferences.remove_preference(LAST_PROJECT_KEY)?;
        }
        if owns_last_section {
            self.preferences.remove_preference(LAST_SECTION_KEY)?;
        }
        info!("event=project_delete module=service status=ok project={id}");
        Ok(())
    }

    /// Remembers `id` as the project to reopen next time.
    pub fn set_last_project(&self, id: ProjectId) -> ServiceResult<()> {
        if self.repo.get_project(id)?.is_none() {
            return Err(ServiceError::ProjectNotFound(id));
        }
        self.preferences
            .set_preference(LAST_PROJECT_KEY, &id.to_string())?;
        Ok(())
    }

    /// Returns the remembered project, or `None` if unset or since deleted.
    pub fn last_project(&self) -> ServiceResult<Option<Project>> {
        match get_uuid_preference(&self.preferences, LAST_PROJECT_KEY)? {
            Some(id) => Ok(self.repo.get_project(id)?),
            None => Ok(None),
        }
    }
}
