//! Section record: an ordered child of a project.
//!
//! # Invariants
//! - `index` is zero-based and dense among the sections of one project.
//! - `project_uuid` is a lookup back-reference; the project owns the section.

use crate::model::project::ProjectId;
use crate::model::ValidationError;
use crate::ordering::OrderedChild;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable section identifier.
pub type SectionId = Uuid;

/// Title used when a section is added without one.
pub const DEFAULT_SECTION_TITLE: &str = "Section";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub uuid: SectionId,
    pub project_uuid: ProjectId,
    pub title: String,
    /// Position among sibling sections.
    pub index: i64,
}

impl Section {
    /// Creates an unsaved section with a provisional index of `0`.
    ///
    /// The real index is assigned when the section is inserted under its project.
    pub fn new(project_uuid: ProjectId, title: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            project_uuid,
            title: title.into(),
            index: 0,
        }
    }

    /// Checks fields that storage must never hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        if self.index < 0 {
            return Err(ValidationError::NegativeIndex(self.index));
        }
        Ok(())
    }
}

impl OrderedChild for Section {
    type Id = SectionId;

    fn child_id(&self) -> Self::Id {
        self.uuid
    }

    fn index(&self) -> i64 {
        self.index
    }

    fn set_index(&mut self, index: i64) {
        self.index = index;
    }
}
