//! Project record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable project identifier.
pub type ProjectId = Uuid;

/// Top-level container of ordered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub uuid: ProjectId,
    pub title: String,
    /// Epoch ms. Projects list oldest first.
    pub created_at: i64,
    /// Epoch ms.
    pub updated_at: i64,
}
