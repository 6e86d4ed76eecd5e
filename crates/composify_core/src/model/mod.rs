//! Domain records for the recording library.
//!
//! # Responsibility
//! - Define projects, their ordered sections, and the recordings inside them.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Section order is the `index` field, never storage or creation order.

pub mod project;
pub mod recording;
pub mod section;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failures checked before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming.
    BlankTitle,
    /// Section index below zero.
    NegativeIndex(i64),
    /// Recording file extension is empty or not plain ASCII alphanumerics.
    InvalidFileExtension(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::NegativeIndex(index) => write!(f, "index must not be negative, got {index}"),
            Self::InvalidFileExtension(value) => {
                write!(f, "invalid recording file extension `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims a user-supplied title and rejects blank input.
pub fn normalize_title(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}
