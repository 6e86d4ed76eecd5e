//! Key/value preference storage for remembered UI selections.

use crate::repo::{ensure_schema_ready, RepoResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Project reopened on next launch.
pub(crate) const LAST_PROJECT_KEY: &str = "last_project_uuid";
/// Section reopened inside its project on next launch.
pub(crate) const LAST_SECTION_KEY: &str = "last_section_uuid";

/// Repository interface for small string preferences.
pub trait PreferenceRepository {
    fn get_preference(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or replaces one preference.
    fn set_preference(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes one preference; missing keys are not an error.
    fn remove_preference(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed preference repository.
pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "app_preferences", &["key", "value", "updated_at"])?;
        Ok(Self { conn })
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn get_preference(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM app_preferences WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_preference(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO app_preferences (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value,
                 updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_preference(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM app_preferences WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Reads a preference that stores a uuid. Unparseable values read as unset.
pub(crate) fn get_uuid_preference<P: PreferenceRepository>(
    preferences: &P,
    key: &str,
) -> RepoResult<Option<Uuid>> {
    let Some(value) = preferences.get_preference(key)? else {
        return Ok(None);
    };
    match Uuid::parse_str(&value) {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            warn!(
                "event=preference_read module=repo status=error key={key} error_code=invalid_uuid"
            );
            Ok(None)
        }
    }
}
