//! Recording repository contract and SQLite implementation.
//!
//! # Invariants
//! - A recording's `project_uuid` is copied from its section at insert time.
//! - Listings are `title ASC, uuid ASC`.

use crate::model::normalize_title;
use crate::model::project::ProjectId;
use crate::model::recording::{normalize_file_extension, Recording, RecordingId};
use crate::model::section::SectionId;
use crate::repo::section_repo::section_project;
use crate::repo::{ensure_schema_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const RECORDING_SELECT_SQL: &str = "SELECT
    uuid,
    project_uuid,
    section_uuid,
    title,
    file_extension,
    created_at
FROM recordings";

/// Repository interface for recording metadata.
pub trait RecordingRepository {
    /// Returns the owning project of a section, or `None` when the section is gone.
    fn section_project(&self, section_uuid: SectionId) -> RepoResult<Option<ProjectId>>;
    /// Whether another recording of `section_uuid` already carries `title`.
    fn title_in_use(
        &self,
        section_uuid: SectionId,
        title: &str,
        except: Option<RecordingId>,
    ) -> RepoResult<bool>;
    /// Inserts a recording under `section_uuid` and returns the stored row.
    fn create_recording(
        &self,
        section_uuid: SectionId,
        title: &str,
        file_extension: &str,
    ) -> RepoResult<Recording>;
    fn get_recording(&self, recording_uuid: RecordingId) -> RepoResult<Option<Recording>>;
    fn list_recordings(&self, section_uuid: SectionId) -> RepoResult<Vec<Recording>>;
    fn rename_recording(&self, recording_uuid: RecordingId, title: &str) -> RepoResult<()>;
    fn delete_recording(&self, recording_uuid: RecordingId) -> RepoResult<()>;
}

/// SQLite-backed recording repository.
pub struct SqliteRecordingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordingRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(
            conn,
            "recordings",
            &[
                "uuid",
                "project_uuid",
                "section_uuid",
                "title",
                "file_extension",
                "created_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl RecordingRepository for SqliteRecordingRepository<'_> {
    fn section_project(&self, section_uuid: SectionId) -> RepoResult<Option<ProjectId>> {
        section_project(self.conn, section_uuid)
    }

    fn title_in_use(
        &self,
        section_uuid: SectionId,
        title: &str,
        except: Option<RecordingId>,
    ) -> RepoResult<bool> {
        let except = except.map(|id| id.to_string());
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1
                 FROM recordings
                 WHERE section_uuid = ?1
                   AND title = ?2
                   AND (?3 IS NULL OR uuid <> ?3)
                 LIMIT 1;",
                params![section_uuid.to_string(), title, except],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn create_recording(
        &self,
        section_uuid: SectionId,
        title: &str,
        file_extension: &str,
    ) -> RepoResult<Recording> {
        let title = normalize_title(title)?;
        let file_extension = normalize_file_extension(file_extension)?;
        let project_uuid = self
            .section_project(section_uuid)?
            .ok_or(RepoError::NotFound {
                entity: "section",
                id: section_uuid,
            })?;

        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO recordings (uuid, project_uuid, section_uuid, title, file_extension)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                uuid.to_string(),
                project_uuid.to_string(),
                section_uuid.to_string(),
                title,
                file_extension,
            ],
        )?;

        self.get_recording(uuid)?.ok_or(RepoError::NotFound {
            entity: "recording",
            id: uuid,
        })
    }

    fn get_recording(&self, recording_uuid: RecordingId) -> RepoResult<Option<Recording>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORDING_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([recording_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_recording_row(row)?));
        }
        Ok(None)
    }

    fn list_recordings(&self, section_uuid: SectionId) -> RepoResult<Vec<Recording>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORDING_SELECT_SQL}
             WHERE section_uuid = ?1
             ORDER BY title ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([section_uuid.to_string()])?;
        let mut recordings = Vec::new();
        while let Some(row) = rows.next()? {
            recordings.push(parse_recording_row(row)?);
        }
        Ok(recordings)
    }

    fn rename_recording(&self, recording_uuid: RecordingId, title: &str) -> RepoResult<()> {
        let title = normalize_title(title)?;
        let changed = self.conn.execute(
            "UPDATE recordings
             SET title = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![recording_uuid.to_string(), title],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "recording",
                id: recording_uuid,
            });
        }
        Ok(())
    }

    fn delete_recording(&self, recording_uuid: RecordingId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM recordings WHERE uuid = ?1;",
            [recording_uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "recording",
                id: recording_uuid,
            });
        }
        Ok(())
    }
}

fn parse_recording_row(row: &Row<'_>) -> RepoResult<Recording> {
    let uuid_text: String = row.get("uuid")?;
    let project_text: String = row.get("project_uuid")?;
    let section_text: String = row.get("section_uuid")?;

    Ok(Recording {
        uuid: parse_uuid(&uuid_text, "recordings.uuid")?,
        project_uuid: parse_uuid(&project_text, "recordings.project_uuid")?,
        section_uuid: parse_uuid(&section_text, "recordings.section_uuid")?,
        title: row.get("title")?,
        file_extension: row.get("file_extension")?,
        created_at: row.get("created_at")?,
    })
}
