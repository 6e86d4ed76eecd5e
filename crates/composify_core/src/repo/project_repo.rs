//! Project repository contract and SQLite implementation.
//!
//! # Invariants
//! - Projects list in creation order (`created_at ASC`, then insertion order).
//! - Deleting a project cascades to its sections and recordings through
//!   foreign keys.

use crate::model::normalize_title;
use crate::model::project::{Project, ProjectId};
use crate::model::section::SectionId;
use crate::repo::section_repo::section_project;
use crate::repo::{ensure_schema_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    created_at,
    updated_at
FROM projects";

/// Repository interface for project persistence.
pub trait ProjectRepository {
    /// Inserts a new project and returns the stored row.
    fn create_project(&self, title: &str) -> RepoResult<Project>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn rename_project(&self, id: ProjectId, title: &str) -> RepoResult<()>;
    /// Hard-deletes one project together with everything it owns.
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
    /// Returns the project owning `section_uuid`, if the section exists.
    fn section_project(&self, section_uuid: SectionId) -> RepoResult<Option<ProjectId>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "projects", &["uuid", "title", "created_at", "updated_at"])?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, title: &str) -> RepoResult<Project> {
        let title = normalize_title(title)?;
        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO projects (uuid, title) VALUES (?1, ?2);",
            params![uuid.to_string(), title],
        )?;

        self.get_project(uuid)?.ok_or(RepoError::NotFound {
            entity: "project",
            id: uuid,
        })
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn rename_project(&self, id: ProjectId, title: &str) -> RepoResult<()> {
        let title = normalize_title(title)?;
        let changed = self.conn.execute(
            "UPDATE projects
             SET title = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), title],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }

    fn section_project(&self, section_uuid: SectionId) -> RepoResult<Option<ProjectId>> {
        section_project(self.conn, section_uuid)
    }
}

/// Returns whether a project row exists.
pub(crate) fn project_exists(conn: &Connection, id: ProjectId) -> RepoResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM projects WHERE uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Project {
        uuid: parse_uuid(&uuid_text, "projects.uuid")?,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
