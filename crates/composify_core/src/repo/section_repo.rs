//! Section repository: SQLite child accessor and persistence gateway.
//!
//! # Responsibility
//! - Load and store sections of one project.
//! - Back the index manager: [`ChildAccessor`] reads a project's sections and
//!   [`PersistenceGateway`] applies single-section writes.
//!
//! # Invariants
//! - Ordered listings are `section_index ASC, uuid ASC`.
//! - Every gateway write is its own immediate transaction. An uncommitted
//!   transaction rolls back when dropped, so error paths never leave it open.
//! - The caller's in-memory section only changes after its write committed.

use crate::model::normalize_title;
use crate::model::project::ProjectId;
use crate::model::section::{Section, SectionId};
use crate::ordering::{ChildAccessor, PersistenceGateway};
use crate::repo::project_repo::project_exists;
use crate::repo::{ensure_schema_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const SECTION_SELECT_SQL: &str = "SELECT
    uuid,
    project_uuid,
    title,
    section_index
FROM sections";

/// Repository interface for sections.
///
/// Every implementation is also the child accessor and persistence gateway
/// the index manager runs against.
pub trait SectionRepository:
    ChildAccessor<ParentId = ProjectId, Child = Section, Error = RepoError>
    + PersistenceGateway<Section, Error = RepoError>
{
    fn project_exists(&self, project_uuid: ProjectId) -> RepoResult<bool>;
    fn get_section(&self, section_uuid: SectionId) -> RepoResult<Option<Section>>;
    /// Lists sections of one project in index order.
    fn list_sections(&self, project_uuid: ProjectId) -> RepoResult<Vec<Section>>;
    fn rename_section(&self, section_uuid: SectionId, title: &str) -> RepoResult<()>;
}

/// SQLite-backed section repository.
pub struct SqliteSectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSectionRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(
            conn,
            "sections",
            &["uuid", "project_uuid", "title", "section_index", "updated_at"],
        )?;
        Ok(Self { conn })
    }

    fn query_sections(&self, sql: &str, project_uuid: ProjectId) -> RepoResult<Vec<Section>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([project_uuid.to_string()])?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            sections.push(parse_section_row(row)?);
        }
        Ok(sections)
    }
}

impl SectionRepository for SqliteSectionRepository<'_> {
    fn project_exists(&self, project_uuid: ProjectId) -> RepoResult<bool> {
        project_exists(self.conn, project_uuid)
    }

    fn get_section(&self, section_uuid: SectionId) -> RepoResult<Option<Section>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SECTION_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([section_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_section_row(row)?));
        }
        Ok(None)
    }

    fn list_sections(&self, project_uuid: ProjectId) -> RepoResult<Vec<Section>> {
        self.query_sections(
            &format!(
                "{SECTION_SELECT_SQL}
                 WHERE project_uuid = ?1
                 ORDER BY section_index ASC, uuid ASC;"
            ),
            project_uuid,
        )
    }

    fn rename_section(&self, section_uuid: SectionId, title: &str) -> RepoResult<()> {
        let title = normalize_title(title)?;
        let changed = self.conn.execute(
            "UPDATE sections
             SET title = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![section_uuid.to_string(), title],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "section",
                id: section_uuid,
            });
        }
        Ok(())
    }
}

impl ChildAccessor for SqliteSectionRepository<'_> {
    type ParentId = ProjectId;
    type Child = Section;
    type Error = RepoError;

    fn children(&self, parent: ProjectId) -> RepoResult<Vec<Section>> {
        self.query_sections(
            &format!("{SECTION_SELECT_SQL} WHERE project_uuid = ?1;"),
            parent,
        )
    }

    fn child_at(&self, parent: ProjectId, index: i64) -> RepoResult<Option<Section>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SECTION_SELECT_SQL}
             WHERE project_uuid = ?1
               AND section_index = ?2
             ORDER BY uuid ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![parent.to_string(), index])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_section_row(row)?));
        }
        Ok(None)
    }
}

impl PersistenceGateway<Section> for SqliteSectionRepository<'_> {
    type Error = RepoError;

    fn update<F>(&self, child: &mut Section, change: F) -> RepoResult<()>
    where
        F: FnOnce(&mut Section),
    {
        let mut draft = child.clone();
        change(&mut draft);
        draft.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE sections
             SET title = ?2,
                 section_index = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![draft.uuid.to_string(), draft.title, draft.index],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "section",
                id: draft.uuid,
            });
        }
        tx.commit()?;

        *child = draft;
        Ok(())
    }

    fn save(&self, child: &Section) -> RepoResult<()> {
        child.validate()?;
        self.conn.execute(
            "INSERT INTO sections (uuid, project_uuid, title, section_index)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                child.uuid.to_string(),
                child.project_uuid.to_string(),
                child.title,
                child.index,
            ],
        )?;
        Ok(())
    }

    fn delete(&self, child: &Section) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sections WHERE uuid = ?1;", [child.uuid.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "section",
                id: child.uuid,
            });
        }
        Ok(())
    }
}

/// Returns the project owning a section, or `None` when the section is gone.
pub(crate) fn section_project(
    conn: &Connection,
    section_uuid: SectionId,
) -> RepoResult<Option<ProjectId>> {
    let project_text: Option<String> = conn
        .query_row(
            "SELECT project_uuid FROM sections WHERE uuid = ?1;",
            [section_uuid.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    project_text
        .map(|value| parse_uuid(&value, "sections.project_uuid"))
        .transpose()
}

fn parse_section_row(row: &Row<'_>) -> RepoResult<Section> {
    let uuid_text: String = row.get("uuid")?;
    let project_text: String = row.get("project_uuid")?;
    let index: i64 = row.get("section_index")?;
    if index < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative section_index `{index}` in sections.section_index"
        )));
    }

    Ok(Section {
        uuid: parse_uuid(&uuid_text, "sections.uuid")?,
        project_uuid: parse_uuid(&project_text, "sections.project_uuid")?,
        title: row.get("title")?,
        index,
    })
}
