use composify_core::db::open_db_in_memory;
use composify_core::{
    ProjectService, RecordingService, SectionService, ServiceError, SqlitePreferenceRepository,
    SqliteProjectRepository, SqliteRecordingRepository, SqliteSectionRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

type Projects<'conn> =
    ProjectService<SqliteProjectRepository<'conn>, SqlitePreferenceRepository<'conn>>;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn project_service(conn: &Connection) -> Projects<'_> {
    ProjectService::new(
        SqliteProjectRepository::try_new(conn).unwrap(),
        SqlitePreferenceRepository::try_new(conn).unwrap(),
    )
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn projects_list_in_creation_order() {
    let conn = setup();
    let service = project_service(&conn);

    let first = service.create_project("Zebra").unwrap();
    let second = service.create_project("Alpha").unwrap();
    let third = service.create_project(" Middle ").unwrap();

    let listed: Vec<Uuid> = service
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.uuid)
        .collect();
    assert_eq!(listed, vec![first.uuid, second.uuid, third.uuid]);
    assert_eq!(third.title, "Middle");
    assert!(first.created_at > 0);
}

#[test]
fn create_and_rename_validate_titles() {
    let conn = setup();
    let service = project_service(&conn);

    assert!(matches!(
        service.create_project("   "),
        Err(ServiceError::InvalidTitle)
    ));

    let project = service.create_project("Demo").unwrap();
    service.rename_project(project.uuid, "Album").unwrap();
    assert_eq!(
        service.get_project(project.uuid).unwrap().unwrap().title,
        "Album"
    );

    let missing = Uuid::new_v4();
    assert!(matches!(
        service.rename_project(missing, "Ghost"),
        Err(ServiceError::ProjectNotFound(id)) if id == missing
    ));
}

#[test]
fn deleting_project_cascades_to_sections_and_recordings() {
    let conn = setup();
    let projects = project_service(&conn);
    let sections = SectionService::new(
        SqliteSectionRepository::try_new(&conn).unwrap(),
        SqlitePreferenceRepository::try_new(&conn).unwrap(),
    );
    let recordings = RecordingService::new(SqliteRecordingRepository::try_new(&conn).unwrap());

    let doomed = projects.create_project("Doomed").unwrap();
    let kept = projects.create_project("Kept").unwrap();
    let doomed_section = sections.add_section(doomed.uuid, None).unwrap();
    let kept_section = sections.add_section(kept.uuid, None).unwrap();
    recordings
        .create_recording(doomed_section.uuid, None, None)
        .unwrap();
    recordings
        .create_recording(kept_section.uuid, None, None)
        .unwrap();

    projects.delete_project(doomed.uuid).unwrap();

    assert!(projects.get_project(doomed.uuid).unwrap().is_none());
    assert_eq!(count_rows(&conn, "sections"), 1);
    assert_eq!(count_rows(&conn, "recordings"), 1);
    assert_eq!(sections.list_sections(kept.uuid).unwrap(), vec![kept_section]);

    assert!(matches!(
        projects.delete_project(doomed.uuid),
        Err(ServiceError::ProjectNotFound(_))
    ));
}

#[test]
fn last_project_round_trips_and_clears_on_delete() {
    let conn = setup();
    let service = project_service(&conn);
    assert!(service.last_project().unwrap().is_none());

    let first = service.create_project("First").unwrap();
    let second = service.create_project("Second").unwrap();

    service.set_last_project(first.uuid).unwrap();
    service.set_last_project(second.uuid).unwrap();
    assert_eq!(service.last_project().unwrap(), Some(second.clone()));

    service.delete_project(first.uuid).unwrap();
    assert_eq!(service.last_project().unwrap(), Some(second.clone()));

    service.delete_project(second.uuid).unwrap();
    assert!(service.last_project().unwrap().is_none());
    assert_eq!(count_rows(&conn, "app_preferences"), 0);
}

#[test]
fn set_last_project_rejects_unknown_project() {
    let conn = setup();
    let service = project_service(&conn);
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.set_last_project(missing),
        Err(ServiceError::ProjectNotFound(id)) if id == missing
    ));
    assert_eq!(count_rows(&conn, "app_preferences"), 0);
}

#[test]
fn corrupt_last_project_preference_reads_as_none() {
    let conn = setup();
    let service = project_service(&conn);
    conn.execute(
        "INSERT INTO app_preferences (key, value) VALUES ('last_project_uuid', 'not-a-uuid');",
        [],
    )
    .unwrap();

    assert!(service.last_project().unwrap().is_none());
}

#[test]
fn deleting_project_forgets_its_last_section() {
    let conn = setup();
    let projects = project_service(&conn);
    let sections = SectionService::new(
        SqliteSectionRepository::try_new(&conn).unwrap(),
        SqlitePreferenceRepository::try_new(&conn).unwrap(),
    );
    let kept = projects.create_project("Kept").unwrap();
    let doomed = projects.create_project("Doomed").unwrap();
    let kept_section = sections.add_section(kept.uuid, None).unwrap();
    let doomed_section = sections.add_section(doomed.uuid, None).unwrap();

    sections.set_last_section(kept_section.uuid).unwrap();
    projects.delete_project(doomed.uuid).unwrap();
    assert_eq!(
        sections.last_section(kept.uuid).unwrap(),
        Some(kept_section.clone())
    );
    assert_eq!(count_rows(&conn, "app_preferences"), 1);

    let replacement = projects.create_project("Replacement").unwrap();
    let replacement_section = sections.add_section(replacement.uuid, None).unwrap();
    sections.set_last_section(replacement_section.uuid).unwrap();
    projects.delete_project(replacement.uuid).unwrap();
    assert_eq!(count_rows(&conn, "app_preferences"), 0);
    assert!(sections.get_section(doomed_section.uuid).unwrap().is_none());
}
