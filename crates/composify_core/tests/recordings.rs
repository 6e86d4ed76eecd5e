use composify_core::db::open_db_in_memory;
use composify_core::{
    Project, ProjectService, RecordingService, Section, SectionService, ServiceError,
    SqlitePreferenceRepository, SqliteProjectRepository, SqliteRecordingRepository,
    SqliteSectionRepository,
};
use rusqlite::Connection;
use std::path::Path;
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn seed_section(conn: &Connection) -> (Project, Section) {
    let projects = ProjectService::new(
        SqliteProjectRepository::try_new(conn).unwrap(),
        SqlitePreferenceRepository::try_new(conn).unwrap(),
    );
    let sections = SectionService::new(
        SqliteSectionRepository::try_new(conn).unwrap(),
        SqlitePreferenceRepository::try_new(conn).unwrap(),
    );
    let project = projects.create_project("Demo").unwrap();
    let section = sections.add_section(project.uuid, None).unwrap();
    (project, section)
}

fn recording_service(conn: &Connection) -> RecordingService<SqliteRecordingRepository<'_>> {
    RecordingService::new(SqliteRecordingRepository::try_new(conn).unwrap())
}

#[test]
fn create_recording_uses_defaults_and_section_project() {
    let conn = setup();
    let (project, section) = seed_section(&conn);
    let service = recording_service(&conn);

    let recording = service.create_recording(section.uuid, None, None).unwrap();

    assert_eq!(recording.title, "Recording");
    assert_eq!(recording.file_extension, "caf");
    assert_eq!(recording.project_uuid, project.uuid);
    assert_eq!(recording.section_uuid, section.uuid);
    assert_eq!(
        recording.audio_path(Path::new("/audio")),
        Path::new("/audio").join(format!("{}.caf", recording.uuid))
    );
    assert_eq!(service.get_recording(recording.uuid).unwrap(), Some(recording));
}

#[test]
fn configured_default_extension_applies_when_none_given() {
    let conn = setup();
    let (_, section) = seed_section(&conn);
    let service = recording_service(&conn)
        .with_default_extension(".M4A")
        .unwrap();

    let implicit = service
        .create_recording(section.uuid, Some("Take".to_string()), None)
        .unwrap();
    let explicit = service
        .create_recording(section.uuid, Some("Take 2".to_string()), Some("wav"))
        .unwrap();

    assert_eq!(implicit.file_extension, "m4a");
    assert_eq!(explicit.file_extension, "wav");
}

#[test]
fn recordings_list_sorted_by_title() {
    let conn = setup();
    let (_, section) = seed_section(&conn);
    let service = recording_service(&conn);
    for title in ["Verse take", "Chorus take", "Bridge take"] {
        service
            .create_recording(section.uuid, Some(title.to_string()), None)
            .unwrap();
    }

    let titles: Vec<String> = service
        .list_recordings(section.uuid)
        .unwrap()
        .into_iter()
        .map(|recording| recording.title)
        .collect();
    assert_eq!(titles, vec!["Bridge take", "Chorus take", "Verse take"]);
}

#[test]
fn duplicate_titles_are_rejected_within_a_section() {
    let conn = setup();
    let (project, section) = seed_section(&conn);
    let other_section = SectionService::new(
        SqliteSectionRepository::try_new(&conn).unwrap(),
        SqlitePreferenceRepository::try_new(&conn).unwrap(),
    )
    .add_section(project.uuid, None)
    .unwrap();
    let service = recording_service(&conn);

    let take = service
        .create_recording(section.uuid, Some("Take".to_string()), None)
        .unwrap();
    match service.create_recording(section.uuid, Some(" Take ".to_string()), None) {
        Err(ServiceError::DuplicateTitle(title)) => assert_eq!(title, "Take"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(service.list_recordings(section.uuid).unwrap().len(), 1);

    service
        .create_recording(other_section.uuid, Some("Take".to_string()), None)
        .unwrap();

    let retake = service
        .create_recording(section.uuid, Some("Retake".to_string()), None)
        .unwrap();
    assert!(matches!(
        service.rename_recording(retake.uuid, "Take"),
        Err(ServiceError::DuplicateTitle(_))
    ));
    assert_eq!(
        service.get_recording(retake.uuid).unwrap().unwrap().title,
        "Retake"
    );

    service.rename_recording(take.uuid, "Take").unwrap();
    assert!(matches!(
        service.rename_recording(Uuid::new_v4(), "Ghost"),
        Err(ServiceError::RecordingNotFound(_))
    ));
}

#[test]
fn untitled_recordings_take_the_next_free_default_title() {
    let conn = setup();
    let (_, section) = seed_section(&conn);
    let service = recording_service(&conn);

    let titles: Vec<String> = (0..3)
        .map(|_| {
            service
                .create_recording(section.uuid, None, None)
                .unwrap()
                .title
        })
        .collect();

    assert_eq!(titles, vec!["Recording", "Recording 2", "Recording 3"]);
}

#[test]
fn recording_operations_reject_invalid_input() {
    let conn = setup();
    let (_, section) = seed_section(&conn);
    let service = recording_service(&conn);
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.create_recording(missing, None, None),
        Err(ServiceError::SectionNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.list_recordings(missing),
        Err(ServiceError::SectionNotFound(_))
    ));
    assert!(matches!(
        service.create_recording(section.uuid, None, Some("../mp3")),
        Err(ServiceError::InvalidFileExtension(_))
    ));
    assert!(matches!(
        service.create_recording(section.uuid, Some(" ".to_string()), None),
        Err(ServiceError::InvalidTitle)
    ));
    assert!(matches!(
        recording_service(&conn).with_default_extension(""),
        Err(ServiceError::InvalidFileExtension(_))
    ));
}

#[test]
fn rename_and_delete_recording() {
    let conn = setup();
    let (_, section) = seed_section(&conn);
    let service = recording_service(&conn);
    let recording = service.create_recording(section.uuid, None, None).unwrap();

    service.rename_recording(recording.uuid, " Keeper ").unwrap();
    assert_eq!(
        service.get_recording(recording.uuid).unwrap().unwrap().title,
        "Keeper"
    );

    service.delete_recording(recording.uuid).unwrap();
    assert!(service.get_recording(recording.uuid).unwrap().is_none());
    assert!(matches!(
        service.delete_recording(recording.uuid),
        Err(ServiceError::RecordingNotFound(_))
    ));
}

#[test]
fn deleting_section_removes_its_recordings() {
    let conn = setup();
    let (project, section) = seed_section(&conn);
    let service = recording_service(&conn);
    service.create_recording(section.uuid, None, None).unwrap();

    let sections = SectionService::new(
        SqliteSectionRepository::try_new(&conn).unwrap(),
        SqlitePreferenceRepository::try_new(&conn).unwrap(),
    );
    sections.delete_section(project.uuid, section.index).unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM recordings;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}
