//! Command-line front end for the Composify library.
//!
//! # Responsibility
//! - Resolve configuration from the environment and flags.
//! - Open the library database and route each command to a core service.
//! - Print one record per line, tab separated.

mod commands;

use anyhow::Context;
use commands::{CommandLine, Commands, ProjectCommand, RecordingCommand, SectionCommand};
use composify_core::{
    init_logging, open_db, CoreConfig, LogLevel, Project, ProjectService, Recording,
    RecordingService, Section, SectionService, SqlitePreferenceRepository,
    SqliteProjectRepository, SqliteRecordingRepository, SqliteSectionRepository,
};
use log::info;
use rusqlite::Connection;

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let config = resolve_config(&commands)?;

    if let Some(settings) = config.log_settings()? {
        init_logging(&settings).context("failed to start logging")?;
    }

    if let Commands::Ping = commands.command {
        println!("pong\t{}", composify_core::core_version());
        return Ok(());
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open library `{}`", config.db_path.display()))?;

    match commands.command {
        Commands::Ping => Ok(()),
        Commands::Project(command) => run_project(&conn, command),
        Commands::Section(command) => run_section(&conn, command),
        Commands::Recording(command) => run_recording(&conn, &config, command),
    }
}

fn resolve_config(commands: &CommandLine) -> anyhow::Result<CoreConfig> {
    let mut config = CoreConfig::from_env().context("invalid COMPOSIFY_* environment")?;
    if let Some(db) = &commands.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &commands.log_level {
        config.log_level = level.parse::<LogLevel>()?;
    }
    if let Some(dir) = &commands.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn run_project(conn: &Connection, command: ProjectCommand) -> anyhow::Result<()> {
    let service = ProjectService::new(
        SqliteProjectRepository::try_new(conn)?,
        SqlitePreferenceRepository::try_new(conn)?,
    );

    match command {
        ProjectCommand::Add { title } => print_project(&service.create_project(title)?),
        ProjectCommand::List => {
            for project in service.list_projects()? {
                print_project(&project);
            }
        }
        ProjectCommand::Rename { project, title } => service.rename_project(project, title)?,
        ProjectCommand::Delete { project } => service.delete_project(project)?,
        ProjectCommand::Open { project } => {
            service.set_last_project(project)?;
            if let Some(found) = service.get_project(project)? {
                print_project(&found);
            }
        }
        ProjectCommand::Last => match service.last_project()? {
            Some(project) => print_project(&project),
            None => println!("none"),
        },
    }
    Ok(())
}

fn run_section(conn: &Connection, command: SectionCommand) -> anyhow::Result<()> {
    let service = SectionService::new(
        SqliteSectionRepository::try_new(conn)?,
        SqlitePreferenceRepository::try_new(conn)?,
    );

    match command {
        SectionCommand::Add { project, title } => {
            print_section(&service.add_section(project, title)?);
        }
        SectionCommand::List { project } => {
            for section in service.list_sections(project)? {
                print_section(&section);
            }
        }
        SectionCommand::Rename { section, title } => service.rename_section(section, title)?,
        SectionCommand::Delete(target) => {
            let removed = service
                .delete_section(target.project, target.index)
                .with_context(|| {
                    format!(
                        "failed to delete section {} of project {}; run `section repair` if indices look wrong",
                        target.index, target.project
                    )
                })?;
            print_section(&removed);
        }
        SectionCommand::Move { project, from, to } => {
            let written = service.move_section(project, from, to)?;
            info!("event=cli_section_move module=cli status=ok project={project} written={written}");
            for section in service.list_sections(project)? {
                print_section(&section);
            }
        }
        SectionCommand::Open { section } => {
            service.set_last_section(section)?;
            if let Some(found) = service.get_section(section)? {
                print_section(&found);
            }
        }
        SectionCommand::Last { project } => match service.last_section(project)? {
            Some(section) => print_section(&section),
            None => println!("none"),
        },
        SectionCommand::Repair { project } => {
            let written = service.repair_sections(project)?;
            println!("repaired\t{written}");
        }
    }
    Ok(())
}

fn run_recording(
    conn: &Connection,
    config: &CoreConfig,
    command: RecordingCommand,
) -> anyhow::Result<()> {
    let service = RecordingService::new(SqliteRecordingRepository::try_new(conn)?)
        .with_default_extension(&config.default_recording_extension)?;

    match command {
        RecordingCommand::Add {
            section,
            title,
            extension,
        } => {
            let recording = service.create_recording(section, title, extension.as_deref())?;
            print_recording(&recording);
        }
        RecordingCommand::List { section } => {
            for recording in service.list_recordings(section)? {
                print_recording(&recording);
            }
        }
        RecordingCommand::Rename { recording, title } => {
            service.rename_recording(recording, title)?;
        }
        RecordingCommand::Delete { recording } => service.delete_recording(recording)?,
    }
    Ok(())
}

fn print_project(project: &Project) {
    println!("{}\t{}", project.uuid, project.title);
}

fn print_section(section: &Section) {
    println!("{}\t{}\t{}", section.index, section.uuid, section.title);
}

fn print_recording(recording: &Recording) {
    println!(
        "{}\t{}\t{}",
        recording.uuid,
        recording.title,
        recording.file_name()
    );
}
