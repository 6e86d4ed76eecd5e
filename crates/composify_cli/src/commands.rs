use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "composify")]
#[command(about = "Manage a library of projects, ordered sections and recordings.")]
#[command(version)]
pub struct CommandLine {
    /// Library database file (overrides COMPOSIFY_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// trace|debug|info|warn|error (overrides COMPOSIFY_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files (overrides COMPOSIFY_LOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the core library is linked
    Ping,
    /// Manage projects
    #[command(subcommand, alias = "p")]
    Project(ProjectCommand),
    /// Manage the ordered sections of a project
    #[command(subcommand, alias = "s")]
    Section(SectionCommand),
    /// Manage the recordings of a section
    #[command(subcommand, alias = "r")]
    Recording(RecordingCommand),
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    Add { title: String },
    /// List projects, oldest first
    List,
    /// Rename a project
    Rename { project: Uuid, title: String },
    /// Delete a project with its sections and recordings
    Delete { project: Uuid },
    /// Remember a project as the last opened one
    Open { project: Uuid },
    /// Show the last opened project
    Last,
}

#[derive(Subcommand)]
pub enum SectionCommand {
    /// Append a section to a project
    Add {
        project: Uuid,
        #[arg(long)]
        title: Option<String>,
    },
    /// List a project's sections in order
    List { project: Uuid },
    /// Rename a section
    Rename { section: Uuid, title: String },
    /// Delete the section at an index and close the gap
    Delete(SectionAt),
    /// Move the section at FROM to position TO
    Move {
        project: Uuid,
        #[arg(allow_negative_numbers = true)]
        from: i64,
        #[arg(allow_negative_numbers = true)]
        to: i64,
    },
    /// Remember a section as the last opened one
    Open { section: Uuid },
    /// Show the last opened section of a project, or its first section
    Last { project: Uuid },
    /// Rewrite a project's section indices to 0..n
    Repair { project: Uuid },
}

#[derive(Args)]
pub struct SectionAt {
    pub project: Uuid,
    #[arg(allow_negative_numbers = true)]
    pub index: i64,
}

#[derive(Subcommand)]
pub enum RecordingCommand {
    /// Add a recording to a section
    Add {
        section: Uuid,
        #[arg(long)]
        title: Option<String>,
        /// File extension, e.g. caf or m4a
        #[arg(long)]
        extension: Option<String>,
    },
    /// List a section's recordings by title
    List { section: Uuid },
    /// Rename a recording
    Rename { recording: Uuid, title: String },
    /// Delete a recording's metadata
    Delete { recording: Uuid },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
