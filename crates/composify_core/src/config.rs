//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Carry the database location, logging settings and recording defaults.
//! - Resolve values from defaults, serialized config, or `COMPOSIFY_*`
//!   environment variables.
//!
//! # Invariants
//! - A config that passes `validate()` always yields usable log settings and
//!   a usable default recording extension.

use crate::logging::{LogLevel, LogSettings};
use crate::model::recording::{normalize_file_extension, DEFAULT_FILE_EXTENSION};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "COMPOSIFY_DB_PATH";
pub const ENV_LOG_DIR: &str = "COMPOSIFY_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "COMPOSIFY_LOG_LEVEL";
pub const ENV_RECORDING_EXTENSION: &str = "COMPOSIFY_RECORDING_EXTENSION";

const DEFAULT_DB_FILE_NAME: &str = "composify.sqlite3";

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    InvalidLogLevel(String),
    InvalidLogDir(String),
    InvalidRecordingExtension(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "db_path cannot be empty"),
            Self::InvalidLogLevel(value) => write!(f, "invalid log level `{value}`"),
            Self::InvalidLogDir(message) => write!(f, "invalid log_dir: {message}"),
            Self::InvalidRecordingExtension(value) => {
                write!(f, "invalid default recording extension `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Core runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite library file.
    pub db_path: PathBuf,
    /// Absolute directory for rolling logs. `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Extension given to recordings created without one.
    pub default_recording_extension: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: LogLevel::default_for_build(),
            default_recording_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by `COMPOSIFY_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` (keyed by the `ENV_*` names), then validates.
    ///
    /// Blank values are treated as unset.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value.trim());
        }
        if let Some(value) = lookup(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value.trim()));
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = value
                .parse()
                .map_err(|_| ConfigError::InvalidLogLevel(value.clone()))?;
        }
        if let Some(value) = lookup(ENV_RECORDING_EXTENSION) {
            self.default_recording_extension = value;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks every field and normalizes the recording extension.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        self.default_recording_extension =
            normalize_file_extension(&self.default_recording_extension).map_err(|_| {
                ConfigError::InvalidRecordingExtension(self.default_recording_extension.clone())
            })?;
        self.log_settings()?;
        Ok(())
    }

    /// Logging settings, or `None` when no log directory is configured.
    pub fn log_settings(&self) -> Result<Option<LogSettings>, ConfigError> {
        self.log_dir
            .as_ref()
            .map(|dir| {
                LogSettings::new(self.log_level, dir)
                    .map_err(|err| ConfigError::InvalidLogDir(err.to_string()))
            })
            .transpose()
    }
}
