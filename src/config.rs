//! Layered settings: defaults, optional TOML file, then environment.
//!
//! Environment variables use the `TIMETABLE` prefix with `__` as the
//! section separator, e.g. `TIMETABLE__GENERATION__MAX_ATTEMPTS=40`.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TimetableError;
use crate::scheduler::DEFAULT_MAX_ATTEMPTS;
use crate::storage::{DEFAULT_KEY_PREFIX, JSON_CONTENT_TYPE};

/// All settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// Slot placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random draws per subject before it is dropped.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Which blob store backs persistence.
///
/// `Memory` keeps nothing past the process, so it only suits tests and
/// dry runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Filesystem,
}

impl StorageBackend {
    /// Whether stored timetables outlive the process.
    pub fn is_persistent(self) -> bool {
        matches!(self, StorageBackend::Filesystem)
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

/// Tabular source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON workbook with `Sheet1`..`Sheet3`.
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("timetables")
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_content_type() -> String {
    JSON_CONTENT_TYPE.to_string()
}

fn default_source_path() -> PathBuf {
    PathBuf::from("timetable_data.json")
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_storage_root(),
            key_prefix: default_key_prefix(),
            content_type: default_content_type(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional file plus `TIMETABLE__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, TimetableError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("TIMETABLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings no run could use.
    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.generation.max_attempts == 0 {
            return Err(TimetableError::Config(
                "generation.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.storage.key_prefix.trim().is_empty() {
            return Err(TimetableError::Config(
                "storage.key_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
