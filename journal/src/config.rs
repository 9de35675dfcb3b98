//! Application configuration
//!
//! Central location for configuration constants, defaults and the
//! fixed palettes, plus the runtime configuration read from the environment.

use crate::error::{AppError, Result};
use std::path::PathBuf;
use std::time::Duration;

// ===== Persistence =====

/// Key under which the whole trip collection is stored
pub const TRIPS_STORAGE_KEY: &str = "@trips";

/// Schema version written into the persisted envelope.
/// Version 0 is the legacy bare JSON array with no envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Default upper bound for a single storage read or write
pub const DEFAULT_STORAGE_TIMEOUT_MS: u64 = 5_000;

/// File name of the SQLite database used by the sqlite backend
pub const SQLITE_DB_FILENAME: &str = "journal.sqlite";

/// Connections kept by the sqlite backend; writes are already serialized
/// by the repository, so a few readers are enough
pub const SQLITE_POOL_SIZE: u32 = 4;

/// Subdirectory holding one JSON file per key for the file backend
pub const FILE_STORE_DIRNAME: &str = "storage";

// ===== Id Generation =====

/// Attempts at drawing a fresh id before giving up.
/// A v4 collision is astronomically unlikely, so hitting this means a broken generator.
pub const MAX_ID_ATTEMPTS: usize = 8;

// ===== Item Defaults =====

/// Caption given to photos saved without one
pub const DEFAULT_PHOTO_CAPTION: &str = "Untitled";

/// Mood glyph given to notes saved without one
pub const DEFAULT_NOTE_MOOD: &str = "📝";

/// Emoji preselected in the new trip form
pub const DEFAULT_TRIP_EMOJI: &str = "✈️";

/// Emoji a trip may use as its icon
pub const EMOJI_OPTIONS: &[&str] = &[
    "✈️", "🗼", "🗾", "🏝️", "🗽", "🏛️", "🏖️", "⛰️", "🏔️", "🌍", "🌎", "🌏", "🗺️", "🧳", "🎒",
];

// ===== Gallery =====

/// Filter label that matches every photo
pub const CATEGORY_ALL: &str = "All";

// ===== Runtime Configuration =====

/// Which key-value backend holds the trip collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendKind {
    File,
    Sqlite,
}

impl std::str::FromStr for StorageBackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(AppError::validation(format!(
                "Unknown storage backend '{}', expected 'file' or 'sqlite'",
                other
            ))),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: StorageBackendKind,
    pub storage_timeout: Duration,
}

impl AppConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            backend: StorageBackendKind::File,
            storage_timeout: Duration::from_millis(DEFAULT_STORAGE_TIMEOUT_MS),
        }
    }

    /// Build configuration from `TRIPJOURNAL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = lookup("TRIPJOURNAL_DATA_DIR")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./tripjournal-data"));

        let backend = match lookup("TRIPJOURNAL_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackendKind::File,
        };

        let timeout_ms = match lookup("TRIPJOURNAL_STORAGE_TIMEOUT_MS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                AppError::validation(format!("Invalid storage timeout '{}'", value))
            })?,
            None => DEFAULT_STORAGE_TIMEOUT_MS,
        };

        if timeout_ms == 0 {
            return Err(AppError::validation("Storage timeout must be positive"));
        }

        Ok(Self {
            data_dir,
            backend,
            storage_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
