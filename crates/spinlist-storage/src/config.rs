use spinlist_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Journal modes SQLite accepts; anything else is rejected before it reaches a PRAGMA.
pub const JOURNAL_MODES: [&str; 6] = ["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  pub journal_mode: Option<String>,
  /// How long a writer waits on a locked database before failing.
  pub busy_timeout_ms: u32,
  pub pool_size: u32,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self::at(PATHS.data_dir.join("spinlist.db"))
  }
}

impl StorageConfig {
  /// Defaults for everything but the database location.
  pub fn at(db_path: impl Into<PathBuf>) -> Self {
    StorageConfig { db_path: db_path.into(), journal_mode: Some("WAL".to_string()), busy_timeout_ms: 5_000, pool_size: 4 }
  }

  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init("storage")
  }

  pub fn database_url(&self) -> String {
    self.db_path.to_string_lossy().into_owned()
  }
}
