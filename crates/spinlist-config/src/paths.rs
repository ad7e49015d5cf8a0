use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that relocates every Spinlist directory under one root.
pub const BASE_DIR_ENV: &str = "SPINLIST_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Where Spinlist keeps its config file and its database.
#[derive(Debug, Clone)]
pub struct SpinlistPaths {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl SpinlistPaths {
  /// `$SPINLIST_BASE_DIR/{config,data}` when the override is set, the
  /// platform's project directories otherwise. Both are created.
  pub fn new() -> Result<Self, ConfigError> {
    if let Ok(base) = std::env::var(BASE_DIR_ENV) {
      return Self::under(base);
    }

    let proj_dirs = ProjectDirs::from("app", "spinlist", "spinlist").ok_or(ConfigError::Directories)?;
    Self::create(proj_dirs.config_dir().to_path_buf(), proj_dirs.data_dir().to_path_buf())
  }

  /// All directories under `base`, the same layout the env override produces.
  pub fn under(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let base = base.into();
    Self::create(base.join("config"), base.join("data"))
  }

  fn create(config_dir: PathBuf, data_dir: PathBuf) -> Result<Self, ConfigError> {
    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok(Self { config_dir, data_dir })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("spinlist.toml")
  }
}
