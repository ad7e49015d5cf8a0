use crate::io::atomic_write_str;
use crate::paths::{ConfigError, SpinlistPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;

// toml_edit for writes so user comments and ordering survive a save
use toml_edit::{DocumentMut, Item};

/// Section-oriented access to the config file: every crate owns one table.
pub trait ConfigBackend {
  /// Decodes `[section]`. A missing file or a missing table yields
  /// `T::default()`; a table that fails to decode is an error.
  fn load_section<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default;

  /// Replaces `[section]` and leaves the rest of the file untouched.
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;

  /// Loads a section and writes it back, so the file always lists every key
  /// with its effective value.
  fn load_or_init<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Serialize + Default,
  {
    let cfg = self.load_section(section)?;
    self.save_section(section, &cfg)?;
    Ok(cfg)
  }
}

pub struct TomlConfigBackend {
  paths: SpinlistPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: SpinlistPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &SpinlistPaths {
    &self.paths
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::debug!(?path, section, "config file missing, using defaults");
        return Ok(T::default());
      }
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;
    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    table.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    // Current document, or an empty one on first run.
    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => {
        content.parse::<DocumentMut>().map_err(|e| ConfigError::Other(format!("parse {}: {e}", path.display())))?
      }
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // The value serializes to bare "key = value" lines; reparsed, that is the table item.
    let section_item: Item = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("reparse section [{section}]: {e}")))?
      .into_item();

    doc[section] = section_item;
    atomic_write_str(&path, &doc.to_string())?;

    Ok(())
  }
}
