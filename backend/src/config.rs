use serde::{Deserialize, Serialize};
use spinlist_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use spinlist_core::services::SlugOptions;
use spinlist_spotify::SpotifyConfig;
use spinlist_storage::StorageConfig;

/// `[slugs]` section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SlugsConfig {
  /// Import the artist's albums when an artist slug is first minted.
  #[serde(default = "default_sync_catalog")]
  pub sync_catalog: bool,

  /// Probe/insert rounds before a contested slug is reported as a conflict.
  #[serde(default = "default_max_insert_attempts")]
  pub max_insert_attempts: u32,
}

fn default_sync_catalog() -> bool {
  true
}

fn default_max_insert_attempts() -> u32 {
  3
}

impl Default for SlugsConfig {
  fn default() -> Self {
    SlugsConfig { sync_catalog: default_sync_catalog(), max_insert_attempts: default_max_insert_attempts() }
  }
}

impl SlugsConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init("slugs")
  }
}

impl From<SlugsConfig> for SlugOptions {
  fn from(cfg: SlugsConfig) -> Self {
    // Zero attempts would fail every allocation without touching the store.
    SlugOptions { sync_catalog: cfg.sync_catalog, max_insert_attempts: cfg.max_insert_attempts.max(1) }
  }
}

/// What `spinlist config` prints. The access token is masked.
#[derive(Debug, Serialize)]
pub struct EffectiveConfigDto {
  pub config_file: String,
  pub storage: StorageConfig,
  pub spotify: SpotifyConfigDto,
  pub slugs: SlugsConfig,
}

#[derive(Debug, Serialize)]
pub struct SpotifyConfigDto {
  pub base_url: String,
  pub access_token: Option<String>,
  pub timeout_ms: u64,
}

impl From<SpotifyConfig> for SpotifyConfigDto {
  fn from(cfg: SpotifyConfig) -> Self {
    SpotifyConfigDto {
      base_url: cfg.base_url,
      access_token: cfg.access_token.map(|t| mask_token(&t)),
      timeout_ms: cfg.timeout_ms,
    }
  }
}

fn mask_token(token: &str) -> String {
  let tail: String = token.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
  if token.chars().count() <= 8 { "****".to_string() } else { format!("****{tail}") }
}
