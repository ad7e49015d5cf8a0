use spinlist_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `access_token` from the file.
pub const ACCESS_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SpotifyConfig {
  /// Web API root, without trailing slash.
  pub base_url: String,

  /// Bearer token sent with every request. Obtaining and refreshing it is
  /// left to whoever deploys the service.
  pub access_token: Option<String>,

  /// Per-request timeout.
  pub timeout_ms: u64,
}

impl Default for SpotifyConfig {
  fn default() -> Self {
    SpotifyConfig { base_url: "https://api.spotify.com/v1".to_string(), access_token: None, timeout_ms: 10_000 }
  }
}

impl SpotifyConfig {
  /// Loads `[spotify]`, then applies the env override.
  ///
  /// The override is applied after the section is written back, so a token
  /// coming from the environment never lands in the file.
  pub fn load() -> Result<Self, ConfigError> {
    let mut cfg: SpotifyConfig = CONFIG_BACKEND.load_or_init("spotify")?;
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
      if !token.trim().is_empty() {
        cfg.access_token = Some(token);
      }
    }
    Ok(cfg)
  }
}
