use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use spinlist_config::ConfigError;
use spinlist_core::domain::ExternalId;
use spinlist_core::ports::{AlbumMetadata, ArtistMetadata, MetadataError, MetadataSource};
use thiserror::Error;
use tracing::debug;

use crate::config::{ACCESS_TOKEN_ENV, SpotifyConfig};
use crate::mapping::{Paging, SpotifyAlbum, SpotifyArtist};

/// Page size of the artist album listing. Only the first page is read.
const ARTIST_ALBUMS_LIMIT: &str = "50";

#[derive(Debug, Error)]
pub enum SpotifyClientError {
  #[error("missing access token: set [spotify].access_token or {ACCESS_TOKEN_ENV}")]
  MissingToken,

  #[error("invalid base url {0:?}")]
  BaseUrl(String),

  #[error("http client error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("config error: {0}")]
  Config(#[from] ConfigError),
}

/// `MetadataSource` over the Spotify Web API.
#[derive(Clone)]
pub struct SpotifyClient {
  http: Client,
  base_url: Url,
  access_token: String,
}

impl SpotifyClient {
  pub fn new(config: &SpotifyConfig) -> Result<Self, SpotifyClientError> {
    let access_token = config
      .access_token
      .clone()
      .filter(|t| !t.trim().is_empty())
      .ok_or(SpotifyClientError::MissingToken)?;
    let base_url = Url::parse(&config.base_url).map_err(|_| SpotifyClientError::BaseUrl(config.base_url.clone()))?;
    if base_url.cannot_be_a_base() {
      return Err(SpotifyClientError::BaseUrl(config.base_url.clone()));
    }

    let http = Client::builder().timeout(Duration::from_millis(config.timeout_ms)).build()?;

    Ok(Self { http, base_url, access_token })
  }

  pub fn new_from_config() -> Result<Self, SpotifyClientError> {
    let cfg = SpotifyConfig::load()?;
    Self::new(&cfg)
  }

  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    // `new` rejected cannot-be-a-base urls, so this always yields segments.
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    url: Url,
    query: &[(&str, &str)],
    what: &str,
  ) -> Result<T, MetadataError> {
    debug!(%url, "spotify request");

    let response = self
      .http
      .get(url)
      .query(query)
      .bearer_auth(&self.access_token)
      .send()
      .await
      .map_err(|e| MetadataError::Transport(format!("{what}: {e}")))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Err(MetadataError::NotFound(what.to_owned()));
    }
    if !status.is_success() {
      return Err(MetadataError::Transport(format!("{what}: HTTP {status}")));
    }

    let body = response.text().await.map_err(|e| MetadataError::Transport(format!("{what}: {e}")))?;
    serde_json::from_str(&body).map_err(|e| MetadataError::Decode(format!("{what}: {e}")))
  }
}

#[async_trait]
impl MetadataSource for SpotifyClient {
  async fn album(&self, id: &ExternalId) -> Result<AlbumMetadata, MetadataError> {
    let url = self.endpoint(&["albums", id.as_str()]);
    let album: SpotifyAlbum = self.get_json(url, &[], &format!("album {id}")).await?;
    Ok(album.into())
  }

  async fn artist(&self, id: &ExternalId) -> Result<ArtistMetadata, MetadataError> {
    let url = self.endpoint(&["artists", id.as_str()]);
    let artist: SpotifyArtist = self.get_json(url, &[], &format!("artist {id}")).await?;
    Ok(artist.into())
  }

  async fn artist_albums(&self, id: &ExternalId) -> Result<Vec<AlbumMetadata>, MetadataError> {
    let url = self.endpoint(&["artists", id.as_str(), "albums"]);
    let query = [("include_groups", "album"), ("limit", ARTIST_ALBUMS_LIMIT)];
    let page: Paging<SpotifyAlbum> = self.get_json(url, &query, &format!("albums of artist {id}")).await?;

    // include_groups=album still leaks singles/compilations for some artists
    Ok(page.items.into_iter().filter(|a| a.album_type == "album").map(AlbumMetadata::from).collect())
  }
}
