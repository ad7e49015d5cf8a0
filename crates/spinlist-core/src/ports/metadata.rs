use async_trait::async_trait;

use crate::domain::{AlbumRecord, ArtistRecord, ExternalId, Track};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
  /// The provider answered, and the entity does not exist.
  #[error("{0} does not exist upstream")]
  NotFound(String),

  #[error("transport error: {0}")]
  Transport(String),

  #[error("decode error: {0}")]
  Decode(String),
}

/// What the provider tells us about an album.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumMetadata {
  pub external_id: ExternalId,
  pub title: String,
  /// First credited artist.
  pub artist: String,
  pub artist_external_id: Option<ExternalId>,
  pub release_date: Option<String>,
  pub label: Option<String>,
  pub image_url: Option<String>,
  /// `None` when the payload carried no track list (catalog listings).
  pub tracks: Option<Vec<Track>>,
}

impl AlbumMetadata {
  /// String the album slug is derived from, artist first so that two artists'
  /// albums with the same title do not collide.
  pub fn slug_source(&self) -> String {
    format!("{}-{}", self.artist, self.title)
  }
}

impl From<AlbumMetadata> for AlbumRecord {
  fn from(meta: AlbumMetadata) -> Self {
    AlbumRecord {
      external_id: meta.external_id,
      title: meta.title,
      artist: meta.artist,
      artist_external_id: meta.artist_external_id,
      release_date: meta.release_date,
      label: meta.label,
      image_url: meta.image_url,
      tracks: meta.tracks,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistMetadata {
  pub external_id: ExternalId,
  pub name: String,
  pub image_url: Option<String>,
}

impl From<ArtistMetadata> for ArtistRecord {
  fn from(meta: ArtistMetadata) -> Self {
    ArtistRecord { external_id: meta.external_id, name: meta.name, image_url: meta.image_url }
  }
}

/// Read-only port over the third-party metadata provider.
///
/// Possible implementations:
/// - Spotify Web API
/// - a canned fixture in tests
#[async_trait]
pub trait MetadataSource: Send + Sync {
  async fn album(&self, id: &ExternalId) -> Result<AlbumMetadata, MetadataError>;

  async fn artist(&self, id: &ExternalId) -> Result<ArtistMetadata, MetadataError>;

  /// Full-length albums of an artist. Tracks are left empty; they are
  /// fetched lazily when the album itself is opened.
  async fn artist_albums(&self, id: &ExternalId) -> Result<Vec<AlbumMetadata>, MetadataError>;
}
