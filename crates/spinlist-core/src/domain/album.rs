use serde::{Deserialize, Serialize};

use crate::domain::ids::{AlbumId, ExternalId, Slug};

/// An album as persisted in the catalog.
///
/// The `external_id` never changes; `title` and `artist` are whatever the
/// metadata service reported at the last sync. The slug is derived once from
/// the names at first allocation and is not rewritten when they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
  pub id: AlbumId,
  pub external_id: ExternalId,
  pub title: String,
  /// Display name of the first credited artist.
  pub artist: String,
  pub artist_external_id: Option<ExternalId>,
  /// Normalized `YYYY-MM-DD`.
  pub release_date: Option<String>,
  pub label: Option<String>,
  pub image_url: Option<String>,
  /// `None` until the full album has been fetched; an artist catalog
  /// listing only carries the album header.
  pub tracks: Option<Vec<Track>>,
  pub slug: Option<Slug>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
  pub external_id: ExternalId,
  pub name: String,
  pub track_number: u32,
  pub duration_ms: u64,
}

/// Album fields we write on upsert. The surrogate id is decided by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumRecord {
  pub external_id: ExternalId,
  pub title: String,
  pub artist: String,
  pub artist_external_id: Option<ExternalId>,
  pub release_date: Option<String>,
  pub label: Option<String>,
  pub image_url: Option<String>,
  pub tracks: Option<Vec<Track>>,
}
