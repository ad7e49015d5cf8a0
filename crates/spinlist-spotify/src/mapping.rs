//! Web API payloads and their mapping onto the core metadata types.

use serde::Deserialize;
use spinlist_core::domain::{ExternalId, Track};
use spinlist_core::ports::{AlbumMetadata, ArtistMetadata};

use crate::images::{ImageSize, SpotifyImage, image_url, largest_image_url};

/// Album credit used when the API lists no artist at all.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
  pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtistRef {
  pub id: Option<String>,
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
  /// Null for local files.
  pub id: Option<String>,
  pub name: String,
  pub track_number: u32,
  pub duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub album_type: String,
  #[serde(default)]
  pub artists: Vec<SpotifyArtistRef>,
  #[serde(default)]
  pub images: Vec<SpotifyImage>,
  pub release_date: Option<String>,
  pub release_date_precision: Option<String>,
  pub label: Option<String>,
  /// Only present on the full album object, not in artist listings.
  pub tracks: Option<Paging<SpotifyTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub images: Vec<SpotifyImage>,
}

/// Pads partial release dates to `YYYY-MM-DD`.
///
/// `year` precision becomes January 1st, `month` precision the 1st of the
/// month; `day` (or an unknown precision) is kept verbatim.
pub fn normalize_release_date(date: &str, precision: Option<&str>) -> Option<String> {
  let date = date.trim();
  if date.is_empty() {
    return None;
  }

  let normalized = match precision {
    Some("year") => format!("{date}-01-01"),
    Some("month") => format!("{date}-01"),
    _ => date.to_owned(),
  };
  Some(normalized)
}

impl From<SpotifyAlbum> for AlbumMetadata {
  fn from(album: SpotifyAlbum) -> Self {
    let first_artist = album.artists.into_iter().next();
    let release_date = album
      .release_date
      .as_deref()
      .and_then(|date| normalize_release_date(date, album.release_date_precision.as_deref()));
    // Catalog listings omit the track list entirely; keep that apart from an empty one.
    let tracks = album.tracks.map(|page| {
      page
        .items
        .into_iter()
        .filter_map(|t| {
          Some(Track {
            external_id: ExternalId::from(t.id?),
            name: t.name,
            track_number: t.track_number,
            duration_ms: t.duration_ms,
          })
        })
        .collect()
    });

    AlbumMetadata {
      external_id: ExternalId::from(album.id),
      title: album.name,
      artist: first_artist.as_ref().map_or_else(|| UNKNOWN_ARTIST.to_owned(), |a| a.name.clone()),
      artist_external_id: first_artist.and_then(|a| a.id).map(ExternalId::from),
      release_date,
      label: album.label.filter(|l| !l.is_empty()),
      image_url: largest_image_url(&album.images),
      tracks,
    }
  }
}

impl From<SpotifyArtist> for ArtistMetadata {
  fn from(artist: SpotifyArtist) -> Self {
    ArtistMetadata {
      external_id: ExternalId::from(artist.id),
      name: artist.name,
      image_url: image_url(&artist.images, ImageSize::Medium),
    }
  }
}
