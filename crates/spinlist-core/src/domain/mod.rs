pub mod album;
pub mod artist;
pub mod ids;
pub mod namespace;

use serde::{Deserialize, Serialize};

pub use album::{Album, AlbumRecord, Track};
pub use artist::{Artist, ArtistRecord};
pub use ids::{AlbumId, ArtistId, ExternalId, Slug};
pub use namespace::Namespace;

/// Whatever a slug resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
  Album(Album),
  Artist(Artist),
}

impl Entity {
  pub fn external_id(&self) -> &ExternalId {
    match self {
      Entity::Album(album) => &album.external_id,
      Entity::Artist(artist) => &artist.external_id,
    }
  }

  pub fn namespace(&self) -> Namespace {
    match self {
      Entity::Album(_) => Namespace::Album,
      Entity::Artist(_) => Namespace::Artist,
    }
  }
}

/// A persisted slug mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugEntry {
  pub namespace: Namespace,
  pub external_id: ExternalId,
  pub slug: Slug,
}
