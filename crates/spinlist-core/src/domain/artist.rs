use serde::{Deserialize, Serialize};

use crate::domain::ids::{ArtistId, ExternalId, Slug};

/// An artist as persisted in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
  pub id: ArtistId,
  pub external_id: ExternalId,
  pub name: String,
  pub image_url: Option<String>,
  pub slug: Option<Slug>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRecord {
  pub external_id: ExternalId,
  pub name: String,
  pub image_url: Option<String>,
}
