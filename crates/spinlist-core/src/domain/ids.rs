use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Surrogate key of a persisted album row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumId(Uuid);

impl AlbumId {
  /// Generates a fresh identifier.
  pub fn new() -> Self {
    AlbumId(Uuid::new_v4())
  }

  pub fn from_uuid(u: Uuid) -> Self {
    AlbumId(u)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for AlbumId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for AlbumId {
  fn from(u: Uuid) -> Self {
    AlbumId(u)
  }
}

impl From<AlbumId> for Uuid {
  fn from(id: AlbumId) -> Self {
    id.0
  }
}

impl fmt::Display for AlbumId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Surrogate key of a persisted artist row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistId(Uuid);

impl ArtistId {
  pub fn new() -> Self {
    ArtistId(Uuid::new_v4())
  }

  pub fn from_uuid(u: Uuid) -> Self {
    ArtistId(u)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for ArtistId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for ArtistId {
  fn from(u: Uuid) -> Self {
    ArtistId(u)
  }
}

impl From<ArtistId> for Uuid {
  fn from(id: ArtistId) -> Self {
    id.0
  }
}

impl fmt::Display for ArtistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Opaque identifier issued by the metadata service.
///
/// Immutable and globally unique on the provider side. We never parse it,
/// we only carry it around and use it as the natural key of our rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
  pub fn new(value: impl Into<String>) -> Self {
    ExternalId(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_string(self) -> String {
    self.0
  }
}

impl From<String> for ExternalId {
  fn from(value: String) -> Self {
    ExternalId(value)
  }
}

impl From<&str> for ExternalId {
  fn from(value: &str) -> Self {
    ExternalId(value.to_owned())
  }
}

impl fmt::Display for ExternalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// URL-safe token identifying one entity inside its [`Namespace`].
///
/// [`Namespace`]: crate::domain::Namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
  pub fn new(value: impl Into<String>) -> Self {
    Slug(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_string(self) -> String {
    self.0
  }
}

impl From<String> for Slug {
  fn from(value: String) -> Self {
    Slug(value)
  }
}

impl From<&str> for Slug {
  fn from(value: &str) -> Self {
    Slug(value.to_owned())
  }
}

impl PartialEq<str> for Slug {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

impl PartialEq<&str> for Slug {
  fn eq(&self, other: &&str) -> bool {
    self.0 == *other
  }
}

impl fmt::Display for Slug {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
