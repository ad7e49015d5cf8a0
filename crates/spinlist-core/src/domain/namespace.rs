use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scope in which slug uniqueness is enforced.
///
/// An album and an artist may share the very same slug string: each namespace
/// is backed by its own table and probed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
  Album,
  Artist,
}

impl Namespace {
  pub fn as_str(&self) -> &'static str {
    match self {
      Namespace::Album => "album",
      Namespace::Artist => "artist",
    }
  }
}

impl fmt::Display for Namespace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown namespace: {0}")]
pub struct UnknownNamespace(pub String);

impl FromStr for Namespace {
  type Err = UnknownNamespace;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "album" | "albums" => Ok(Namespace::Album),
      "artist" | "artists" => Ok(Namespace::Artist),
      other => Err(UnknownNamespace(other.to_owned())),
    }
  }
}
