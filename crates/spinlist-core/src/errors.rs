// crates/spinlist-core/src/errors.rs
use thiserror::Error;

use crate::ports::{MetadataError, StoreError};

/// Error surfaced by the slug service.
///
/// Callers (page routing, the CLI) decide what the user sees. `NotFound`
/// is the "no such page" case; everything else is fatal for the request.
#[derive(Debug, Error)]
pub enum CoreError {
  /// The external id does not correspond to anything upstream.
  #[error("not found: {0}")]
  NotFound(String),

  #[error("metadata error: {0}")]
  Metadata(String),

  #[error("repository error: {0}")]
  Repository(String),

  /// The chosen slug kept colliding with other entities after every retry.
  #[error("slug conflict: {0}")]
  Conflict(String),
}

impl From<StoreError> for CoreError {
  fn from(err: StoreError) -> Self {
    CoreError::Repository(err.to_string())
  }
}

impl From<MetadataError> for CoreError {
  fn from(err: MetadataError) -> Self {
    match err {
      MetadataError::NotFound(what) => CoreError::NotFound(what),
      other => CoreError::Metadata(other.to_string()),
    }
  }
}
