use async_trait::async_trait;

use crate::domain::{
  Album, AlbumId, AlbumRecord, Artist, ArtistId, ArtistRecord, ExternalId, Namespace, Slug, SlugEntry,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
  /// A uniqueness constraint rejected the write.
  ///
  /// The allocator relies on this variant being distinguishable from any
  /// other failure: it is how a lost race is detected.
  #[error("unique constraint violated: {0}")]
  Conflict(String),

  #[error("storage error: {0}")]
  Backend(String),
}

/// Durable mapping between external ids, entity rows and slugs.
///
/// Implementations own all persistent state; the service above is stateless
/// and asks the store again on every call.
#[async_trait]
pub trait SlugStore: Send + Sync {
  /// Point lookup of the slug assigned to `external_id`.
  async fn find_slug(&self, namespace: Namespace, external_id: &ExternalId) -> Result<Option<Slug>, StoreError>;

  /// Every slug in `namespace` that starts with `prefix`, in a single read.
  async fn slugs_with_prefix(&self, namespace: Namespace, prefix: &str) -> Result<Vec<Slug>, StoreError>;

  /// Inserts a new mapping. Fails with [`StoreError::Conflict`] when either the
  /// external id or the slug value already has a mapping.
  async fn insert_slug(
    &self,
    namespace: Namespace,
    external_id: &ExternalId,
    slug: &Slug,
  ) -> Result<(), StoreError>;

  /// Exact-match reverse lookup.
  async fn resolve_slug(&self, namespace: Namespace, slug: &Slug) -> Result<Option<SlugEntry>, StoreError>;

  /// Insert-or-update keyed by external id. Returns the surrogate id.
  async fn upsert_album(&self, album: &AlbumRecord) -> Result<AlbumId, StoreError>;

  /// Inserts the row only if no album with that external id exists yet.
  /// Returns `true` when a row was written.
  async fn insert_album_if_absent(&self, album: &AlbumRecord) -> Result<bool, StoreError>;

  async fn upsert_artist(&self, artist: &ArtistRecord) -> Result<ArtistId, StoreError>;

  async fn find_album(&self, external_id: &ExternalId) -> Result<Option<Album>, StoreError>;

  async fn find_artist(&self, external_id: &ExternalId) -> Result<Option<Artist>, StoreError>;
}
