use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{Album, AlbumRecord, Artist, ArtistRecord, Entity, ExternalId, Namespace, Slug, SlugEntry};
use crate::errors::CoreError;
use crate::ports::{MetadataSource, SlugStore};
use crate::services::catalog_sync::CatalogSync;
use crate::slugs::{claim_slug, generate_slug, is_id};

/// Tunables of [`SlugService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugOptions {
  /// Import the artist's albums in the background when an artist slug is minted.
  pub sync_catalog: bool,
  /// Probe/insert rounds before giving up on a slug that keeps being taken.
  pub max_insert_attempts: u32,
}

impl Default for SlugOptions {
  fn default() -> Self {
    Self { sync_catalog: true, max_insert_attempts: 3 }
  }
}

/// Get-or-create and resolve flows over a [`SlugStore`] and a [`MetadataSource`].
///
/// Holds no mutable state of its own; every call asks the store again. Calls
/// for different entities are independent, and two calls racing for the same
/// entity are settled by the store's uniqueness constraints.
pub struct SlugService<S, M>
where
  S: SlugStore + 'static,
  M: MetadataSource + 'static,
{
  store: Arc<S>,
  metadata: Arc<M>,
  options: SlugOptions,
}

impl<S, M> SlugService<S, M>
where
  S: SlugStore + 'static,
  M: MetadataSource + 'static,
{
  pub fn new(store: S, metadata: M, options: SlugOptions) -> Self {
    Self::from_shared(Arc::new(store), Arc::new(metadata), options)
  }

  pub fn from_shared(store: Arc<S>, metadata: Arc<M>, options: SlugOptions) -> Self {
    Self { store, metadata, options }
  }

  // -------- COMMAND (get-or-create) --------

  /// Slug of the album with `external_id`, minting it on first sight.
  ///
  /// 1. existing mapping → returned; no slug is written, but an album row
  ///    that only came from a catalog listing gets its tracks fetched;
  /// 2. album fetched upstream and upserted;
  /// 3. base derived from `"{artist}-{title}"`;
  /// 4. free variant probed and inserted (see [`claim_slug`]).
  pub async fn album_slug(&self, external_id: &ExternalId) -> Result<Slug, CoreError> {
    if let Some(slug) = self.store.find_slug(Namespace::Album, external_id).await? {
      debug!(%external_id, %slug, "album slug already assigned");
      self.fill_missing_tracks(external_id).await;
      return Ok(slug);
    }

    let album = self.metadata.album(external_id).await?;
    let base = generate_slug(&album.slug_source());

    let mut record = AlbumRecord::from(album);
    // The row is keyed by what the caller asked for, even if the provider relinked it.
    record.external_id = external_id.clone();
    self.store.upsert_album(&record).await?;

    let claim =
      claim_slug(&*self.store, Namespace::Album, external_id, &base, self.options.max_insert_attempts).await?;
    if claim.is_created() {
      info!(%external_id, slug = %claim.slug(), "minted album slug");
    }

    Ok(claim.into_slug())
  }

  /// Upserts the full album when its row has no track list yet.
  ///
  /// Best effort: the slug is already assigned, so a failure here is logged
  /// and retried on the next request.
  async fn fill_missing_tracks(&self, external_id: &ExternalId) {
    match self.store.find_album(external_id).await {
      Ok(Some(album)) if album.tracks.is_none() => {}
      Ok(_) => return,
      Err(err) => {
        warn!(%external_id, error = %err, "could not check album tracks");
        return;
      }
    }

    let album = match self.metadata.album(external_id).await {
      Ok(album) => album,
      Err(err) => {
        warn!(%external_id, error = %err, "could not fetch album tracks");
        return;
      }
    };

    let mut record = AlbumRecord::from(album);
    record.external_id = external_id.clone();
    match self.store.upsert_album(&record).await {
      Ok(_) => debug!(%external_id, tracks = record.tracks.as_ref().map_or(0, Vec::len), "album tracks filled in"),
      Err(err) => warn!(%external_id, error = %err, "could not store album tracks"),
    }
  }

  /// Slug of the artist with `external_id`, minting it on first sight.
  ///
  /// A newly minted artist slug also kicks off a detached [`CatalogSync`]
  /// when enabled; its outcome never reaches the caller.
  pub async fn artist_slug(&self, external_id: &ExternalId) -> Result<Slug, CoreError> {
    if let Some(slug) = self.store.find_slug(Namespace::Artist, external_id).await? {
      debug!(%external_id, %slug, "artist slug already assigned");
      return Ok(slug);
    }

    let artist = self.metadata.artist(external_id).await?;
    let base = generate_slug(&artist.name);

    let mut record = ArtistRecord::from(artist);
    record.external_id = external_id.clone();
    self.store.upsert_artist(&record).await?;

    let claim =
      claim_slug(&*self.store, Namespace::Artist, external_id, &base, self.options.max_insert_attempts).await?;
    if claim.is_created() {
      info!(%external_id, slug = %claim.slug(), "minted artist slug");
      if self.options.sync_catalog {
        self.spawn_catalog_sync(external_id.clone());
      }
    }

    Ok(claim.into_slug())
  }

  /// Dispatches to [`Self::album_slug`] or [`Self::artist_slug`].
  pub async fn get_or_create(&self, namespace: Namespace, external_id: &ExternalId) -> Result<Slug, CoreError> {
    match namespace {
      Namespace::Album => self.album_slug(external_id).await,
      Namespace::Artist => self.artist_slug(external_id).await,
    }
  }

  fn spawn_catalog_sync(&self, artist: ExternalId) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
      warn!(%artist, "no async runtime, catalog sync skipped");
      return;
    };

    let sync = CatalogSync::new(self.store.clone(), self.metadata.clone(), self.options.max_insert_attempts);
    handle.spawn(async move {
      sync.run(&artist).await;
    });
  }

  // -------- QUERY (resolve) --------

  /// Single point lookup of `slug` in `namespace`. `None` is the normal
  /// answer for an unknown path segment, not an error.
  pub async fn resolve_entry(&self, namespace: Namespace, slug: &Slug) -> Result<Option<SlugEntry>, CoreError> {
    Ok(self.store.resolve_slug(namespace, slug).await?)
  }

  pub async fn resolve(&self, namespace: Namespace, slug: &Slug) -> Result<Option<Entity>, CoreError> {
    match namespace {
      Namespace::Album => Ok(self.resolve_album(slug).await?.map(Entity::Album)),
      Namespace::Artist => Ok(self.resolve_artist(slug).await?.map(Entity::Artist)),
    }
  }

  pub async fn resolve_album(&self, slug: &Slug) -> Result<Option<Album>, CoreError> {
    let Some(entry) = self.resolve_entry(Namespace::Album, slug).await? else {
      return Ok(None);
    };
    Ok(self.store.find_album(&entry.external_id).await?)
  }

  pub async fn resolve_artist(&self, slug: &Slug) -> Result<Option<Artist>, CoreError> {
    let Some(entry) = self.resolve_entry(Namespace::Artist, slug).await? else {
      return Ok(None);
    };
    Ok(self.store.find_artist(&entry.external_id).await?)
  }

  /// External id behind a path segment.
  ///
  /// Segments that already look like an identifier are returned untouched
  /// without hitting the store; anything else is resolved as a slug.
  pub async fn external_id_for(&self, segment: &str, namespace: Namespace) -> Result<Option<ExternalId>, CoreError> {
    if is_id(segment) {
      return Ok(Some(ExternalId::from(segment)));
    }

    let entry = self.resolve_entry(namespace, &Slug::from(segment)).await?;
    Ok(entry.map(|e| e.external_id))
  }
}
