use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{AlbumRecord, ExternalId, Namespace};
use crate::errors::CoreError;
use crate::ports::{AlbumMetadata, MetadataSource, SlugStore};
use crate::slugs::{claim_slug, generate_slug};

/// Counters of a single catalog sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
  pub albums_seen: usize,
  pub albums_added: usize,
  pub slugs_created: usize,
  pub failures: usize,
}

/// Best-effort import of an artist's albums.
///
/// Runs detached from the request that minted the artist slug: it logs its
/// own failures and never returns them. Listings carry no track list, so
/// albums land with `tracks: None`; [`SlugService::album_slug`] fills them in
/// on the first request for the album.
///
/// [`SlugService::album_slug`]: crate::services::SlugService::album_slug
pub struct CatalogSync<S, M>
where
  S: SlugStore,
  M: MetadataSource,
{
  store: Arc<S>,
  metadata: Arc<M>,
  max_insert_attempts: u32,
}

impl<S, M> CatalogSync<S, M>
where
  S: SlugStore,
  M: MetadataSource,
{
  pub fn new(store: Arc<S>, metadata: Arc<M>, max_insert_attempts: u32) -> Self {
    Self { store, metadata, max_insert_attempts }
  }

  pub async fn run(&self, artist: &ExternalId) -> SyncReport {
    let mut report = SyncReport::default();

    let albums = match self.metadata.artist_albums(artist).await {
      Ok(albums) => albums,
      Err(err) => {
        warn!(%artist, error = %err, "catalog sync: could not list albums");
        report.failures += 1;
        return report;
      }
    };

    // Sequential on purpose: each claim must see the slugs minted by the
    // previous one, or two same-titled albums would probe the same variant.
    for album in albums {
      report.albums_seen += 1;
      let album_id = album.external_id.clone();

      if let Err(err) = self.sync_album(album, &mut report).await {
        warn!(%artist, album = %album_id, error = %err, "catalog sync: album skipped");
        report.failures += 1;
      }
    }

    info!(
      %artist,
      seen = report.albums_seen,
      added = report.albums_added,
      slugs = report.slugs_created,
      failures = report.failures,
      "catalog sync finished"
    );

    report
  }

  async fn sync_album(&self, album: AlbumMetadata, report: &mut SyncReport) -> Result<(), CoreError> {
    if self.store.find_slug(Namespace::Album, &album.external_id).await?.is_some() {
      debug!(album = %album.external_id, "catalog sync: album already known");
      return Ok(());
    }

    let base = generate_slug(&album.slug_source());
    let record = AlbumRecord::from(album);

    if self.store.insert_album_if_absent(&record).await? {
      report.albums_added += 1;
    }

    let claim =
      claim_slug(&*self.store, Namespace::Album, &record.external_id, &base, self.max_insert_attempts).await?;
    if claim.is_created() {
      report.slugs_created += 1;
    }

    Ok(())
  }
}
