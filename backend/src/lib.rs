mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use spinlist_config::PATHS;
use spinlist_core::CoreError;
use spinlist_core::domain::{Entity, ExternalId, Namespace, Slug};
use spinlist_core::ports::{MetadataSource, SlugStore};
use spinlist_core::services::{CatalogSync, SlugOptions, SlugService, SyncReport};
use spinlist_core::slugs::is_id;
use spinlist_spotify::{SpotifyClient, SpotifyConfig};
use spinlist_storage::{SqliteSlugStore, StorageConfig};
use tracing::debug;

pub use crate::config::{EffectiveConfigDto, SlugsConfig, SpotifyConfigDto};

/// Type alias to simplify the generic signature of the service.
type ConcreteSlugService = SlugService<SqliteSlugStore, SpotifyClient>;

/// Wired application: adapters injected into the core service.
pub struct AppState {
  slugs: ConcreteSlugService,
  catalog: CatalogSync<SqliteSlugStore, SpotifyClient>,
}

impl AppState {
  /// Builds every adapter from config and injects them into the core service.
  pub fn init(options: SlugOptions) -> Result<Self> {
    // 1. Persistence adapter (SQLite). Fails if the database can't be opened or migrated.
    let store = Arc::new(SqliteSlugStore::new_from_config().context("opening slug store")?);

    // 2. Metadata adapter (Spotify Web API). Fails without an access token.
    let metadata = Arc::new(SpotifyClient::new_from_config().context("building Spotify client")?);

    // 3. Service wiring. Both share the same adapters.
    let catalog = CatalogSync::new(store.clone(), metadata.clone(), options.max_insert_attempts);
    let slugs = SlugService::from_shared(store, metadata, options);

    Ok(AppState { slugs, catalog })
  }

  /// Command: get-or-create the slug of an album.
  pub async fn album_slug(&self, external_id: &str) -> Result<Slug> {
    let slug = self.slugs.album_slug(&ExternalId::from(external_id)).await?;
    Ok(slug)
  }

  /// Command: get-or-create the slug of an artist.
  pub async fn artist_slug(&self, external_id: &str) -> Result<Slug> {
    let slug = self.slugs.artist_slug(&ExternalId::from(external_id)).await?;
    Ok(slug)
  }

  /// Command: imports an artist's albums in the foreground.
  pub async fn sync_catalog(&self, external_id: &str) -> SyncReport {
    self.catalog.run(&ExternalId::from(external_id)).await
  }

  /// Command: turns a page path segment into the entity it names.
  pub async fn resolve_segment(&self, namespace: Namespace, segment: &str) -> Result<Option<Entity>> {
    Ok(resolve_segment(&self.slugs, namespace, segment).await?)
  }
}

/// Entity named by a page path segment, or `None` when there is no such page.
///
/// An id segment gets its slug allocated first, the way a page visit by id
/// would, so both forms land on the same stored entity. An id the provider
/// does not know is a missing page, not a failure.
async fn resolve_segment<S, M>(
  slugs: &SlugService<S, M>,
  namespace: Namespace,
  segment: &str,
) -> Result<Option<Entity>, CoreError>
where
  S: SlugStore + 'static,
  M: MetadataSource + 'static,
{
  let Some(external_id) = slugs.external_id_for(segment, namespace).await? else {
    debug!(%namespace, segment, "segment did not resolve");
    return Ok(None);
  };

  let slug = if is_id(segment) {
    match slugs.get_or_create(namespace, &external_id).await {
      Ok(slug) => slug,
      Err(CoreError::NotFound(what)) => {
        debug!(%namespace, segment, what = %what, "id unknown upstream");
        return Ok(None);
      }
      Err(err) => return Err(err),
    }
  } else {
    Slug::from(segment)
  };

  slugs.resolve(namespace, &slug).await
}

/// Command: the configuration sections as currently in effect.
pub fn effective_config() -> Result<EffectiveConfigDto> {
  let storage = StorageConfig::load().context("loading [storage]")?;
  let spotify = SpotifyConfig::load().context("loading [spotify]")?;
  let slugs = SlugsConfig::load().context("loading [slugs]")?;

  Ok(EffectiveConfigDto {
    config_file: PATHS.config_file().display().to_string(),
    storage,
    spotify: spotify.into(),
    slugs,
  })
}

/// Loads `.env` from the working directory.
///
/// Runs before the subscriber is installed so that `RUST_LOG` may come from
/// the file; the caller logs the outcome. A missing file is not an error.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
  match dotenvy::dotenv() {
    Ok(path) => Ok(Some(path)),
    Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}
