pub mod config;
pub mod models;
pub mod schema;

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;
use tracing::debug;

use spinlist_config::ConfigError;
use spinlist_core::domain::{
  Album, AlbumId, AlbumRecord, Artist, ArtistId, ArtistRecord, ExternalId, Namespace, Slug, SlugEntry,
};
use spinlist_core::ports::{SlugStore, StoreError};

pub use crate::config::StorageConfig;
use crate::config::JOURNAL_MODES;
use crate::models::{
  AlbumRow, ArtistRow, album_to_rows, artist_to_rows, now, parse_uuid, row_to_album, row_to_artist,
};
use crate::schema::{album_slugs, albums, artist_slugs, artists};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Failures while opening the database. Once open, every failure goes
/// through the port's [`StoreError`].
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("pool error: {0}")]
  Pool(#[from] PoolError),

  #[error("migration error: {0}")]
  Migration(String),

  #[error("config error: {0}")]
  Config(#[from] ConfigError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("unsupported journal mode: {0}")]
  JournalMode(String),
}

/// PRAGMAs applied to every pooled connection.
#[derive(Debug)]
struct ConnectionOptions {
  journal_mode: Option<String>,
  busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms);
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// `SlugStore` over SQLite.
///
/// Slugs live in one lookup table per namespace (`album_slugs`,
/// `artist_slugs`) keyed by external id, with a UNIQUE slug column. Those two
/// constraints are what turns a lost race into [`StoreError::Conflict`].
#[derive(Clone)]
pub struct SqliteSlugStore {
  pool: SqlitePool,
}

impl SqliteSlugStore {
  /// Opens the database described by the `[storage]` config section.
  pub fn new_from_config() -> Result<Self, StorageError> {
    let cfg = StorageConfig::load()?;
    Self::open(&cfg)
  }

  /// Opens (creating if needed) the database and runs pending migrations.
  pub fn open(cfg: &StorageConfig) -> Result<Self, StorageError> {
    let journal_mode = match &cfg.journal_mode {
      Some(mode) => {
        let upper = mode.to_ascii_uppercase();
        if !JOURNAL_MODES.contains(&upper.as_str()) {
          return Err(StorageError::JournalMode(mode.clone()));
        }
        Some(upper)
      }
      None => None,
    };

    if let Some(parent) = cfg.db_path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let manager = ConnectionManager::<SqliteConnection>::new(cfg.database_url());
    let pool = Pool::builder()
      .max_size(cfg.pool_size.max(1))
      .connection_customizer(Box::new(ConnectionOptions { journal_mode, busy_timeout_ms: cfg.busy_timeout_ms }))
      .build(manager)?;

    {
      let mut pooled = pool.get()?;
      let conn: &mut SqliteConnection = &mut pooled;
      let applied =
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
      debug!(db = %cfg.database_url(), migrations = applied.len(), "storage ready");
    }

    Ok(Self { pool })
  }

  /// Runs a blocking diesel closure on the blocking pool.
  async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
  where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, DieselError> + Send + 'static,
  {
    let pool = self.pool.clone();
    tokio::task::spawn_blocking(move || {
      let mut conn = pool.get().map_err(|e| StoreError::Backend(e.to_string()))?;
      f(&mut conn).map_err(map_diesel_error)
    })
    .await
    .map_err(|e| StoreError::Backend(format!("blocking task failed: {e}")))?
  }
}

fn map_diesel_error(err: DieselError) -> StoreError {
  match err {
    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
      StoreError::Conflict(info.message().to_string())
    }
    other => StoreError::Backend(other.to_string()),
  }
}

/// `prefix%` with LIKE wildcards in `prefix` escaped by `\`.
fn like_prefix(prefix: &str) -> String {
  let mut pattern = String::with_capacity(prefix.len() + 1);
  for c in prefix.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

#[async_trait]
impl SlugStore for SqliteSlugStore {
  async fn find_slug(&self, namespace: Namespace, external_id: &ExternalId) -> Result<Option<Slug>, StoreError> {
    let ext = external_id.to_string();
    let found = self
      .with_conn(move |conn| match namespace {
        Namespace::Album => album_slugs::table
          .filter(album_slugs::external_id.eq(ext))
          .select(album_slugs::slug)
          .first::<String>(conn)
          .optional(),
        Namespace::Artist => artist_slugs::table
          .filter(artist_slugs::external_id.eq(ext))
          .select(artist_slugs::slug)
          .first::<String>(conn)
          .optional(),
      })
      .await?;

    Ok(found.map(Slug::from))
  }

  async fn slugs_with_prefix(&self, namespace: Namespace, prefix: &str) -> Result<Vec<Slug>, StoreError> {
    let pattern = like_prefix(prefix);
    let rows = self
      .with_conn(move |conn| match namespace {
        Namespace::Album => album_slugs::table
          .filter(album_slugs::slug.like(pattern).escape('\\'))
          .select(album_slugs::slug)
          .load::<String>(conn),
        Namespace::Artist => artist_slugs::table
          .filter(artist_slugs::slug.like(pattern).escape('\\'))
          .select(artist_slugs::slug)
          .load::<String>(conn),
      })
      .await?;

    // LIKE is case-insensitive for ASCII in SQLite.
    Ok(rows.into_iter().filter(|s| s.starts_with(prefix)).map(Slug::from).collect())
  }

  async fn insert_slug(
    &self,
    namespace: Namespace,
    external_id: &ExternalId,
    slug: &Slug,
  ) -> Result<(), StoreError> {
    let ext = external_id.to_string();
    let value = slug.to_string();
    let created_at = now();
    debug!(%namespace, external_id = %ext, slug = %value, "inserting slug");

    self
      .with_conn(move |conn| match namespace {
        Namespace::Album => diesel::insert_into(album_slugs::table)
          .values((
            album_slugs::external_id.eq(ext),
            album_slugs::slug.eq(value),
            album_slugs::created_at.eq(created_at),
          ))
          .execute(conn),
        Namespace::Artist => diesel::insert_into(artist_slugs::table)
          .values((
            artist_slugs::external_id.eq(ext),
            artist_slugs::slug.eq(value),
            artist_slugs::created_at.eq(created_at),
          ))
          .execute(conn),
      })
      .await?;

    Ok(())
  }

  async fn resolve_slug(&self, namespace: Namespace, slug: &Slug) -> Result<Option<SlugEntry>, StoreError> {
    let value = slug.to_string();
    let found = self
      .with_conn(move |conn| match namespace {
        Namespace::Album => album_slugs::table
          .filter(album_slugs::slug.eq(value))
          .select((album_slugs::external_id, album_slugs::slug))
          .first::<(String, String)>(conn)
          .optional(),
        Namespace::Artist => artist_slugs::table
          .filter(artist_slugs::slug.eq(value))
          .select((artist_slugs::external_id, artist_slugs::slug))
          .first::<(String, String)>(conn)
          .optional(),
      })
      .await?;

    Ok(found.map(|(external_id, slug)| SlugEntry {
      namespace,
      external_id: ExternalId::from(external_id),
      slug: Slug::from(slug),
    }))
  }

  async fn upsert_album(&self, album: &AlbumRecord) -> Result<AlbumId, StoreError> {
    let (new_row, changes) = album_to_rows(album)?;
    debug!(external_id = %album.external_id, "upserting album");

    let id = self
      .with_conn(move |conn| {
        diesel::insert_into(albums::table)
          .values(&new_row)
          .on_conflict(albums::external_id)
          .do_update()
          .set(&changes)
          .returning(albums::id)
          .get_result::<String>(conn)
      })
      .await?;

    Ok(AlbumId::from_uuid(parse_uuid(&id)?))
  }

  async fn insert_album_if_absent(&self, album: &AlbumRecord) -> Result<bool, StoreError> {
    let (new_row, _) = album_to_rows(album)?;

    let written = self
      .with_conn(move |conn| {
        diesel::insert_into(albums::table)
          .values(&new_row)
          .on_conflict(albums::external_id)
          .do_nothing()
          .execute(conn)
      })
      .await?;

    Ok(written > 0)
  }

  async fn upsert_artist(&self, artist: &ArtistRecord) -> Result<ArtistId, StoreError> {
    let (new_row, changes) = artist_to_rows(artist);
    debug!(external_id = %artist.external_id, "upserting artist");

    let id = self
      .with_conn(move |conn| {
        diesel::insert_into(artists::table)
          .values(&new_row)
          .on_conflict(artists::external_id)
          .do_update()
          .set(&changes)
          .returning(artists::id)
          .get_result::<String>(conn)
      })
      .await?;

    Ok(ArtistId::from_uuid(parse_uuid(&id)?))
  }

  async fn find_album(&self, external_id: &ExternalId) -> Result<Option<Album>, StoreError> {
    let ext = external_id.to_string();
    let found = self
      .with_conn(move |conn| {
        albums::table
          .left_join(album_slugs::table.on(album_slugs::external_id.eq(albums::external_id)))
          .filter(albums::external_id.eq(ext))
          .select((AlbumRow::as_select(), album_slugs::slug.nullable()))
          .first::<(AlbumRow, Option<String>)>(conn)
          .optional()
      })
      .await?;

    found.map(|(row, slug)| row_to_album(row, slug)).transpose()
  }

  async fn find_artist(&self, external_id: &ExternalId) -> Result<Option<Artist>, StoreError> {
    let ext = external_id.to_string();
    let found = self
      .with_conn(move |conn| {
        artists::table
          .left_join(artist_slugs::table.on(artist_slugs::external_id.eq(artists::external_id)))
          .filter(artists::external_id.eq(ext))
          .select((ArtistRow::as_select(), artist_slugs::slug.nullable()))
          .first::<(ArtistRow, Option<String>)>(conn)
          .optional()
      })
      .await?;

    found.map(|(row, slug)| row_to_artist(row, slug)).transpose()
  }
}

#[cfg(test)]
mod tests;
