use crate::schema::{albums, artists};

use diesel::prelude::*;
use spinlist_core::domain::{Album, AlbumId, AlbumRecord, Artist, ArtistId, ArtistRecord, ExternalId, Slug, Track};
use spinlist_core::ports::StoreError;
use uuid::Uuid;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = albums)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlbumRow {
  pub id: String,
  pub external_id: String,
  pub title: String,
  pub artist: String,
  pub artist_external_id: Option<String>,
  pub release_date: Option<String>,
  pub label: Option<String>,
  pub image_url: Option<String>,
  pub tracks: Option<String>,
  pub last_synced_at: String,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = albums)]
pub struct NewAlbumRow {
  pub id: String,
  pub external_id: String,
  pub title: String,
  pub artist: String,
  pub artist_external_id: Option<String>,
  pub release_date: Option<String>,
  pub label: Option<String>,
  pub image_url: Option<String>,
  pub tracks: Option<String>,
  pub last_synced_at: String,
  pub created_at: String,
  pub updated_at: String,
}

/// Columns rewritten when an album is upserted again.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = albums, treat_none_as_null = true)]
pub struct AlbumChanges {
  pub title: String,
  pub artist: String,
  pub artist_external_id: Option<String>,
  pub release_date: Option<String>,
  pub label: Option<String>,
  pub image_url: Option<String>,
  pub tracks: Option<String>,
  pub last_synced_at: String,
  pub updated_at: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArtistRow {
  pub id: String,
  pub external_id: String,
  pub name: String,
  pub image_url: Option<String>,
  pub last_synced_at: String,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = artists)]
pub struct NewArtistRow {
  pub id: String,
  pub external_id: String,
  pub name: String,
  pub image_url: Option<String>,
  pub last_synced_at: String,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = artists, treat_none_as_null = true)]
pub struct ArtistChanges {
  pub name: String,
  pub image_url: Option<String>,
  pub last_synced_at: String,
  pub updated_at: String,
}

pub(crate) fn now() -> String {
  chrono::Utc::now().to_rfc3339()
}

pub(crate) fn album_to_rows(album: &AlbumRecord) -> Result<(NewAlbumRow, AlbumChanges), StoreError> {
  let tracks = album
    .tracks
    .as_ref()
    .map(serde_json::to_string)
    .transpose()
    .map_err(|e| StoreError::Backend(format!("encode tracks: {e}")))?;
  let synced_at = now();

  let new_row = NewAlbumRow {
    id: AlbumId::new().to_string(),
    external_id: album.external_id.to_string(),
    title: album.title.clone(),
    artist: album.artist.clone(),
    artist_external_id: album.artist_external_id.as_ref().map(ToString::to_string),
    release_date: album.release_date.clone(),
    label: album.label.clone(),
    image_url: album.image_url.clone(),
    tracks: tracks.clone(),
    last_synced_at: synced_at.clone(),
    created_at: synced_at.clone(),
    updated_at: synced_at.clone(),
  };
  let changes = AlbumChanges {
    title: album.title.clone(),
    artist: album.artist.clone(),
    artist_external_id: new_row.artist_external_id.clone(),
    release_date: album.release_date.clone(),
    label: album.label.clone(),
    image_url: album.image_url.clone(),
    tracks,
    last_synced_at: synced_at.clone(),
    updated_at: synced_at,
  };

  Ok((new_row, changes))
}

pub(crate) fn artist_to_rows(artist: &ArtistRecord) -> (NewArtistRow, ArtistChanges) {
  let synced_at = now();
  let new_row = NewArtistRow {
    id: ArtistId::new().to_string(),
    external_id: artist.external_id.to_string(),
    name: artist.name.clone(),
    image_url: artist.image_url.clone(),
    last_synced_at: synced_at.clone(),
    created_at: synced_at.clone(),
    updated_at: synced_at.clone(),
  };
  let changes = ArtistChanges {
    name: artist.name.clone(),
    image_url: artist.image_url.clone(),
    last_synced_at: synced_at.clone(),
    updated_at: synced_at,
  };
  (new_row, changes)
}

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
  Uuid::parse_str(raw).map_err(|e| StoreError::Backend(format!("invalid uuid {raw:?} in DB: {e}")))
}

pub(crate) fn row_to_album(row: AlbumRow, slug: Option<String>) -> Result<Album, StoreError> {
  let tracks: Option<Vec<Track>> = row
    .tracks
    .as_deref()
    .map(serde_json::from_str)
    .transpose()
    .map_err(|e| StoreError::Backend(format!("decode tracks of {}: {e}", row.external_id)))?;

  Ok(Album {
    id: AlbumId::from_uuid(parse_uuid(&row.id)?),
    external_id: ExternalId::from(row.external_id),
    title: row.title,
    artist: row.artist,
    artist_external_id: row.artist_external_id.map(ExternalId::from),
    release_date: row.release_date,
    label: row.label,
    image_url: row.image_url,
    tracks,
    slug: slug.map(Slug::from),
  })
}

pub(crate) fn row_to_artist(row: ArtistRow, slug: Option<String>) -> Result<Artist, StoreError> {
  Ok(Artist {
    id: ArtistId::from_uuid(parse_uuid(&row.id)?),
    external_id: ExternalId::from(row.external_id),
    name: row.name,
    image_url: row.image_url,
    slug: slug.map(Slug::from),
  })
}
