use std::sync::Arc;

use async_trait::async_trait;
use spinlist_core::domain::Track;
use spinlist_core::ports::{AlbumMetadata, ArtistMetadata, MetadataError, MetadataSource};
use spinlist_core::services::{SlugOptions, SlugService};
use tempfile::TempDir;

use super::*;

fn open_temp() -> (TempDir, SqliteSlugStore) {
  let tmp = tempfile::tempdir().unwrap();
  let store = SqliteSlugStore::open(&StorageConfig::at(tmp.path().join("spinlist.db"))).unwrap();
  (tmp, store)
}

fn id(value: &str) -> ExternalId {
  ExternalId::from(value)
}

fn glow_on() -> AlbumRecord {
  AlbumRecord {
    external_id: id("6dVIqQ8qmQ5GBnJ9shOYGE"),
    title: "Glow On".into(),
    artist: "Turnstile".into(),
    artist_external_id: Some(id("4Z8W4fKeB5YxbusRsdQVPb")),
    release_date: Some("2021-08-27".into()),
    label: Some("Roadrunner Records".into()),
    image_url: None,
    tracks: Some(vec![Track { external_id: id("t1"), name: "MYSTERY".into(), track_number: 1, duration_ms: 179_000 }]),
  }
}

#[test]
fn rejects_unknown_journal_mode() {
  let tmp = tempfile::tempdir().unwrap();
  let mut cfg = StorageConfig::at(tmp.path().join("spinlist.db"));
  cfg.journal_mode = Some("wal; DROP TABLE albums".into());

  assert!(matches!(SqliteSlugStore::open(&cfg), Err(StorageError::JournalMode(_))));
}

#[test]
fn like_prefix_escapes_wildcards() {
  assert_eq!(like_prefix("turnstile"), "turnstile%");
  assert_eq!(like_prefix("100%_pure\\"), "100\\%\\_pure\\\\%");
}

#[tokio::test]
async fn duplicate_external_id_or_slug_is_a_conflict() {
  let (_tmp, store) = open_temp();
  store.insert_slug(Namespace::Artist, &id("a1"), &Slug::from("turnstile")).await.unwrap();

  let same_entity = store.insert_slug(Namespace::Artist, &id("a1"), &Slug::from("turnstile-2")).await;
  let same_slug = store.insert_slug(Namespace::Artist, &id("a2"), &Slug::from("turnstile")).await;

  assert!(matches!(same_entity, Err(StoreError::Conflict(_))));
  assert!(matches!(same_slug, Err(StoreError::Conflict(_))));
}

#[tokio::test]
async fn namespaces_do_not_conflict() {
  let (_tmp, store) = open_temp();
  store.insert_slug(Namespace::Artist, &id("a1"), &Slug::from("glow-on")).await.unwrap();
  store.insert_slug(Namespace::Album, &id("a1"), &Slug::from("glow-on")).await.unwrap();

  assert_eq!(store.find_slug(Namespace::Album, &id("a1")).await.unwrap(), Some(Slug::from("glow-on")));
  assert_eq!(store.find_slug(Namespace::Artist, &id("a1")).await.unwrap(), Some(Slug::from("glow-on")));
}

#[tokio::test]
async fn prefix_query_is_exact_and_wildcard_safe() {
  let (_tmp, store) = open_temp();
  for (ext, slug) in [("1", "x"), ("2", "x-2"), ("3", "xy"), ("4", "ax"), ("5", "x_a"), ("6", "xza")] {
    store.insert_slug(Namespace::Album, &id(ext), &Slug::from(slug)).await.unwrap();
  }

  let mut found: Vec<String> =
    store.slugs_with_prefix(Namespace::Album, "x").await.unwrap().into_iter().map(Slug::into_string).collect();
  found.sort();
  assert_eq!(found, ["x", "x-2", "x_a", "xy", "xza"]);

  let underscored = store.slugs_with_prefix(Namespace::Album, "x_").await.unwrap();
  assert_eq!(underscored, vec![Slug::from("x_a")]);

  assert!(store.slugs_with_prefix(Namespace::Artist, "x").await.unwrap().is_empty());
}

#[tokio::test]
async fn resolve_slug_is_an_exact_point_lookup() {
  let (_tmp, store) = open_temp();
  store.insert_slug(Namespace::Album, &id("al1"), &Slug::from("turnstile-glow-on")).await.unwrap();

  let entry = store.resolve_slug(Namespace::Album, &Slug::from("turnstile-glow-on")).await.unwrap().unwrap();
  assert_eq!(entry.external_id, id("al1"));
  assert_eq!(entry.namespace, Namespace::Album);

  assert!(store.resolve_slug(Namespace::Album, &Slug::from("turnstile-glow")).await.unwrap().is_none());
  assert!(store.resolve_slug(Namespace::Artist, &Slug::from("turnstile-glow-on")).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_album_keeps_surrogate_id_and_updates_fields() {
  let (_tmp, store) = open_temp();
  let mut record = glow_on();

  let first = store.upsert_album(&record).await.unwrap();
  record.title = "Glow On (Deluxe)".into();
  let second = store.upsert_album(&record).await.unwrap();

  assert_eq!(first, second);
  let album = store.find_album(&record.external_id).await.unwrap().unwrap();
  assert_eq!(album.id, first);
  assert_eq!(album.title, "Glow On (Deluxe)");
  assert_eq!(album.tracks.map(|t| t.len()), Some(1));
  assert_eq!(album.slug, None);
}

#[tokio::test]
async fn insert_if_absent_never_overwrites() {
  let (_tmp, store) = open_temp();
  store.upsert_album(&glow_on()).await.unwrap();

  let simplified = AlbumRecord { tracks: None, ..glow_on() };

  assert!(!store.insert_album_if_absent(&simplified).await.unwrap());
  let album = store.find_album(&simplified.external_id).await.unwrap().unwrap();
  assert_eq!(album.tracks.map(|t| t.len()), Some(1));
}

#[tokio::test]
async fn unfetched_tracks_stay_distinct_from_an_empty_list() {
  let (_tmp, store) = open_temp();
  let listed = AlbumRecord { tracks: None, ..glow_on() };
  let empty = AlbumRecord { external_id: id("empty"), tracks: Some(Vec::new()), ..glow_on() };

  store.insert_album_if_absent(&listed).await.unwrap();
  store.upsert_album(&empty).await.unwrap();

  assert_eq!(store.find_album(&listed.external_id).await.unwrap().unwrap().tracks, None);
  assert_eq!(store.find_album(&empty.external_id).await.unwrap().unwrap().tracks, Some(Vec::new()));

  store.upsert_album(&glow_on()).await.unwrap();
  assert_eq!(store.find_album(&listed.external_id).await.unwrap().unwrap().tracks, glow_on().tracks);
}

#[tokio::test]
async fn every_timestamp_is_rfc3339() {
  let (_tmp, store) = open_temp();
  store.upsert_album(&glow_on()).await.unwrap();
  store
    .upsert_artist(&ArtistRecord { external_id: id("4Z8W4fKeB5YxbusRsdQVPb"), name: "Turnstile".into(), image_url: None })
    .await
    .unwrap();
  store.insert_slug(Namespace::Album, &glow_on().external_id, &Slug::from("turnstile-glow-on")).await.unwrap();
  store.insert_slug(Namespace::Artist, &id("4Z8W4fKeB5YxbusRsdQVPb"), &Slug::from("turnstile")).await.unwrap();

  let stamps = store
    .with_conn(|conn| {
      let mut all: Vec<String> = Vec::new();
      for (a, b, c) in albums::table
        .select((albums::created_at, albums::updated_at, albums::last_synced_at))
        .load::<(String, String, String)>(conn)?
      {
        all.extend([a, b, c]);
      }
      for (a, b, c) in artists::table
        .select((artists::created_at, artists::updated_at, artists::last_synced_at))
        .load::<(String, String, String)>(conn)?
      {
        all.extend([a, b, c]);
      }
      all.extend(album_slugs::table.select(album_slugs::created_at).load::<String>(conn)?);
      all.extend(artist_slugs::table.select(artist_slugs::created_at).load::<String>(conn)?);
      Ok(all)
    })
    .await
    .unwrap();

  assert_eq!(stamps.len(), 8);
  for stamp in stamps {
    assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok(), "not RFC 3339: {stamp}");
  }
}

#[tokio::test]
async fn find_artist_carries_its_slug() {
  let (_tmp, store) = open_temp();
  let record =
    ArtistRecord { external_id: id("4Z8W4fKeB5YxbusRsdQVPb"), name: "Turnstile".into(), image_url: None };
  let artist_id = store.upsert_artist(&record).await.unwrap();
  store.insert_slug(Namespace::Artist, &record.external_id, &Slug::from("turnstile")).await.unwrap();

  let artist = store.find_artist(&record.external_id).await.unwrap().unwrap();

  assert_eq!(artist.id, artist_id);
  assert_eq!(artist.slug, Some(Slug::from("turnstile")));
  assert!(store.find_artist(&id("missing")).await.unwrap().is_none());
}

struct OneAlbum(AlbumRecord);

#[async_trait]
impl MetadataSource for OneAlbum {
  async fn album(&self, id: &ExternalId) -> Result<AlbumMetadata, MetadataError> {
    if *id != self.0.external_id {
      return Err(MetadataError::NotFound(format!("album {id}")));
    }
    let r = self.0.clone();
    Ok(AlbumMetadata {
      external_id: r.external_id,
      title: r.title,
      artist: r.artist,
      artist_external_id: r.artist_external_id,
      release_date: r.release_date,
      label: r.label,
      image_url: r.image_url,
      tracks: r.tracks,
    })
  }

  async fn artist(&self, id: &ExternalId) -> Result<ArtistMetadata, MetadataError> {
    Err(MetadataError::NotFound(format!("artist {id}")))
  }

  async fn artist_albums(&self, _id: &ExternalId) -> Result<Vec<AlbumMetadata>, MetadataError> {
    Ok(Vec::new())
  }
}

#[tokio::test]
async fn service_suffixes_against_persisted_slugs() {
  let (_tmp, store) = open_temp();
  store.insert_slug(Namespace::Album, &id("older"), &Slug::from("turnstile-glow-on")).await.unwrap();
  let svc = SlugService::new(store, OneAlbum(glow_on()), SlugOptions::default());

  let slug = svc.album_slug(&glow_on().external_id).await.unwrap();
  assert_eq!(slug, "turnstile-glow-on-2");

  let album = svc.resolve_album(&slug).await.unwrap().unwrap();
  assert_eq!(album.external_id, glow_on().external_id);
  assert_eq!(album.slug, Some(slug));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_allocations_agree_on_one_slug() {
  let (_tmp, store) = open_temp();
  let svc = Arc::new(SlugService::new(store, OneAlbum(glow_on()), SlugOptions::default()));
  let target = glow_on().external_id;

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let svc = svc.clone();
      let target = target.clone();
      tokio::spawn(async move { svc.album_slug(&target).await })
    })
    .collect();

  let mut slugs = Vec::new();
  for handle in handles {
    slugs.push(handle.await.unwrap().unwrap());
  }

  assert!(slugs.iter().all(|s| s == "turnstile-glow-on"));
}
