//! In-memory fakes for the ports, shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{
  Album, AlbumId, AlbumRecord, Artist, ArtistId, ArtistRecord, ExternalId, Namespace, Slug, SlugEntry, Track,
};
use crate::ports::{AlbumMetadata, ArtistMetadata, MetadataError, MetadataSource, SlugStore, StoreError};

#[derive(Default)]
struct State {
  slugs: HashMap<(Namespace, ExternalId), Slug>,
  albums: HashMap<ExternalId, (AlbumId, AlbumRecord)>,
  artists: HashMap<ExternalId, (ArtistId, ArtistRecord)>,
  /// Mapping written by a "concurrent" caller right before our next insert.
  race: Option<(Namespace, ExternalId, Slug)>,
  always_conflict: bool,
  insert_failure: Option<String>,
}

/// `SlugStore` over hash maps, with hooks to simulate races and failures.
#[derive(Default)]
pub struct MemoryStore {
  state: Mutex<State>,
  prefix_reads: AtomicUsize,
  slug_inserts: AtomicUsize,
  album_upserts: AtomicUsize,
}

impl MemoryStore {
  fn state(&self) -> std::sync::MutexGuard<'_, State> {
    self.state.lock().unwrap()
  }

  pub fn seed_slug(&self, namespace: Namespace, external_id: &str, slug: &str) {
    self.state().slugs.insert((namespace, ExternalId::from(external_id)), Slug::from(slug));
  }

  pub fn slug_for(&self, namespace: Namespace, external_id: &str) -> Option<String> {
    self.state().slugs.get(&(namespace, ExternalId::from(external_id))).map(|s| s.as_str().to_owned())
  }

  pub fn arm_race(&self, namespace: Namespace, winner_id: &str, winner_slug: &str) {
    self.state().race = Some((namespace, ExternalId::from(winner_id), Slug::from(winner_slug)));
  }

  pub fn always_conflict(&self) {
    self.state().always_conflict = true;
  }

  pub fn fail_inserts(&self, reason: &str) {
    self.state().insert_failure = Some(reason.to_owned());
  }

  pub fn album_count(&self) -> usize {
    self.state().albums.len()
  }

  pub fn prefix_reads(&self) -> usize {
    self.prefix_reads.load(Ordering::SeqCst)
  }

  pub fn slug_inserts(&self) -> usize {
    self.slug_inserts.load(Ordering::SeqCst)
  }

  pub fn album_upserts(&self) -> usize {
    self.album_upserts.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl SlugStore for MemoryStore {
  async fn find_slug(&self, namespace: Namespace, external_id: &ExternalId) -> Result<Option<Slug>, StoreError> {
    Ok(self.state().slugs.get(&(namespace, external_id.clone())).cloned())
  }

  async fn slugs_with_prefix(&self, namespace: Namespace, prefix: &str) -> Result<Vec<Slug>, StoreError> {
    self.prefix_reads.fetch_add(1, Ordering::SeqCst);
    let state = self.state();
    Ok(
      state
        .slugs
        .iter()
        .filter(|((ns, _), slug)| *ns == namespace && slug.as_str().starts_with(prefix))
        .map(|(_, slug)| slug.clone())
        .collect(),
    )
  }

  async fn insert_slug(
    &self,
    namespace: Namespace,
    external_id: &ExternalId,
    slug: &Slug,
  ) -> Result<(), StoreError> {
    self.slug_inserts.fetch_add(1, Ordering::SeqCst);
    let mut state = self.state();

    if let Some(reason) = &state.insert_failure {
      return Err(StoreError::Backend(reason.clone()));
    }
    if let Some((ns, winner, winner_slug)) = state.race.take() {
      state.slugs.insert((ns, winner), winner_slug);
    }
    if state.always_conflict {
      return Err(StoreError::Conflict("forced".into()));
    }

    let key = (namespace, external_id.clone());
    let slug_taken = state.slugs.iter().any(|((ns, _), s)| *ns == namespace && s == slug);
    if state.slugs.contains_key(&key) || slug_taken {
      return Err(StoreError::Conflict(format!("{namespace}:{slug}")));
    }

    state.slugs.insert(key, slug.clone());
    Ok(())
  }

  async fn resolve_slug(&self, namespace: Namespace, slug: &Slug) -> Result<Option<SlugEntry>, StoreError> {
    let state = self.state();
    Ok(state.slugs.iter().find(|((ns, _), s)| *ns == namespace && *s == slug).map(|((ns, id), s)| {
      SlugEntry { namespace: *ns, external_id: id.clone(), slug: s.clone() }
    }))
  }

  async fn upsert_album(&self, album: &AlbumRecord) -> Result<AlbumId, StoreError> {
    self.album_upserts.fetch_add(1, Ordering::SeqCst);
    let mut state = self.state();
    let id = state.albums.get(&album.external_id).map(|(id, _)| *id).unwrap_or_default();
    state.albums.insert(album.external_id.clone(), (id, album.clone()));
    Ok(id)
  }

  async fn insert_album_if_absent(&self, album: &AlbumRecord) -> Result<bool, StoreError> {
    let mut state = self.state();
    if state.albums.contains_key(&album.external_id) {
      return Ok(false);
    }
    state.albums.insert(album.external_id.clone(), (AlbumId::new(), album.clone()));
    Ok(true)
  }

  async fn upsert_artist(&self, artist: &ArtistRecord) -> Result<ArtistId, StoreError> {
    let mut state = self.state();
    let id = state.artists.get(&artist.external_id).map(|(id, _)| *id).unwrap_or_default();
    state.artists.insert(artist.external_id.clone(), (id, artist.clone()));
    Ok(id)
  }

  async fn find_album(&self, external_id: &ExternalId) -> Result<Option<Album>, StoreError> {
    let state = self.state();
    Ok(state.albums.get(external_id).map(|(id, record)| Album {
      id: *id,
      external_id: record.external_id.clone(),
      title: record.title.clone(),
      artist: record.artist.clone(),
      artist_external_id: record.artist_external_id.clone(),
      release_date: record.release_date.clone(),
      label: record.label.clone(),
      image_url: record.image_url.clone(),
      tracks: record.tracks.clone(),
      slug: state.slugs.get(&(Namespace::Album, external_id.clone())).cloned(),
    }))
  }

  async fn find_artist(&self, external_id: &ExternalId) -> Result<Option<Artist>, StoreError> {
    let state = self.state();
    Ok(state.artists.get(external_id).map(|(id, record)| Artist {
      id: *id,
      external_id: record.external_id.clone(),
      name: record.name.clone(),
      image_url: record.image_url.clone(),
      slug: state.slugs.get(&(Namespace::Artist, external_id.clone())).cloned(),
    }))
  }
}

/// Scripted metadata provider.
#[derive(Default)]
pub struct FakeMetadata {
  albums: HashMap<ExternalId, AlbumMetadata>,
  artists: HashMap<ExternalId, ArtistMetadata>,
  catalogs: HashMap<ExternalId, Result<Vec<AlbumMetadata>, MetadataError>>,
  outage: Option<String>,
  calls: AtomicUsize,
}

impl FakeMetadata {
  pub fn with_album(mut self, album: AlbumMetadata) -> Self {
    self.albums.insert(album.external_id.clone(), album);
    self
  }

  pub fn with_artist(mut self, artist: ArtistMetadata) -> Self {
    self.artists.insert(artist.external_id.clone(), artist);
    self
  }

  pub fn with_catalog(mut self, artist_id: &str, albums: Vec<AlbumMetadata>) -> Self {
    self.catalogs.insert(ExternalId::from(artist_id), Ok(albums));
    self
  }

  pub fn with_catalog_error(mut self, artist_id: &str, err: MetadataError) -> Self {
    self.catalogs.insert(ExternalId::from(artist_id), Err(err));
    self
  }

  pub fn with_outage(mut self, reason: &str) -> Self {
    self.outage = Some(reason.to_owned());
    self
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  fn check_outage(&self) -> Result<(), MetadataError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match &self.outage {
      Some(reason) => Err(MetadataError::Transport(reason.clone())),
      None => Ok(()),
    }
  }
}

#[async_trait]
impl MetadataSource for FakeMetadata {
  async fn album(&self, id: &ExternalId) -> Result<AlbumMetadata, MetadataError> {
    self.check_outage()?;
    self.albums.get(id).cloned().ok_or_else(|| MetadataError::NotFound(format!("album {id}")))
  }

  async fn artist(&self, id: &ExternalId) -> Result<ArtistMetadata, MetadataError> {
    self.check_outage()?;
    self.artists.get(id).cloned().ok_or_else(|| MetadataError::NotFound(format!("artist {id}")))
  }

  async fn artist_albums(&self, id: &ExternalId) -> Result<Vec<AlbumMetadata>, MetadataError> {
    self.check_outage()?;
    self.catalogs.get(id).cloned().unwrap_or_else(|| Ok(Vec::new()))
  }
}

pub fn album_meta(id: &str, artist: &str, title: &str) -> AlbumMetadata {
  AlbumMetadata {
    external_id: ExternalId::from(id),
    title: title.to_owned(),
    artist: artist.to_owned(),
    artist_external_id: None,
    release_date: Some("2021-08-27".to_owned()),
    label: None,
    image_url: None,
    tracks: Some(Vec::new()),
  }
}

/// The album as an artist catalog listing reports it: no track list.
pub fn listed(album: AlbumMetadata) -> AlbumMetadata {
  AlbumMetadata { tracks: None, ..album }
}

pub fn track(id: &str, number: u32) -> Track {
  Track { external_id: ExternalId::from(id), name: format!("Track {number}"), track_number: number, duration_ms: 180_000 }
}

pub fn artist_meta(id: &str, name: &str) -> ArtistMetadata {
  ArtistMetadata { external_id: ExternalId::from(id), name: name.to_owned(), image_url: None }
}
