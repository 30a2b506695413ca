//! Integration tests for the resolve flow.
//!
//! These use a stub provider so no real network calls are made, and a
//! temporary database file per test.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use strophe_core::model::Song;
use strophe_core::schema::Database;
use strophe_fetch::{resolve, FetchError, FetchResult, LyricsProvider, ProviderSong};

/// Stub provider returning a canned song and counting searches.
struct StubProvider {
    song: Option<ProviderSong>,
    calls: AtomicUsize,
}

impl StubProvider {
    fn hit(song: ProviderSong) -> Self {
        Self {
            song: Some(song),
            calls: AtomicUsize::new(0),
        }
    }

    fn miss() -> Self {
        Self {
            song: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LyricsProvider for StubProvider {
    async fn search(
        &self,
        _title: &str,
        _artist: Option<&str>,
    ) -> FetchResult<Option<ProviderSong>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.song.clone())
    }
}

/// Provider that always times out.
struct TimeoutProvider;

#[async_trait]
impl LyricsProvider for TimeoutProvider {
    async fn search(
        &self,
        _title: &str,
        _artist: Option<&str>,
    ) -> FetchResult<Option<ProviderSong>> {
        Err(FetchError::Timeout)
    }
}

fn zombie() -> ProviderSong {
    ProviderSong {
        external_id: 52651,
        title: "Zombie".to_string(),
        artist: "The Cranberries".to_string(),
        lyrics: "Zombie Lyrics\nAnother head hangs lowly".to_string(),
        released: Some(1994),
    }
}

fn temp_db(dir: &TempDir) -> Database {
    Database::open(dir.path().join("test.db")).expect("Failed to open database")
}

#[tokio::test]
async fn test_local_hit_skips_provider() {
    let dir = TempDir::new().unwrap();
    let db = temp_db(&dir);
    db.insert_song(&Song::new("Zombie", "The Cranberries"))
        .unwrap();

    let provider = StubProvider::hit(zombie());
    let song = resolve(&db, &provider, "zombie", Some("the cranberries"))
        .await
        .unwrap()
        .expect("expected a local hit");

    assert_eq!(song.title, "Zombie");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_remote_hit_inserts_once() {
    let dir = TempDir::new().unwrap();
    let db = temp_db(&dir);

    let provider = StubProvider::hit(zombie());
    let song = resolve(&db, &provider, "Zombie", Some("The Cranberries"))
        .await
        .unwrap()
        .expect("expected a provider hit");

    assert_eq!(song.external_id, Some(52651));
    assert_eq!(song.released, Some(1994));
    assert!(song.id.is_some());
    assert_eq!(db.count_songs().unwrap(), 1);

    // Resolving again finds the stored record without another insert.
    let again = resolve(&db, &provider, "Zombie", Some("The Cranberries"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.external_id, Some(52651));
    assert_eq!(db.count_songs().unwrap(), 1);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_insert_skipped_when_resolved_names_already_stored() {
    let dir = TempDir::new().unwrap();
    let db = temp_db(&dir);

    // Stored under the provider's canonical names, but queried with a
    // typo-ish title the provider resolves for us.
    db.insert_song(&Song::new("Zombie", "The Cranberries").with_lyrics("existing"))
        .unwrap();

    let provider = StubProvider::hit(zombie());
    let song = resolve(&db, &provider, "zombi", Some("cranberries"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(song.lyrics, "existing");
    assert_eq!(db.count_songs().unwrap(), 1);
}

#[tokio::test]
async fn test_provider_miss_is_not_found() {
    let dir = TempDir::new().unwrap();
    let db = temp_db(&dir);

    let provider = StubProvider::miss();
    let song = resolve(&db, &provider, "does not exist", None).await.unwrap();

    assert!(song.is_none());
    assert_eq!(db.count_songs().unwrap(), 0);
}

#[tokio::test]
async fn test_empty_title_is_invalid_input_on_both_paths() {
    let dir = TempDir::new().unwrap();
    let db = temp_db(&dir);

    let provider = StubProvider::hit(zombie());
    let err = resolve(&db, &provider, "", Some("test_artist"))
        .await
        .unwrap_err();

    assert!(err.is_invalid_input());
    // The provider is never consulted for an invalid query.
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_timeout_propagates_without_retry() {
    let dir = TempDir::new().unwrap();
    let db = temp_db(&dir);

    let err = resolve(&db, &TimeoutProvider, "Zombie", None)
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(db.count_songs().unwrap(), 0);
}
