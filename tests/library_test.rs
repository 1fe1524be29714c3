use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use spotdump::{
    Error, Res,
    management::Library,
    spotify::client::LibraryApi,
    types::{Page, Playlist, PlaylistKind, PlaylistSummary},
};

const PLAYLISTS: &str = "me/playlists";
const SAVED_TRACKS: &str = "me/tracks";

// In-memory stand-in for the Spotify API, keyed by endpoint or next-cursor.
#[derive(Default)]
struct FakeApi {
    pages: HashMap<String, Value>,
    requests: Mutex<Vec<String>>,
}

impl FakeApi {
    fn with_page(mut self, key: &str, page: Value) -> Self {
        self.pages.insert(key.to_string(), page);
        self
    }

    fn requests_for(&self, key: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.as_str() == key)
            .count()
    }

    fn fetch<T: DeserializeOwned>(&self, key: &str) -> Res<Page<T>> {
        self.requests.lock().unwrap().push(key.to_string());
        let page = self.pages.get(key).cloned().ok_or_else(|| Error::Api {
            status: 404,
            message: format!("no page registered for {}", key),
        })?;
        Ok(serde_json::from_value(page)?)
    }
}

#[async_trait]
impl LibraryApi for FakeApi {
    async fn current_user_playlists(&self) -> Res<Page<PlaylistSummary>> {
        self.fetch(PLAYLISTS)
    }

    async fn current_user_saved_tracks(&self) -> Res<Page<Value>> {
        self.fetch(SAVED_TRACKS)
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Res<Page<Value>> {
        self.fetch(&playlist_tracks_key(playlist_id))
    }

    async fn next_page<T>(&self, next: &str) -> Res<Page<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.fetch(next)
    }
}

fn playlist_tracks_key(playlist_id: &str) -> String {
    format!("playlists/{}/tracks", playlist_id)
}

fn page(items: Vec<Value>, next: Option<&str>) -> Value {
    json!({ "items": items, "next": next, "total": null })
}

fn playlist_json(id: &str, name: &str, total: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{} description", name),
        "owner": { "display_name": "someone" },
        "tracks": { "total": total }
    })
}

fn track_json(id: &str, name: &str) -> Value {
    json!({
        "added_at": "2024-03-01T10:00:00Z",
        "track": {
            "id": id,
            "name": name,
            "artists": [{ "name": "Artist" }],
            "album": { "name": "Album" },
            "duration_ms": 180000,
            "uri": format!("spotify:track:{}", id),
            "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", id) }
        }
    })
}

fn names(playlists: &[Playlist]) -> Vec<&str> {
    playlists.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn test_listing_excludes_empty_playlists_and_adds_liked_songs() {
    let api = FakeApi::default()
        .with_page(
            PLAYLISTS,
            page(
                vec![playlist_json("rock", "Rock", 2), playlist_json("jazz", "Jazz", 0)],
                None,
            ),
        )
        .with_page(SAVED_TRACKS, page(vec![track_json("s1", "Saved")], None));

    let mut library = Library::new(api);
    let (playlists, saved) = library.list_playlists_and_saved_tracks().await.unwrap();

    assert_eq!(names(&playlists), vec!["Liked Songs", "Rock"]);
    assert_eq!(saved.len(), 1);

    let liked = &playlists[0];
    assert_eq!(liked.id, "liked_songs");
    assert_eq!(liked.kind, PlaylistKind::LikedSongs);
    assert_eq!(liked.tracks_total, 1);
}

#[tokio::test]
async fn test_listing_without_saved_tracks_has_no_liked_songs() {
    let api = FakeApi::default()
        .with_page(PLAYLISTS, page(vec![playlist_json("p", "Mix", 4)], None))
        .with_page(SAVED_TRACKS, page(vec![], None));

    let mut library = Library::new(api);
    let (playlists, saved) = library.list_playlists_and_saved_tracks().await.unwrap();

    assert_eq!(names(&playlists), vec!["Mix"]);
    assert!(saved.is_empty());
}

#[tokio::test]
async fn test_listing_sorts_case_insensitively() {
    let api = FakeApi::default()
        .with_page(
            PLAYLISTS,
            page(
                vec![
                    playlist_json("1", "b", 1),
                    playlist_json("2", "A", 1),
                    playlist_json("3", "c", 1),
                ],
                None,
            ),
        )
        .with_page(SAVED_TRACKS, page(vec![], None));

    let mut library = Library::new(api);
    let (playlists, _) = library.list_playlists_and_saved_tracks().await.unwrap();

    assert_eq!(names(&playlists), vec!["A", "b", "c"]);
}

#[tokio::test]
async fn test_listing_follows_every_page() {
    let api = FakeApi::default()
        .with_page(
            PLAYLISTS,
            page(vec![playlist_json("1", "One", 1)], Some("playlists-page-2")),
        )
        .with_page(
            "playlists-page-2",
            page(vec![playlist_json("2", "Two", 1)], None),
        )
        .with_page(
            SAVED_TRACKS,
            page(vec![track_json("s1", "First")], Some("saved-page-2")),
        )
        .with_page("saved-page-2", page(vec![track_json("s2", "Second")], None));

    let mut library = Library::new(api);
    let (playlists, saved) = library.list_playlists_and_saved_tracks().await.unwrap();

    assert_eq!(names(&playlists), vec!["Liked Songs", "One", "Two"]);
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0]["track"]["id"], "s1");
    assert_eq!(saved[1]["track"]["id"], "s2");
}

#[tokio::test]
async fn test_liked_songs_resolves_to_saved_tracks() {
    let saved = vec![track_json("s1", "Saved One"), track_json("s2", "Saved Two")];
    let api = FakeApi::default()
        .with_page(SAVED_TRACKS, page(saved.clone(), None))
        // a literal playlist with the sentinel id must never be consulted
        .with_page(
            &playlist_tracks_key("liked_songs"),
            page(vec![track_json("x", "Wrong")], None),
        );

    let mut library = Library::new(api);
    let tracks = library.tracks_for_id("liked_songs").await.unwrap();

    assert_eq!(tracks, saved);
    assert_eq!(
        library.api().requests_for(&playlist_tracks_key("liked_songs")),
        0
    );
}

#[tokio::test]
async fn test_liked_songs_reuses_listing_result() {
    let api = FakeApi::default()
        .with_page(PLAYLISTS, page(vec![], None))
        .with_page(SAVED_TRACKS, page(vec![track_json("s1", "Saved")], None));

    let mut library = Library::new(api);
    let (playlists, saved) = library.list_playlists_and_saved_tracks().await.unwrap();
    let tracks = library.tracks_for(&playlists[0]).await.unwrap();

    assert_eq!(tracks, saved);
    assert_eq!(library.api().requests_for(SAVED_TRACKS), 1);
}

#[tokio::test]
async fn test_playlist_tracks_are_fetched_once() {
    let api = FakeApi::default()
        .with_page(
            &playlist_tracks_key("rock"),
            page(vec![track_json("t1", "One")], Some("rock-page-2")),
        )
        .with_page("rock-page-2", page(vec![track_json("t2", "Two")], None));

    let mut library = Library::new(api);
    let first = library.tracks_for_id("rock").await.unwrap();
    let second = library.tracks_for_id("rock").await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(library.api().requests_for(&playlist_tracks_key("rock")), 1);
    assert_eq!(library.api().requests_for("rock-page-2"), 1);
    assert_eq!(library.cached_playlists(), 1);
}

#[tokio::test]
async fn test_null_track_entries_are_kept_for_the_exporter() {
    let api = FakeApi::default().with_page(
        &playlist_tracks_key("p"),
        page(vec![track_json("t1", "One"), Value::Null], None),
    );

    let mut library = Library::new(api);
    let tracks = library.tracks_for_id("p").await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert!(tracks[1].is_null());
}

#[tokio::test]
async fn test_api_errors_propagate() {
    let mut library = Library::new(FakeApi::default());
    let result = library.tracks_for_id("missing").await;

    assert!(matches!(result, Err(Error::Api { status: 404, .. })));
    assert_eq!(library.cached_playlists(), 0);
}
