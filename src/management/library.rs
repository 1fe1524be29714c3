use std::collections::HashMap;

use serde_json::Value;

use crate::{
    error::Res,
    spotify::{client::LibraryApi, paging},
    types::{Playlist, PlaylistKind},
};

/// Collects the user's playlists and their tracks through a [`LibraryApi`].
///
/// Track lists of remote playlists are kept in a map owned by the instance, so
/// asking twice for the same playlist hits the network once. Nothing is ever
/// evicted; drop the `Library` to forget them.
pub struct Library<A> {
    api: A,
    saved_tracks: Option<Vec<Value>>,
    playlist_tracks: HashMap<String, Vec<Value>>,
}

impl<A: LibraryApi> Library<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            saved_tracks: None,
            playlist_tracks: HashMap::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Lists every non-empty playlist plus a "Liked Songs" entry when the user
    /// has saved tracks, sorted by name without regard to case.
    ///
    /// The saved tracks are returned alongside and remembered for
    /// [`Library::tracks_for`].
    pub async fn list_playlists_and_saved_tracks(&mut self) -> Res<(Vec<Playlist>, Vec<Value>)> {
        let first = self.api.current_user_playlists().await?;
        let mut playlists: Vec<Playlist> = paging::walk(&self.api, first)
            .await?
            .into_iter()
            .map(Playlist::from)
            .filter(|p| p.tracks_total > 0)
            .collect();

        let saved_tracks = self.fetch_saved_tracks().await?;
        if !saved_tracks.is_empty() {
            playlists.push(Playlist::liked_songs(saved_tracks.len() as u64));
        }

        sort_playlists(&mut playlists);
        tracing::info!(
            playlists = playlists.len(),
            saved_tracks = saved_tracks.len(),
            "library listed"
        );

        self.saved_tracks = Some(saved_tracks.clone());
        Ok((playlists, saved_tracks))
    }

    /// Returns the raw track records of `playlist`.
    ///
    /// Liked Songs resolves to the saved tracks and never touches the
    /// playlist-tracks endpoint.
    pub async fn tracks_for(&mut self, playlist: &Playlist) -> Res<Vec<Value>> {
        match playlist.kind {
            PlaylistKind::LikedSongs => self.saved_tracks().await,
            PlaylistKind::Remote => self.remote_tracks(&playlist.id).await,
        }
    }

    /// Same as [`Library::tracks_for`], keyed by playlist id.
    pub async fn tracks_for_id(&mut self, playlist_id: &str) -> Res<Vec<Value>> {
        if playlist_id == Playlist::LIKED_SONGS_ID {
            self.saved_tracks().await
        } else {
            self.remote_tracks(playlist_id).await
        }
    }

    /// Number of remote playlists whose tracks are held in memory.
    pub fn cached_playlists(&self) -> usize {
        self.playlist_tracks.len()
    }

    async fn saved_tracks(&mut self) -> Res<Vec<Value>> {
        if let Some(tracks) = &self.saved_tracks {
            return Ok(tracks.clone());
        }

        let tracks = self.fetch_saved_tracks().await?;
        self.saved_tracks = Some(tracks.clone());
        Ok(tracks)
    }

    async fn remote_tracks(&mut self, playlist_id: &str) -> Res<Vec<Value>> {
        if let Some(tracks) = self.playlist_tracks.get(playlist_id) {
            tracing::debug!(playlist_id, "playlist tracks served from memory");
            return Ok(tracks.clone());
        }

        let first = self.api.playlist_tracks(playlist_id).await?;
        let tracks = paging::walk(&self.api, first).await?;
        self.playlist_tracks
            .insert(playlist_id.to_string(), tracks.clone());
        Ok(tracks)
    }

    async fn fetch_saved_tracks(&self) -> Res<Vec<Value>> {
        let first = self.api.current_user_saved_tracks().await?;
        paging::walk(&self.api, first).await
    }
}

/// Sorts by name ascending, ignoring case. Equal names keep their order.
pub fn sort_playlists(playlists: &mut [Playlist]) {
    playlists.sort_by_cached_key(|p| p.name.to_lowercase());
}
