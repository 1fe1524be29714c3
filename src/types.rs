use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// OAuth token as stored in the token cache file.
///
/// `obtained_at` is a unix timestamp in seconds; together with `expires_in`
/// it tells when the access token has to be refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Body of a successful `POST /api/token` call.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

/// Body of a failed API call.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// The `error` object inside [`ApiErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub status: Option<u16>,
    pub message: Option<String>,
}

/// One page of a paginated listing.
///
/// `next` holds the absolute URL of the following page, or `None` on the
/// last one.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// A simplified playlist object from `GET /me/playlists`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<PlaylistOwner>,
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    /// A playlist fetched from `/me/playlists`.
    Remote,
    /// The user's saved tracks, presented as a playlist.
    LikedSongs,
}

/// A playlist as listed, confirmed and exported by spotdump.
///
/// Built from a [`PlaylistSummary`] for regular playlists, or through
/// [`Playlist::liked_songs`] for the user's saved tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<String>,
    pub tracks_total: u64,
    pub kind: PlaylistKind,
}

impl Playlist {
    pub const LIKED_SONGS_ID: &'static str = "liked_songs";
    pub const LIKED_SONGS_NAME: &'static str = "Liked Songs";

    /// The pseudo-playlist standing in for the user's saved tracks.
    pub fn liked_songs(tracks_total: u64) -> Self {
        Self {
            id: Self::LIKED_SONGS_ID.to_string(),
            name: Self::LIKED_SONGS_NAME.to_string(),
            description: String::new(),
            owner: None,
            tracks_total,
            kind: PlaylistKind::LikedSongs,
        }
    }
}

impl From<PlaylistSummary> for Playlist {
    fn from(summary: PlaylistSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name.unwrap_or_default(),
            description: summary.description.unwrap_or_default(),
            owner: summary.owner.and_then(|o| o.display_name),
            tracks_total: summary.tracks.map_or(0, |t| t.total),
            kind: PlaylistKind::Remote,
        }
    }
}

/// Row of the table printed by the `playlists` command.
#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub owner: String,
    pub tracks: u64,
}
