use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config,
    error::{Error, Res},
    management::TokenManager,
    types::{ApiErrorResponse, Page, PlaylistSummary},
};

const PLAYLISTS_PAGE_LIMIT: u32 = 50;
const SAVED_TRACKS_PAGE_LIMIT: u32 = 50;
const PLAYLIST_TRACKS_PAGE_LIMIT: u32 = 100;

/// The read-only slice of the Spotify Web API an export needs.
///
/// Track listings are returned as raw JSON so that a single malformed entry
/// can be reported and skipped later instead of failing the whole page.
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// First page of `GET /me/playlists`.
    async fn current_user_playlists(&self) -> Res<Page<PlaylistSummary>>;

    /// First page of `GET /me/tracks`.
    async fn current_user_saved_tracks(&self) -> Res<Page<Value>>;

    /// First page of `GET /playlists/{id}/tracks`.
    async fn playlist_tracks(&self, playlist_id: &str) -> Res<Page<Value>>;

    /// Follows a `next` cursor returned by any of the listings above.
    async fn next_page<T>(&self, next: &str) -> Res<Page<T>>
    where
        T: DeserializeOwned + Send + 'static;
}

/// [`LibraryApi`] over HTTPS with a bearer token kept fresh by a
/// [`TokenManager`].
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: config::spotify_apiurl().trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Res<T> {
        let token = self.tokens.lock().await.get_valid_token().await?;

        tracing::debug!(url = %url, "GET");
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = ensure_success(response).await?;

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl LibraryApi for SpotifyClient {
    async fn current_user_playlists(&self) -> Res<Page<PlaylistSummary>> {
        let url = format!(
            "{uri}/me/playlists?limit={limit}",
            uri = self.api_url,
            limit = PLAYLISTS_PAGE_LIMIT
        );
        self.get(&url).await
    }

    async fn current_user_saved_tracks(&self) -> Res<Page<Value>> {
        let url = format!(
            "{uri}/me/tracks?limit={limit}",
            uri = self.api_url,
            limit = SAVED_TRACKS_PAGE_LIMIT
        );
        self.get(&url).await
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Res<Page<Value>> {
        let url = format!(
            "{uri}/playlists/{id}/tracks?limit={limit}",
            uri = self.api_url,
            id = playlist_id,
            limit = PLAYLIST_TRACKS_PAGE_LIMIT
        );
        self.get(&url).await
    }

    async fn next_page<T>(&self, next: &str) -> Res<Page<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.get(next).await
    }
}

/// Passes successful responses through and turns anything else into
/// [`Error::Api`] with the best message the body offers.
pub(crate) async fn ensure_success(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        message: error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        }),
    })
}

/// Extracts a message from either error shape Spotify uses: the Web API's
/// `{"error": {"status", "message"}}` or the accounts service's
/// `{"error", "error_description"}`.
fn error_message(body: &str) -> Option<String> {
    if let Ok(api) = serde_json::from_str::<ApiErrorResponse>(body) {
        return api.error.message;
    }

    let json: Value = serde_json::from_str(body).ok()?;
    json["error_description"]
        .as_str()
        .or_else(|| json["error"].as_str())
        .map(str::to_string)
}
