//! Configuration management for spotdump.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage the Spotify API credentials, the endpoint URLs and the OAuth scope.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (endpoints only)

use std::{env, path::PathBuf};

use crate::error::{Error, Res};

pub const CLIENT_ID_VAR: &str = "SPOTIPY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIPY_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "SPOTIPY_REDIRECT_URI";

/// Read-only access to private and collaborative playlists plus the library.
pub const SPOTIFY_SCOPE: &str =
    "playlist-read-private playlist-read-collaborative user-library-read";

/// Token cache written to the working directory.
pub const DEFAULT_CACHE_PATH: &str = ".spotifycache";

/// Root directory for export runs.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from `.env` files.
///
/// The working directory is consulted first, then the platform-specific local
/// data directory under `spotdump/.env`:
/// - Linux: `~/.local/share/spotdump/.env`
/// - macOS: `~/Library/Application Support/spotdump/.env`
/// - Windows: `%LOCALAPPDATA%/spotdump/.env`
///
/// Variables that are already set are never overwritten, and missing files
/// are not an error. Only a file that exists but cannot be parsed is reported.
pub async fn load_env() -> Result<(), String> {
    for path in env_files() {
        if !path.is_file() {
            continue;
        }
        dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    }
    Ok(())
}

fn env_files() -> Vec<PathBuf> {
    let mut data_env = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    data_env.push("spotdump/.env");
    vec![PathBuf::from(".env"), data_env]
}

/// Client identity and redirect target for the authorization-code flow.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Credentials {
    /// Reads the three required variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] naming the first variable that is
    /// unset or empty.
    pub fn from_env() -> Res<Self> {
        Ok(Self {
            client_id: required(CLIENT_ID_VAR)?,
            client_secret: required(CLIENT_SECRET_VAR)?,
            redirect_uri: required(REDIRECT_URI_VAR)?,
        })
    }
}

fn required(name: &'static str) -> Res<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::MissingConfig(name)),
    }
}

/// Returns the Spotify Web API base URL.
///
/// Reads `SPOTIFY_API_URL`, falling back to `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns the Spotify OAuth authorization URL.
///
/// Reads `SPOTIFY_API_AUTH_URL`, falling back to the public accounts service.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Reads `SPOTIFY_API_TOKEN_URL`, falling back to the public accounts service.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}
