//! # Spotify Integration Module
//!
//! This module is the thin layer between spotdump and the Spotify Web API. It
//! covers exactly what an export needs: the authorization-code flow, three
//! read-only listings and the pagination cursor that ties their pages
//! together.
//!
//! ## Architecture
//!
//! ```text
//! CLI (export, auth, playlists)
//!          ↓
//! Management Layer (TokenManager, Library)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code + client secret)
//!     ├── Client (LibraryApi over reqwest)
//!     └── Paging (next-cursor walker)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Builds the authorization URL, extracts the code from the
//!   pasted redirect URL, exchanges and refreshes tokens.
//! - [`client`] - The [`client::LibraryApi`] seam and its HTTP implementation
//!   [`client::SpotifyClient`].
//! - [`paging`] - Follows `next` cursors until the listing is exhausted.
//!
//! ## API Coverage
//!
//! - `GET /me/playlists` - The user's playlists
//! - `GET /me/tracks` - The user's saved tracks
//! - `GET /playlists/{id}/tracks` - A playlist's tracks
//! - `POST /api/token` - Code exchange and token refresh
//!
//! ## Error Handling
//!
//! Non-success statuses become [`crate::Error::Api`] carrying Spotify's own
//! message. Nothing is retried.

pub mod auth;
pub mod client;
pub mod paging;
