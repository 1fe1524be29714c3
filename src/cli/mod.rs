//! # CLI Module
//!
//! Command implementations behind the `spotdump` binary. Each command takes
//! plain option structs, so `main.rs` stays a thin clap front end.
//!
//! ## Commands
//!
//! - [`export`] - Authenticate, list, confirm, fetch every playlist's tracks
//!   and write the full and minimal JSON exports
//! - [`auth`] - Run the authorization flow once and cache the token
//! - [`playlists`] - Show what an export would contain, without writing it
//!
//! ## Data Flow
//!
//! ```text
//! authorize (token cache or pasted redirect URL)
//!     ↓
//! Library::list_playlists_and_saved_tracks
//!     ↓
//! confirm_playlists (skipped with --yes)
//!     ↓
//! Library::tracks_for (per playlist)
//!     ↓
//! export::export
//! ```
//!
//! The export pipeline checks its [`CancellationToken`] between stages, so an
//! interrupt stops the run before the next piece of work starts.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod auth;
mod export;
mod playlists;

use std::path::PathBuf;

use crate::config;

pub use auth::auth;
pub use auth::authenticate;
pub use export::export;
pub use playlists::playlists;

/// Where the token lives and how the operator reaches the consent page.
#[derive(Debug, Clone)]
pub struct AuthOptions {
    pub cache_path: PathBuf,
    pub open_browser: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(config::DEFAULT_CACHE_PATH),
            open_browser: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub auth: AuthOptions,
    pub output_dir: PathBuf,
    /// Skip the interactive confirmation.
    pub assume_yes: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            auth: AuthOptions::default(),
            output_dir: PathBuf::from(config::DEFAULT_OUTPUT_DIR),
            assume_yes: false,
        }
    }
}
