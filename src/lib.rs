//! Spotify Playlist Export Library
//!
//! This library provides the building blocks of the `spotdump` CLI: it
//! authenticates against the Spotify Web API, walks the user's playlists and
//! saved tracks page by page, and turns the collected records into a full and
//! a minimal JSON export.
//!
//! # Modules
//!
//! - `cli` - Command implementations (export, auth, playlists)
//! - `config` - Configuration management and environment variables
//! - `error` - Error type shared across the crate
//! - `export` - Track formatting and JSON document generation
//! - `logging` - Diagnostic logging setup
//! - `management` - Token cache and library aggregation
//! - `prompt` - Interactive console prompts
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Small helpers shared by the commands

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod management;
pub mod prompt;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Res};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching tracks for playlist: {}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark.
///
/// Only `main` reports errors this way, right before exiting with
/// [`Error::exit_code`]; library code returns [`Error`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
