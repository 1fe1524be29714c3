use thiserror::Error;

/// Result alias used throughout the crate.
pub type Res<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A required environment variable is absent or empty.
    #[error("Missing Spotify API credentials: {0} is not set. Please check your .env file.")]
    MissingConfig(&'static str),

    /// The authorization flow could not produce a usable token.
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// Spotify answered with a non-success status.
    #[error("Spotify API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The operator interrupted the run.
    #[error("Operation cancelled by user")]
    Cancelled,
}

impl Error {
    /// Process exit status for this error when it reaches `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Cancelled => 0,
            _ => 1,
        }
    }
}
