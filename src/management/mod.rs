mod auth;
mod library;

pub use auth::TokenManager;
pub use auth::scope_covers;
pub use auth::token_expired;
pub use library::Library;
pub use library::sort_playlists;
