use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{config::Credentials, error::Res, spotify, types::Token};

/// Seconds before the nominal expiry at which a token is already treated as
/// expired.
const EXPIRY_MARGIN_SECS: u64 = 60;

/// Owns the cached OAuth token and keeps it fresh.
pub struct TokenManager {
    token: Token,
    credentials: Credentials,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, credentials: Credentials, path: PathBuf) -> Self {
        TokenManager {
            token,
            credentials,
            path,
        }
    }

    pub async fn load(path: &Path, credentials: Credentials) -> Res<Self> {
        let content = async_fs::read_to_string(path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self::new(token, credentials, path.to_path_buf()))
    }

    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token that is not about to expire, refreshing and
    /// re-persisting it first when needed.
    pub async fn get_valid_token(&mut self) -> Res<String> {
        if self.is_expired() {
            tracing::info!("access token expired, refreshing");
            let refreshed =
                spotify::auth::refresh_token(&self.credentials, &self.token.refresh_token).await?;
            self.token = refreshed;
            if let Err(e) = self.persist().await {
                tracing::warn!(error = %e, "failed to save refreshed token");
            }
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        token_expired(&self.token, Utc::now().timestamp() as u64)
    }

    pub fn covers_scope(&self, required: &str) -> bool {
        scope_covers(&self.token.scope, required)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether `token` should be refreshed at unix time `now`.
pub fn token_expired(token: &Token, now: u64) -> bool {
    let expires_at = token.obtained_at.saturating_add(token.expires_in);
    now.saturating_add(EXPIRY_MARGIN_SECS) >= expires_at
}

/// Whether every space-separated scope in `required` was granted.
pub fn scope_covers(granted: &str, required: &str) -> bool {
    let granted: Vec<&str> = granted.split_whitespace().collect();
    required
        .split_whitespace()
        .all(|scope| granted.contains(&scope))
}
