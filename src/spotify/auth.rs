use std::{io, path::Path};

use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    config::{self, Credentials},
    error::{Error, Res},
    management::TokenManager,
    prompt,
    spotify::client::ensure_success,
    types::{Token, TokenResponse},
    utils, warning,
};

/// Produces a [`TokenManager`] holding a usable token.
///
/// The token cache at `cache_path` is tried first. It is accepted when it
/// parses, grants every scope in [`config::SPOTIFY_SCOPE`] and is either
/// still fresh or can be refreshed. Otherwise the operator is walked through
/// the authorization-code flow:
///
/// 1. The authorization URL (with a random `state`) is printed, and opened in
///    the browser when `open_browser` is set
/// 2. The operator pastes the URL Spotify redirected to
/// 3. The code is extracted from it and exchanged for a token
/// 4. The token is written to `cache_path`
///
/// # Errors
///
/// - [`Error::Auth`] if the pasted URL carries an error, a foreign `state`,
///   or no code at all
/// - [`Error::Api`] / [`Error::Http`] if the code exchange fails
/// - [`Error::Io`] if the cache cannot be written
pub async fn authorize(
    credentials: Credentials,
    cache_path: &Path,
    open_browser: bool,
) -> Res<TokenManager> {
    match TokenManager::load(cache_path, credentials.clone()).await {
        Ok(mut manager) if manager.covers_scope(config::SPOTIFY_SCOPE) => {
            match manager.get_valid_token().await {
                Ok(_) => {
                    tracing::info!(path = %cache_path.display(), "using cached token");
                    return Ok(manager);
                }
                Err(e) => tracing::warn!(error = %e, "cached token could not be refreshed"),
            }
        }
        Ok(_) => tracing::info!("cached token does not grant the required scope"),
        Err(e) => tracing::debug!(error = %e, "no usable token cache"),
    }

    warning!("No valid token found. Please authenticate manually.");

    let state = utils::generate_state();
    let auth_url = authorize_url(&credentials, &state)?;

    if open_browser && webbrowser::open(auth_url.as_str()).is_err() {
        warning!("Failed to open browser. Please navigate to the URL below manually.");
    }

    let response = read_redirect(auth_url.to_string()).await?;
    let code = parse_response_code(&response, Some(&state))?;
    let token = exchange_code(&credentials, &code).await?;

    let manager = TokenManager::new(token, credentials, cache_path.to_path_buf());
    manager.persist().await?;
    Ok(manager)
}

async fn read_redirect(auth_url: String) -> Res<String> {
    let response = tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        prompt::read_redirect_url(&auth_url, &mut input, &mut output)
    })
    .await
    .map_err(io::Error::other)??;

    Ok(response)
}

/// Builds the URL the operator opens to grant access.
pub fn authorize_url(credentials: &Credentials, state: &str) -> Res<Url> {
    let base = config::spotify_apiauth_url();
    Url::parse_with_params(
        &base,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("scope", config::SPOTIFY_SCOPE),
            ("state", state),
        ],
    )
    .map_err(|e| Error::Auth(format!("invalid authorization URL '{}': {}", base, e)))
}

/// Extracts the authorization code from a pasted redirect URL.
///
/// Input that does not parse as a URL is taken to be the bare code. When
/// `expected_state` is given, a redirect carrying a different `state` is
/// rejected; a redirect without any `state` is accepted.
pub fn parse_response_code(response: &str, expected_state: Option<&str>) -> Res<String> {
    let response = response.trim();
    if response.is_empty() {
        return Err(Error::Auth("no redirect URL was entered".to_string()));
    }

    let url = match Url::parse(response) {
        Ok(url) => url,
        Err(_) => return Ok(response.to_string()),
    };

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(Error::Auth(format!("Spotify returned '{}'", value)));
            }
            _ => {}
        }
    }

    if let (Some(expected), Some(received)) = (expected_state, state.as_deref()) {
        if expected != received {
            return Err(Error::Auth(
                "state mismatch in redirect URL, please start over".to_string(),
            ));
        }
    }

    code.filter(|c| !c.is_empty())
        .ok_or_else(|| Error::Auth("no authorization code found in redirect URL".to_string()))
}

/// Exchanges an authorization code for an access token.
///
/// The client authenticates with HTTP Basic credentials built from the client
/// id and secret.
pub async fn exchange_code(credentials: &Credentials, code: &str) -> Res<Token> {
    let client = Client::new();
    let response = client
        .post(config::spotify_apitoken_url())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let body = ensure_success(response).await?.json::<TokenResponse>().await?;
    Ok(token_from_response(body, None, Utc::now().timestamp() as u64))
}

/// Refreshes an expired access token using a refresh token.
///
/// Spotify may omit the refresh token from the response, in which case the
/// one passed in stays valid and is carried over.
pub async fn refresh_token(credentials: &Credentials, refresh_token: &str) -> Res<Token> {
    let client = Client::new();
    let response = client
        .post(config::spotify_apitoken_url())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let body = ensure_success(response).await?.json::<TokenResponse>().await?;
    Ok(token_from_response(
        body,
        Some(refresh_token),
        Utc::now().timestamp() as u64,
    ))
}

/// Turns a token endpoint response into a cacheable [`Token`].
pub fn token_from_response(
    response: TokenResponse,
    previous_refresh_token: Option<&str>,
    obtained_at: u64,
) -> Token {
    Token {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .or_else(|| previous_refresh_token.map(str::to_string))
            .unwrap_or_default(),
        scope: response
            .scope
            .unwrap_or_else(|| config::SPOTIFY_SCOPE.to_string()),
        expires_in: response.expires_in.unwrap_or(3600),
        obtained_at,
    }
}
