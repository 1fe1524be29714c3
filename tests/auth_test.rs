use spotdump::{
    Error,
    config::{Credentials, SPOTIFY_SCOPE},
    management::{TokenManager, scope_covers, token_expired},
    spotify::auth::{authorize_url, parse_response_code, token_from_response},
    types::{Token, TokenResponse},
};

fn credentials() -> Credentials {
    Credentials {
        client_id: "client-123".to_string(),
        client_secret: "secret-456".to_string(),
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
    }
}

fn token(obtained_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: SPOTIFY_SCOPE.to_string(),
        expires_in,
        obtained_at,
    }
}

#[test]
fn test_parse_response_code_from_redirect_url() {
    let code = parse_response_code(
        "http://127.0.0.1:8888/callback?code=AQDabc&state=s1",
        Some("s1"),
    )
    .unwrap();
    assert_eq!(code, "AQDabc");
}

#[test]
fn test_parse_response_code_accepts_missing_state() {
    let code =
        parse_response_code("http://127.0.0.1:8888/callback?code=AQDabc", Some("s1")).unwrap();
    assert_eq!(code, "AQDabc");
}

#[test]
fn test_parse_response_code_accepts_bare_code() {
    assert_eq!(parse_response_code("  AQDbare  ", None).unwrap(), "AQDbare");
}

#[test]
fn test_parse_response_code_rejects_bad_redirects() {
    let cases = [
        "",
        "http://127.0.0.1:8888/callback?error=access_denied&state=s1",
        "http://127.0.0.1:8888/callback?code=AQDabc&state=other",
        "http://127.0.0.1:8888/callback?state=s1",
        "http://127.0.0.1:8888/callback?code=&state=s1",
    ];

    for case in cases {
        assert!(
            matches!(parse_response_code(case, Some("s1")), Err(Error::Auth(_))),
            "expected an auth error for {:?}",
            case
        );
    }
}

#[test]
fn test_authorize_url_carries_client_and_scope() {
    let url = authorize_url(&credentials(), "state-xyz").unwrap();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(get("client_id"), Some("client-123"));
    assert_eq!(get("response_type"), Some("code"));
    assert_eq!(get("redirect_uri"), Some("http://127.0.0.1:8888/callback"));
    assert_eq!(get("scope"), Some(SPOTIFY_SCOPE));
    assert_eq!(get("state"), Some("state-xyz"));
    // the secret never leaves through the browser
    assert!(!url.as_str().contains("secret-456"));
}

#[test]
fn test_token_expired_uses_margin() {
    let t = token(1_000, 3_600);

    assert!(!token_expired(&t, 1_000));
    assert!(!token_expired(&t, 4_539));
    assert!(token_expired(&t, 4_540));
    assert!(token_expired(&t, 10_000));
}

#[test]
fn test_scope_covers() {
    assert!(scope_covers(SPOTIFY_SCOPE, SPOTIFY_SCOPE));
    assert!(scope_covers(
        "user-library-read user-top-read playlist-read-collaborative playlist-read-private",
        SPOTIFY_SCOPE
    ));
    assert!(!scope_covers("playlist-read-private", SPOTIFY_SCOPE));
    assert!(!scope_covers("", SPOTIFY_SCOPE));
}

#[test]
fn test_token_from_response_keeps_previous_refresh_token() {
    let response: TokenResponse =
        serde_json::from_str(r#"{"access_token":"new","token_type":"Bearer","expires_in":3600}"#)
            .unwrap();

    let t = token_from_response(response, Some("old-refresh"), 42);

    assert_eq!(t.access_token, "new");
    assert_eq!(t.refresh_token, "old-refresh");
    assert_eq!(t.scope, SPOTIFY_SCOPE);
    assert_eq!(t.expires_in, 3600);
    assert_eq!(t.obtained_at, 42);
}

#[test]
fn test_token_from_response_prefers_rotated_refresh_token() {
    let response: TokenResponse = serde_json::from_str(
        r#"{"access_token":"new","refresh_token":"rotated","scope":"user-library-read","expires_in":60}"#,
    )
    .unwrap();

    let t = token_from_response(response, Some("old-refresh"), 0);

    assert_eq!(t.refresh_token, "rotated");
    assert_eq!(t.scope, "user-library-read");
}

#[tokio::test]
async fn test_token_manager_persists_and_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join(".spotifycache");
    let stored = token(1_700_000_000, 3_600);

    TokenManager::new(stored.clone(), credentials(), path.clone())
        .persist()
        .await
        .unwrap();
    let on_disk: Token = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, stored);

    let loaded = TokenManager::load(&path, credentials()).await.unwrap();
    assert_eq!(loaded.path(), path.as_path());
    assert!(loaded.covers_scope(SPOTIFY_SCOPE));
    // obtained in 2023 with a one hour lifetime
    assert!(loaded.is_expired());
}

#[tokio::test]
async fn test_token_manager_load_fails_on_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".spotifycache");
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(
        TokenManager::load(&path, credentials()).await,
        Err(Error::Json(_))
    ));
}

#[test]
fn test_exit_codes() {
    assert_eq!(Error::Cancelled.exit_code(), 0);
    assert_eq!(Error::MissingConfig("SPOTIPY_CLIENT_ID").exit_code(), 1);
    assert_eq!(Error::Auth("denied".to_string()).exit_code(), 1);
}
