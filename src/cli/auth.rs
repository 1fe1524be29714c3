use crate::{
    cli::AuthOptions, config::Credentials, error::Res, management::TokenManager, spotify, success,
};

/// Loads the credentials and returns a manager with a usable token.
pub async fn authenticate(options: &AuthOptions) -> Res<TokenManager> {
    let credentials = Credentials::from_env()?;
    spotify::auth::authorize(credentials, &options.cache_path, options.open_browser).await
}

pub async fn auth(options: AuthOptions) -> Res<()> {
    let manager = authenticate(&options).await?;
    success!(
        "Authentication successful! Token cached at '{}'",
        manager.path().display()
    );
    Ok(())
}
