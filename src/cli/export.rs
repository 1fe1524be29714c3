use std::io;

use tokio_util::sync::CancellationToken;

use crate::{
    cli::{ExportOptions, authenticate},
    error::{Error, Res},
    export::{self, PlaylistExport},
    info,
    management::Library,
    prompt,
    spotify::client::SpotifyClient,
    success,
    types::Playlist,
    utils,
};

pub async fn export(options: ExportOptions, cancel: CancellationToken) -> Res<()> {
    info!("Starting Spotify authentication process...");
    let tokens = authenticate(&options.auth).await?;
    checkpoint(&cancel)?;

    success!("Authentication successful. Fetching user playlists and saved tracks...");
    let mut library = Library::new(SpotifyClient::new(tokens));

    let pb = utils::spinner("Fetching user playlists and saved tracks...");
    let listing = library.list_playlists_and_saved_tracks().await;
    pb.finish_and_clear();
    let (playlists, _saved_tracks) = listing?;
    checkpoint(&cancel)?;

    if !options.assume_yes && !confirm(playlists.clone()).await? {
        info!("Operation cancelled by user. Exiting...");
        return Ok(());
    }

    let mut entries = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        checkpoint(&cancel)?;
        info!("Fetching tracks for playlist: {}", playlist.name);
        let tracks = library.tracks_for(&playlist).await?;
        entries.push(PlaylistExport::new(playlist, tracks));
    }
    checkpoint(&cancel)?;

    info!("Exporting all playlist data to JSON...");
    let dir = export::export(&entries, &options.output_dir).await?;
    success!(
        "Playlist data has been exported to the directory: '{}'",
        dir.display()
    );
    success!("Export completed successfully!");
    Ok(())
}

fn checkpoint(cancel: &CancellationToken) -> Res<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    Ok(())
}

async fn confirm(playlists: Vec<Playlist>) -> Res<bool> {
    let confirmed = tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        prompt::confirm_playlists(&playlists, &mut input, &mut output)
    })
    .await
    .map_err(io::Error::other)??;

    Ok(confirmed)
}
