use tabled::Table;

use crate::{
    cli::{AuthOptions, authenticate},
    error::Res,
    info,
    management::Library,
    spotify::client::SpotifyClient,
    utils,
};

pub async fn playlists(options: AuthOptions) -> Res<()> {
    let tokens = authenticate(&options).await?;
    let mut library = Library::new(SpotifyClient::new(tokens));

    let pb = utils::spinner("Fetching user playlists and saved tracks...");
    let listing = library.list_playlists_and_saved_tracks().await;
    pb.finish_and_clear();
    let (playlists, saved_tracks) = listing?;

    let table = Table::new(utils::playlist_table_rows(&playlists));
    println!("{}", table);
    info!(
        "{} playlists, {} saved tracks",
        playlists.len(),
        saved_tracks.len()
    );
    Ok(())
}
