use std::io::{self, BufRead, Write};

use crate::types::Playlist;

/// Shows the playlists about to be exported and asks for approval.
///
/// Keeps asking until the answer is `y`, `yes`, `n` or `no` (any case).
/// Reaching the end of `input` counts as a no.
pub fn confirm_playlists<R, W>(
    playlists: &[Playlist],
    input: &mut R,
    output: &mut W,
) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "\nThe following playlists were found:")?;
    for (i, playlist) in playlists.iter().enumerate() {
        writeln!(
            output,
            "{}. {} ({} tracks)",
            i + 1,
            playlist.name,
            playlist.tracks_total
        )?;
    }

    loop {
        write!(output, "\nAre you okay with this list? (y/n): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please enter 'y' for yes or 'n' for no.")?,
        }
    }
}

/// Prints the authorization URL and reads back the URL the browser was
/// redirected to.
pub fn read_redirect_url<R, W>(auth_url: &str, input: &mut R, output: &mut W) -> io::Result<String>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "\nPlease navigate to the following URL to authorize the application:"
    )?;
    writeln!(output, "{}", auth_url)?;
    writeln!(
        output,
        "\nAfter authorizing, you will be redirected to a URL. Please copy and paste that URL here:"
    )?;
    write!(output, "Enter the URL you were redirected to: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
