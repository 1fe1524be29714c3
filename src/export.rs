//! Export of collected playlists to JSON.
//!
//! Every run produces two documents side by side:
//!
//! - `full_export.json` keeps every field spotdump knows about a track
//! - `minimal_export.json` keeps one `"name - [artist, artist]"` line per track
//!
//! Both are written into `output/spotify_export_<YYYY_MM_DD_HH_MM_SS>/`.
//! Malformed records are logged and never abort an export. A record lacking
//! its `track` object is kept in the full export as an empty track and left
//! out of the minimal one; null records are dropped from both.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{error::Res, types::Playlist};

pub const FULL_EXPORT_FILE: &str = "full_export.json";
pub const MINIMAL_EXPORT_FILE: &str = "minimal_export.json";

const DEFAULT_OWNER: &str = "You";
const EXPORT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const DIR_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormattedTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_ms: u64,
    pub added_at: String,
    pub uri: String,
    pub external_url: String,
}

impl FormattedTrack {
    /// `"{name} - [{artist, artist}]"`, the line used in the minimal export.
    pub fn display_line(&self) -> String {
        format!("{} - [{}]", self.name, self.artists.join(", "))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TrackShapeError {
    #[error("track record is not an object: {0}")]
    NotAnObject(String),
    #[error("track record has no 'track' object: {0}")]
    MissingTrack(String),
}

/// Projects a raw playlist-membership record onto a [`FormattedTrack`].
///
/// Only the shape is checked: the record must be an object holding a `track`
/// object. Any field missing below that falls back to `""`, `0` or `[]`.
pub fn try_format_track(record: &Value) -> Result<FormattedTrack, TrackShapeError> {
    let membership = record
        .as_object()
        .ok_or_else(|| TrackShapeError::NotAnObject(record.to_string()))?;
    let track = membership
        .get("track")
        .filter(|t| t.is_object())
        .ok_or_else(|| TrackShapeError::MissingTrack(record.to_string()))?;

    Ok(FormattedTrack {
        id: str_field(&track["id"]),
        name: str_field(&track["name"]),
        artists: track["artists"]
            .as_array()
            .map(|artists| {
                artists
                    .iter()
                    .map(|artist| str_field(&artist["name"]))
                    .collect()
            })
            .unwrap_or_default(),
        album: str_field(&track["album"]["name"]),
        duration_ms: track["duration_ms"].as_u64().unwrap_or(0),
        added_at: str_field(&record["added_at"]),
        uri: str_field(&track["uri"]),
        external_url: str_field(&track["external_urls"]["spotify"]),
    })
}

/// Like [`try_format_track`], but logs a malformed record and returns an
/// empty track instead of failing.
pub fn format_track(record: &Value) -> FormattedTrack {
    try_format_track(record).unwrap_or_else(|e| {
        tracing::error!("Invalid track data: {}", e);
        FormattedTrack::default()
    })
}

fn str_field(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

/// One playlist handed to the exporter. Either half may be missing, in which
/// case the entry is skipped.
#[derive(Debug, Clone)]
pub struct PlaylistExport {
    pub name: String,
    pub playlist: Option<Playlist>,
    pub tracks: Option<Vec<Value>>,
}

impl PlaylistExport {
    pub fn new(playlist: Playlist, tracks: Vec<Value>) -> Self {
        Self {
            name: playlist.name.clone(),
            playlist: Some(playlist),
            tracks: Some(tracks),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullExport {
    pub export_date: String,
    pub playlists: Vec<FullPlaylist>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullPlaylist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub tracks_count: u64,
    pub tracks: Vec<FormattedTrack>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimalExport {
    pub export_date: String,
    pub playlists: Vec<MinimalPlaylist>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimalPlaylist {
    pub name: String,
    pub tracks: Vec<String>,
}

/// Builds both export documents from `entries`, stamped with `exported_at`.
///
/// Output depends on nothing but the arguments, so identical input yields
/// identical documents.
pub fn build_documents(
    entries: &[PlaylistExport],
    exported_at: NaiveDateTime,
) -> (FullExport, MinimalExport) {
    let export_date = exported_at.format(EXPORT_DATE_FORMAT).to_string();
    let mut full = FullExport {
        export_date: export_date.clone(),
        playlists: Vec::with_capacity(entries.len()),
    };
    let mut minimal = MinimalExport {
        export_date,
        playlists: Vec::with_capacity(entries.len()),
    };

    for entry in entries {
        tracing::info!("Processing playlist: {}", entry.name);

        let Some(playlist) = &entry.playlist else {
            tracing::warn!("Playlist info is missing for {}", entry.name);
            continue;
        };
        let Some(tracks) = &entry.tracks else {
            tracing::warn!("Tracks are missing for {}", entry.name);
            continue;
        };

        let mut full_tracks = Vec::with_capacity(tracks.len());
        let mut minimal_tracks = Vec::with_capacity(tracks.len());

        for record in tracks {
            if record.is_null() {
                tracing::warn!("Found a null track in {}", entry.name);
                continue;
            }

            // a `track` that is present but not an object has nothing to keep
            if record.get("track").is_some_and(|t| !t.is_object()) {
                tracing::error!("Error formatting track in {}: {}", entry.name, record);
                continue;
            }

            // records without a `track` stay in the full export as empty tracks
            let track = format_track(record);
            if record.get("track").is_some() {
                minimal_tracks.push(track.display_line());
            }
            full_tracks.push(track);
        }

        full.playlists.push(FullPlaylist {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            description: playlist.description.clone(),
            owner: playlist
                .owner
                .clone()
                .unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            tracks_count: playlist.tracks_total,
            tracks: full_tracks,
        });
        minimal.playlists.push(MinimalPlaylist {
            name: playlist.name.clone(),
            tracks: minimal_tracks,
        });
    }

    (full, minimal)
}

/// Name of the run directory for `timestamp`.
pub fn export_dir_name(timestamp: NaiveDateTime) -> String {
    format!("spotify_export_{}", timestamp.format(DIR_TIMESTAMP_FORMAT))
}

/// Creates a fresh run directory under `output_root` and writes both
/// documents into it as indented JSON.
///
/// If a directory for the same second already exists, `_2`, `_3`, ... is
/// appended instead of touching the earlier run.
pub async fn write_export(
    output_root: &Path,
    timestamp: NaiveDateTime,
    full: &FullExport,
    minimal: &MinimalExport,
) -> Res<PathBuf> {
    let dir = create_run_dir(output_root, &export_dir_name(timestamp)).await?;

    let full_path = dir.join(FULL_EXPORT_FILE);
    async_fs::write(&full_path, serde_json::to_string_pretty(full)?).await?;
    tracing::info!(
        "Full playlist data has been exported to '{}'",
        full_path.display()
    );

    let minimal_path = dir.join(MINIMAL_EXPORT_FILE);
    async_fs::write(&minimal_path, serde_json::to_string_pretty(minimal)?).await?;
    tracing::info!(
        "Minimal playlist data has been exported to '{}'",
        minimal_path.display()
    );

    Ok(dir)
}

async fn create_run_dir(output_root: &Path, name: &str) -> Res<PathBuf> {
    async_fs::create_dir_all(output_root).await?;

    let mut attempt = 1;
    loop {
        let dir = if attempt == 1 {
            output_root.join(name)
        } else {
            output_root.join(format!("{}_{}", name, attempt))
        };

        match async_fs::create_dir(&dir).await {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::warn!("{} already exists, trying another name", dir.display());
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Builds and writes an export stamped with the current local time.
pub async fn export(entries: &[PlaylistExport], output_root: &Path) -> Res<PathBuf> {
    let now = Local::now().naive_local();
    let (full, minimal) = build_documents(entries, now);
    write_export(output_root, now, &full, &minimal).await
}
