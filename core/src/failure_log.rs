/*
    playlist-migrate-rs | Rust CLI tool to migrate Spotify playlists to YouTube Music.
    Copyright (C) 2025  Israel Alberto Roldan Vega

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::models::{SourceTrack, TrackOutcome};
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Failed to open failure log '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write failure log: {0}")]
    Write(#[from] std::io::Error),
}

/// A track that could not be migrated, or a source entry that had nothing to migrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureEntry {
    Absent,
    NoMatch {
        title: String,
        artist: String,
    },
    SearchFailed {
        title: String,
        artist: String,
        detail: String,
    },
    AppendFailed {
        title: String,
        artist: String,
        detail: String,
    },
}

impl FailureEntry {
    /// The entry to log for a finished track, if its outcome is worth logging.
    pub fn for_outcome(track: &SourceTrack, outcome: &TrackOutcome) -> Option<Self> {
        let title = track.title.clone();
        let artist = track.primary_artist.clone();
        match outcome {
            TrackOutcome::SkippedAbsent => Some(FailureEntry::Absent),
            TrackOutcome::Unmatched => Some(FailureEntry::NoMatch { title, artist }),
            TrackOutcome::SearchFailed { detail } => Some(FailureEntry::SearchFailed {
                title,
                artist,
                detail: detail.clone(),
            }),
            TrackOutcome::AppendFailed { detail, .. } => Some(FailureEntry::AppendFailed {
                title,
                artist,
                detail: detail.clone(),
            }),
            TrackOutcome::Added { .. } | TrackOutcome::SkippedDuplicate { .. } => None,
        }
    }
}

impl fmt::Display for FailureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureEntry::Absent => write!(f, "Skipped track - Track info is None"),
            FailureEntry::NoMatch { title, artist } => {
                write!(f, "No match found for: {} by {}", title, artist)
            }
            FailureEntry::SearchFailed {
                title,
                artist,
                detail,
            } => write!(
                f,
                "Error searching for '{}' by '{}': {}",
                title, artist, detail
            ),
            FailureEntry::AppendFailed {
                title,
                artist,
                detail,
            } => write!(f, "Error adding track '{}' by '{}': {}", title, artist, detail),
        }
    }
}

/// Append-only sink for per-track problems, injected into the migrator.
pub trait FailureRecorder: Send {
    fn record(&mut self, entry: &FailureEntry) -> Result<(), RecorderError>;

    /// Where the record ends up, if it is persisted anywhere.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Writes `<timestamp> - <message>` lines to `conversion_failures_<run start>.log`.
pub struct FileFailureRecorder {
    path: PathBuf,
    file: File,
}

impl FileFailureRecorder {
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, RecorderError> {
        Self::create_at(dir, Local::now())
    }

    pub fn create_at(dir: impl AsRef<Path>, started: DateTime<Local>) -> Result<Self, RecorderError> {
        let path = dir.as_ref().join(Self::file_name(&started));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RecorderError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn file_name(started: &DateTime<Local>) -> String {
        format!("conversion_failures_{}.log", started.format("%Y%m%d_%H%M%S"))
    }
}

impl FailureRecorder for FileFailureRecorder {
    fn record(&mut self, entry: &FailureEntry) -> Result<(), RecorderError> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        writeln!(self.file, "{} - {}", timestamp, entry)?;
        self.file.flush()?;
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
