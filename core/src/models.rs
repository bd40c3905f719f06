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

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry of the source playlist.
///
/// `present == false` marks an entry whose underlying track was removed or is not a track at all
/// (e.g. a podcast episode). Such entries are skipped, never matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTrack {
    pub title: String,
    pub primary_artist: String,
    pub present: bool,
}

impl SourceTrack {
    pub fn new(title: impl Into<String>, primary_artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            primary_artist: primary_artist.into(),
            present: true,
        }
    }

    pub fn absent() -> Self {
        Self {
            title: String::new(),
            primary_artist: String::new(),
            present: false,
        }
    }
}

/// Title and description of the source playlist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistMetadata {
    pub title: String,
    pub description: Option<String>,
}

/// One page of source tracks. `next_offset == None` means the listing is exhausted.
#[derive(Debug, Clone, Default)]
pub struct TrackPage {
    pub items: Vec<SourceTrack>,
    pub next_offset: Option<u32>,
}

/// Identifier of a playlist on the target service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetPlaylistId(pub String);

impl fmt::Display for TargetPlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Identifier of a track (video) as known to the target service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetItemId(pub String);

impl fmt::Display for TargetItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TargetItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Entry of the user's playlist library on the target service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPlaylistSummary {
    pub id: TargetPlaylistId,
    pub title: String,
}

/// The destination playlist after find-or-create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPlaylist {
    pub id: TargetPlaylistId,
    pub title: String,
    pub description: String,
    pub created: bool,
}

/// A search hit on the target service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub item_id: TargetItemId,
    pub title: String,
    pub artists: Vec<String>,
}

/// Terminal state of one source track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackOutcome {
    SkippedAbsent,
    SkippedDuplicate { item_id: TargetItemId },
    Added { item_id: TargetItemId },
    Unmatched,
    SearchFailed { detail: String },
    AppendFailed { item_id: TargetItemId, detail: String },
}

impl TrackOutcome {
    /// Unmatched, search and append failures all count as failed.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TrackOutcome::Unmatched
                | TrackOutcome::SearchFailed { .. }
                | TrackOutcome::AppendFailed { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackOutcome::SkippedAbsent => "SKIPPED (unavailable)",
            TrackOutcome::SkippedDuplicate { .. } => "SKIPPED (already in playlist)",
            TrackOutcome::Added { .. } => "ADDED",
            TrackOutcome::Unmatched => "NO MATCH",
            TrackOutcome::SearchFailed { .. } => "SEARCH FAILED",
            TrackOutcome::AppendFailed { .. } => "ADD FAILED",
        }
    }
}

/// Per-track line of the migration report, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackReport {
    pub position: usize, // 1-based position in the source playlist
    pub title: String,
    pub artist: String,
    pub outcome: TrackOutcome,
}

impl TrackReport {
    pub fn new(position: usize, track: &SourceTrack, outcome: TrackOutcome) -> Self {
        Self {
            position,
            title: track.title.clone(),
            artist: track.primary_artist.clone(),
            outcome,
        }
    }
}

impl fmt::Display for TrackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.outcome == TrackOutcome::SkippedAbsent {
            return write!(f, "#{} <unavailable track> -> {}", self.position, self.outcome.label());
        }

        write!(
            f,
            "#{} {} - {} -> {}",
            self.position,
            self.title,
            self.artist,
            self.outcome.label()
        )?;

        match &self.outcome {
            TrackOutcome::SearchFailed { detail } | TrackOutcome::AppendFailed { detail, .. } => {
                write!(f, " ({})", detail)
            }
            _ => Ok(()),
        }
    }
}

/// Final report of a migration run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MigrationResult {
    pub target_playlist_url: String,
    pub target_playlist_id: String,
    pub playlist_title: String,
    pub created_playlist: bool,
    pub added_count: u32,
    pub skipped_duplicate_count: u32,
    pub failed_count: u32,
    pub skipped_absent_count: u32,
    pub total_source_tracks: u32,
    pub dedup_seed_warning: Option<String>,
    pub failure_log: Option<String>,
    /// Failure entries that could not be written to the log. The run carries on regardless.
    pub failure_log_errors: u32,
    pub tracks: Vec<TrackReport>,
}

impl MigrationResult {
    pub fn new(playlist: &TargetPlaylist, url: String, total_source_tracks: u32) -> Self {
        Self {
            target_playlist_url: url,
            target_playlist_id: playlist.id.to_string(),
            playlist_title: playlist.title.clone(),
            created_playlist: playlist.created,
            total_source_tracks,
            ..Default::default()
        }
    }

    pub fn record(&mut self, report: TrackReport) {
        match &report.outcome {
            TrackOutcome::SkippedAbsent => self.skipped_absent_count += 1,
            TrackOutcome::SkippedDuplicate { .. } => self.skipped_duplicate_count += 1,
            TrackOutcome::Added { .. } => self.added_count += 1,
            _ => self.failed_count += 1,
        }
        self.tracks.push(report);
    }

    /// Every source track ends in exactly one bucket.
    pub fn is_balanced(&self) -> bool {
        self.added_count + self.skipped_duplicate_count + self.failed_count + self.skipped_absent_count
            == self.total_source_tracks
    }
}
