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

use crate::dedup::DedupTracker;
use crate::failure_log::{FailureEntry, FailureRecorder};
use crate::matcher::{MatchError, TrackMatcher};
use crate::models::{MigrationResult, SourceTrack, TargetPlaylistId, TrackOutcome, TrackReport};
use crate::playlist_ref::{InvalidReference, PlaylistRef};
use crate::resolver::PlaylistResolver;
use crate::source::{SourceCatalog, SourceError};
use crate::target::{TargetCatalog, TargetError};
use log::{debug, info, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error(transparent)]
    InvalidReference(#[from] InvalidReference),
    #[error("Error fetching Spotify playlist: {0}")]
    SourceFetch(#[source] SourceError),
    #[error("No tracks found in the playlist")]
    EmptySource,
    #[error("Error handling YouTube Music playlist: {0}")]
    TargetResolution(#[source] TargetError),
}

/// Receives progress of the per-track loop.
pub trait ProgressSink: Send {
    fn start(&mut self, _total: usize) {}
    fn track_done(&mut self, _report: &TrackReport) {}
    fn finish(&mut self) {}
}

/// Migrates one source playlist into a playlist on the target service.
pub struct Migrator<S, T, R> {
    source: S,
    target: T,
    recorder: R,
    progress: Option<Box<dyn ProgressSink>>,
}

impl<S, T, R> Migrator<S, T, R>
where
    S: SourceCatalog,
    T: TargetCatalog,
    R: FailureRecorder,
{
    pub fn new(source: S, target: T, recorder: R) -> Self {
        Self {
            source,
            target,
            recorder,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Runs the whole pipeline. Setup failures abort before any track is touched; once the
    /// per-track loop starts every track reaches an outcome, even if the failure log breaks.
    pub async fn migrate(&mut self, reference: &str) -> Result<MigrationResult, MigrationError> {
        let playlist = PlaylistRef::parse(reference)?;
        info!("Migrating Spotify playlist {}", playlist);

        let metadata = self
            .source
            .playlist_metadata(&playlist)
            .await
            .map_err(MigrationError::SourceFetch)?;
        let tracks = self
            .fetch_tracks(&playlist)
            .await
            .map_err(MigrationError::SourceFetch)?;
        info!("Fetched '{}' with {} tracks", metadata.title, tracks.len());

        if tracks.is_empty() {
            return Err(MigrationError::EmptySource);
        }

        let resolved = PlaylistResolver::new(&self.target)
            .resolve(&metadata)
            .await
            .map_err(MigrationError::TargetResolution)?;

        let (mut dedup, seed_warning) = DedupTracker::seed(&self.target, &resolved.id).await;

        let url = self.target.playlist_url(&resolved.id);
        let mut result = MigrationResult::new(&resolved, url, tracks.len() as u32);
        result.dedup_seed_warning = seed_warning.map(|w| w.to_string());
        result.failure_log = self
            .recorder
            .location()
            .map(|path| path.display().to_string());

        if let Some(progress) = self.progress.as_mut() {
            progress.start(tracks.len());
        }

        for (i, track) in tracks.iter().enumerate() {
            let outcome = self.process_track(track, &resolved.id, &mut dedup).await;
            if let Some(entry) = FailureEntry::for_outcome(track, &outcome) {
                if let Err(e) = self.recorder.record(&entry) {
                    warn!("Could not write failure log entry '{}': {}", entry, e);
                    result.failure_log_errors += 1;
                }
            }
            let report = TrackReport::new(i + 1, track, outcome);
            debug!("{}", report);

            if let Some(progress) = self.progress.as_mut() {
                progress.track_done(&report);
            }
            result.record(report);
        }

        if let Some(progress) = self.progress.as_mut() {
            progress.finish();
        }

        info!(
            "Migration complete: {} added, {} skipped, {} failed, {} unavailable of {}",
            result.added_count,
            result.skipped_duplicate_count,
            result.failed_count,
            result.skipped_absent_count,
            result.total_source_tracks
        );
        Ok(result)
    }

    /// Follows pages until the source reports exhaustion, preserving order.
    async fn fetch_tracks(&self, playlist: &PlaylistRef) -> Result<Vec<SourceTrack>, SourceError> {
        let mut tracks = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.source.playlist_tracks_page(playlist, offset).await?;
            tracks.extend(page.items);

            match page.next_offset {
                Some(next) => offset = next,
                None => break,
            }
        }

        Ok(tracks)
    }

    async fn process_track(
        &self,
        track: &SourceTrack,
        playlist: &TargetPlaylistId,
        dedup: &mut DedupTracker,
    ) -> TrackOutcome {
        if !track.present {
            return TrackOutcome::SkippedAbsent;
        }

        let item_id = match TrackMatcher::new(&self.target).find_match(track).await {
            Ok(item_id) => item_id,
            Err(MatchError::NoMatch) => return TrackOutcome::Unmatched,
            Err(MatchError::Search(e)) => {
                warn!("Search failed for '{}': {}", track.title, e);
                return TrackOutcome::SearchFailed {
                    detail: e.to_string(),
                };
            }
        };

        if dedup.contains(&item_id) {
            return TrackOutcome::SkippedDuplicate { item_id };
        }

        match self
            .target
            .add_items(playlist, std::slice::from_ref(&item_id))
            .await
        {
            Ok(()) => {
                dedup.add(item_id.clone());
                TrackOutcome::Added { item_id }
            }
            Err(e) => {
                warn!("Failed to add '{}' ({}): {}", track.title, item_id, e);
                TrackOutcome::AppendFailed {
                    item_id,
                    detail: e.to_string(),
                }
            }
        }
    }
}
