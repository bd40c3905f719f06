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

use crate::models::{TargetItemId, TargetPlaylistId};
use crate::target::{TargetCatalog, TargetError};
use log::{info, warn};
use std::collections::HashSet;
use thiserror::Error;

/// Existing items could not be listed; duplicates already in the playlist may be re-added.
#[derive(Error, Debug)]
#[error("Could not fetch existing tracks, duplicate detection is limited to this run: {0}")]
pub struct DedupSeedWarning(#[source] pub TargetError);

/// Target item ids already in the destination playlist.
#[derive(Debug, Default)]
pub struct DedupTracker {
    seen: HashSet<TargetItemId>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the tracker from the playlist's current items. A listing failure yields an empty
    /// tracker plus the warning; it never aborts the run.
    pub async fn seed<T: TargetCatalog + ?Sized>(
        target: &T,
        playlist: &TargetPlaylistId,
    ) -> (Self, Option<DedupSeedWarning>) {
        match target.playlist_item_ids(playlist).await {
            Ok(ids) => {
                let tracker: Self = ids.into_iter().collect();
                info!("Found {} existing tracks in the playlist", tracker.len());
                (tracker, None)
            }
            Err(e) => {
                let warning = DedupSeedWarning(e);
                warn!("{}", warning);
                (Self::new(), Some(warning))
            }
        }
    }

    pub fn contains(&self, id: &TargetItemId) -> bool {
        self.seen.contains(id)
    }

    /// Returns `false` if the id was already tracked.
    pub fn add(&mut self, id: TargetItemId) -> bool {
        self.seen.insert(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl FromIterator<TargetItemId> for DedupTracker {
    fn from_iter<I: IntoIterator<Item = TargetItemId>>(iter: I) -> Self {
        Self {
            seen: iter.into_iter().collect(),
        }
    }
}
