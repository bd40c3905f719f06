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

use crate::models::{SourceTrack, TargetItemId};
use crate::target::{TargetCatalog, TargetError};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("no match found")]
    NoMatch,
    #[error("search failed: {0}")]
    Search(#[source] TargetError),
}

/// `"<title> <primary artist>"`, trimmed when the artist is missing.
pub fn search_query(track: &SourceTrack) -> String {
    format!("{} {}", track.title, track.primary_artist)
        .trim()
        .to_string()
}

/// Picks the first song result for a source track. No ranking, no retries.
pub struct TrackMatcher<'a, T: ?Sized> {
    target: &'a T,
}

impl<'a, T: TargetCatalog + ?Sized> TrackMatcher<'a, T> {
    pub fn new(target: &'a T) -> Self {
        Self { target }
    }

    pub async fn find_match(&self, track: &SourceTrack) -> Result<TargetItemId, MatchError> {
        let query = search_query(track);
        let candidates = self
            .target
            .search(&query, 1)
            .await
            .map_err(MatchError::Search)?;

        match candidates.into_iter().next() {
            Some(candidate) => {
                debug!("'{}' matched {} ({})", query, candidate.item_id, candidate.title);
                Ok(candidate.item_id)
            }
            None => Err(MatchError::NoMatch),
        }
    }
}
