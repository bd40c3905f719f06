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

use crate::models::{SearchCandidate, TargetItemId, TargetPlaylistId, TargetPlaylistSummary};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("YouTube Music returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Invalid browser headers: {0}")]
    Headers(String),
    #[error("Failed to read browser headers: {0}")]
    Io(#[from] std::io::Error),
    #[error("Target service error: {0}")]
    Service(String),
}

/// Playlist management and search on the service tracks are migrated to.
#[async_trait]
pub trait TargetCatalog: Send + Sync {
    /// Playlists in the authenticated user's library.
    async fn library_playlists(&self) -> Result<Vec<TargetPlaylistSummary>, TargetError>;

    /// Creates a private playlist. Migrated playlists are never published.
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<TargetPlaylistId, TargetError>;

    async fn playlist_item_ids(
        &self,
        playlist: &TargetPlaylistId,
    ) -> Result<Vec<TargetItemId>, TargetError>;

    /// Song search, best match first, at most `limit` candidates.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchCandidate>, TargetError>;

    async fn add_items(
        &self,
        playlist: &TargetPlaylistId,
        items: &[TargetItemId],
    ) -> Result<(), TargetError>;

    fn playlist_url(&self, playlist: &TargetPlaylistId) -> String {
        format!("https://music.youtube.com/playlist?list={}", playlist)
    }
}
