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

use crate::models::{PlaylistMetadata, SourceTrack, TrackPage};
use crate::playlist_ref::PlaylistRef;
use async_trait::async_trait;
use log::debug;
use rspotify::{
    model::{PlayableItem, PlaylistId},
    prelude::*,
    AuthCodeSpotify,
};
use std::sync::Arc;
use thiserror::Error;

/// Spotify caps playlist item pages at 100.
pub const PAGE_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Spotify API error: {0}")]
    Spotify(#[from] rspotify::ClientError),
    #[error("Invalid Playlist ID: {0}")]
    InvalidId(String),
}

/// Read access to playlists on the service tracks are migrated from.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    async fn playlist_metadata(&self, playlist: &PlaylistRef)
        -> Result<PlaylistMetadata, SourceError>;

    /// Fetches the page of tracks starting at `offset`.
    async fn playlist_tracks_page(
        &self,
        playlist: &PlaylistRef,
        offset: u32,
    ) -> Result<TrackPage, SourceError>;
}

pub struct SpotifySource {
    spotify: Arc<AuthCodeSpotify>,
}

impl SpotifySource {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        Self {
            spotify: Arc::new(spotify),
        }
    }

    fn playlist_id(playlist: &PlaylistRef) -> Result<PlaylistId<'_>, SourceError> {
        PlaylistId::from_id(playlist.as_str())
            .map_err(|_| SourceError::InvalidId(playlist.to_string()))
    }
}

#[async_trait]
impl SourceCatalog for SpotifySource {
    async fn playlist_metadata(
        &self,
        playlist: &PlaylistRef,
    ) -> Result<PlaylistMetadata, SourceError> {
        let playlist_id = Self::playlist_id(playlist)?;
        let full = self.spotify.playlist(playlist_id, None, None).await?;

        Ok(PlaylistMetadata {
            title: full.name,
            description: full.description,
        })
    }

    async fn playlist_tracks_page(
        &self,
        playlist: &PlaylistRef,
        offset: u32,
    ) -> Result<TrackPage, SourceError> {
        let playlist_id = Self::playlist_id(playlist)?;
        let page = self
            .spotify
            .playlist_items_manual(playlist_id, None, None, Some(PAGE_SIZE), Some(offset))
            .await?;

        let fetched = page.items.len() as u32;
        debug!(
            "Fetched {} playlist items at offset {} (total {})",
            fetched, offset, page.total
        );

        Ok(TrackPage {
            next_offset: next_offset(offset, fetched, page.next.is_some()),
            items: page.items.into_iter().map(|item| source_track(item.track)).collect(),
        })
    }
}

/// Offset of the page after the one just fetched. An empty page ends paging even when
/// Spotify still advertises a `next` link, so a bad cursor cannot loop forever.
fn next_offset(offset: u32, fetched: u32, has_next: bool) -> Option<u32> {
    if has_next && fetched > 0 {
        Some(offset + fetched)
    } else {
        None
    }
}

/// Deleted tracks come back as `None`; episodes cannot be matched against songs.
fn source_track(item: Option<PlayableItem>) -> SourceTrack {
    match item {
        Some(PlayableItem::Track(track)) => {
            let primary_artist = track
                .artists
                .first()
                .map(|artist| artist.name.clone())
                .unwrap_or_default();
            SourceTrack::new(track.name, primary_artist)
        }
        _ => SourceTrack::absent(),
    }
}
