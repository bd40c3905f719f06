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

//! In-memory collaborators for unit tests.

use crate::failure_log::{FailureEntry, FailureRecorder, RecorderError};
use crate::models::{
    PlaylistMetadata, SearchCandidate, SourceTrack, TargetItemId,
    TargetPlaylistId, TargetPlaylistSummary, TrackPage,
};
use crate::playlist_ref::PlaylistRef;
use crate::source::{SourceCatalog, SourceError};
use crate::target::{TargetCatalog, TargetError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Mutex;

fn unavailable(message: String) -> SourceError {
    SourceError::Spotify(rspotify::ClientError::Io(io::Error::new(
        io::ErrorKind::Other,
        message,
    )))
}

pub struct FakeSource {
    metadata: PlaylistMetadata,
    pages: Vec<Vec<SourceTrack>>,
    fail_metadata: bool,
    fail_page: Option<usize>,
    requested_offsets: Mutex<Vec<u32>>,
}

impl FakeSource {
    pub fn new(title: &str, pages: Vec<Vec<SourceTrack>>) -> Self {
        Self {
            metadata: PlaylistMetadata {
                title: title.to_string(),
                description: None,
            },
            pages,
            fail_metadata: false,
            fail_page: None,
            requested_offsets: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_metadata(mut self) -> Self {
        self.fail_metadata = true;
        self
    }

    pub fn failing_page(mut self, index: usize) -> Self {
        self.fail_page = Some(index);
        self
    }

    pub fn requested_offsets(&self) -> Vec<u32> {
        self.requested_offsets.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceCatalog for FakeSource {
    async fn playlist_metadata(
        &self,
        _playlist: &PlaylistRef,
    ) -> Result<PlaylistMetadata, SourceError> {
        if self.fail_metadata {
            return Err(unavailable("metadata unavailable".to_string()));
        }
        Ok(self.metadata.clone())
    }

    async fn playlist_tracks_page(
        &self,
        _playlist: &PlaylistRef,
        offset: u32,
    ) -> Result<TrackPage, SourceError> {
        self.requested_offsets.lock().unwrap().push(offset);

        let mut start = 0u32;
        for (index, page) in self.pages.iter().enumerate() {
            if start == offset {
                if self.fail_page == Some(index) {
                    return Err(unavailable(format!("page {} unavailable", index)));
                }
                let end = start + page.len() as u32;
                let last = index + 1 == self.pages.len();
                return Ok(TrackPage {
                    items: page.clone(),
                    next_offset: if last { None } else { Some(end) },
                });
            }
            start += page.len() as u32;
        }

        Ok(TrackPage::default())
    }
}

struct FakePlaylist {
    id: TargetPlaylistId,
    title: String,
    items: Vec<TargetItemId>,
}

#[derive(Default)]
struct TargetState {
    playlists: Vec<FakePlaylist>,
    created: Vec<(TargetPlaylistId, String, String)>,
    results: HashMap<String, Vec<String>>,
    searches: Vec<(String, usize)>,
    appended: Vec<(TargetPlaylistId, TargetItemId)>,
    failing_searches: HashSet<String>,
    failing_appends: HashSet<String>,
    fail_library: bool,
    fail_items: bool,
    fail_create: bool,
}

#[derive(Default)]
pub struct FakeTarget {
    state: Mutex<TargetState>,
}

impl FakeTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_playlist(&self, id: &str, title: &str, items: &[&str]) {
        self.state.lock().unwrap().playlists.push(FakePlaylist {
            id: TargetPlaylistId(id.to_string()),
            title: title.to_string(),
            items: items.iter().map(|&item| item.into()).collect(),
        });
    }

    pub fn add_search_results(&self, query: &str, ids: &[&str]) {
        self.state
            .lock()
            .unwrap()
            .results
            .insert(query.to_string(), ids.iter().map(|id| id.to_string()).collect());
    }

    pub fn fail_search(&self, query: &str) {
        self.state.lock().unwrap().failing_searches.insert(query.to_string());
    }

    pub fn fail_append(&self, item_id: &str) {
        self.state.lock().unwrap().failing_appends.insert(item_id.to_string());
    }

    pub fn fail_library_listing(&self) {
        self.state.lock().unwrap().fail_library = true;
    }

    pub fn fail_item_listing(&self) {
        self.state.lock().unwrap().fail_items = true;
    }

    pub fn fail_create(&self) {
        self.state.lock().unwrap().fail_create = true;
    }

    pub fn created_playlists(&self) -> Vec<(TargetPlaylistId, String, String)> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn searches(&self) -> Vec<(String, usize)> {
        self.state.lock().unwrap().searches.clone()
    }

    pub fn appended(&self) -> Vec<(TargetPlaylistId, TargetItemId)> {
        self.state.lock().unwrap().appended.clone()
    }

    pub fn playlist_count(&self) -> usize {
        self.state.lock().unwrap().playlists.len()
    }

    pub fn items_of(&self, id: &str) -> Vec<TargetItemId> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|pl| pl.id.0 == id)
            .map(|pl| pl.items.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TargetCatalog for FakeTarget {
    async fn library_playlists(&self) -> Result<Vec<TargetPlaylistSummary>, TargetError> {
        let state = self.state.lock().unwrap();
        if state.fail_library {
            return Err(TargetError::Service("library unavailable".to_string()));
        }
        Ok(state
            .playlists
            .iter()
            .map(|pl| TargetPlaylistSummary {
                id: pl.id.clone(),
                title: pl.title.clone(),
            })
            .collect())
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<TargetPlaylistId, TargetError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(TargetError::Service("create rejected".to_string()));
        }
        let id = TargetPlaylistId(format!("PLfake{}", state.playlists.len() + 1));
        state.playlists.push(FakePlaylist {
            id: id.clone(),
            title: title.to_string(),
            items: Vec::new(),
        });
        state
            .created
            .push((id.clone(), title.to_string(), description.to_string()));
        Ok(id)
    }

    async fn playlist_item_ids(
        &self,
        playlist: &TargetPlaylistId,
    ) -> Result<Vec<TargetItemId>, TargetError> {
        let state = self.state.lock().unwrap();
        if state.fail_items {
            return Err(TargetError::Service("items unavailable".to_string()));
        }
        state
            .playlists
            .iter()
            .find(|pl| &pl.id == playlist)
            .map(|pl| pl.items.clone())
            .ok_or_else(|| TargetError::Service(format!("unknown playlist {}", playlist)))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchCandidate>, TargetError> {
        let mut state = self.state.lock().unwrap();
        state.searches.push((query.to_string(), limit));
        if state.failing_searches.contains(query) {
            return Err(TargetError::Service(format!("search for '{}' failed", query)));
        }
        Ok(state
            .results
            .get(query)
            .map(|ids| {
                ids.iter()
                    .take(limit)
                    .map(|id| SearchCandidate {
                        item_id: id.as_str().into(),
                        title: query.to_string(),
                        artists: Vec::new(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add_items(
        &self,
        playlist: &TargetPlaylistId,
        items: &[TargetItemId],
    ) -> Result<(), TargetError> {
        let mut state = self.state.lock().unwrap();
        if let Some(item) = items.iter().find(|item| state.failing_appends.contains(&item.0)) {
            return Err(TargetError::Service(format!("cannot add {}", item)));
        }
        let state = &mut *state;
        let target = state
            .playlists
            .iter_mut()
            .find(|pl| &pl.id == playlist)
            .ok_or_else(|| TargetError::Service(format!("unknown playlist {}", playlist)))?;
        for item in items {
            target.items.push(item.clone());
            state.appended.push((playlist.clone(), item.clone()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRecorder {
    pub entries: Vec<FailureEntry>,
}

impl FailureRecorder for MemoryRecorder {
    fn record(&mut self, entry: &FailureEntry) -> Result<(), RecorderError> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

/// Recorder whose disk fills up after `healthy` writes.
pub struct BrokenRecorder {
    healthy: usize,
    pub entries: Vec<FailureEntry>,
}

impl BrokenRecorder {
    pub fn after(healthy: usize) -> Self {
        Self {
            healthy,
            entries: Vec::new(),
        }
    }
}

impl FailureRecorder for BrokenRecorder {
    fn record(&mut self, entry: &FailureEntry) -> Result<(), RecorderError> {
        if self.entries.len() >= self.healthy {
            return Err(RecorderError::Write(io::Error::new(
                io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.entries.push(entry.clone());
        Ok(())
    }
}
