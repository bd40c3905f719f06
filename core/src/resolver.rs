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

use crate::models::{PlaylistMetadata, TargetPlaylist};
use crate::target::{TargetCatalog, TargetError};
use log::info;

pub const FALLBACK_TITLE: &str = "Converted Spotify Playlist";
pub const MAX_TITLE_CHARS: usize = 150;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const PROVENANCE_PREFIX: &str = "Converted from Spotify playlist: ";

/// Empty or over-long titles are replaced by [`FALLBACK_TITLE`].
pub fn target_title(source_title: &str) -> String {
    if source_title.is_empty() || source_title.chars().count() > MAX_TITLE_CHARS {
        FALLBACK_TITLE.to_string()
    } else {
        source_title.to_string()
    }
}

/// Provenance line naming the source title, then at most [`MAX_DESCRIPTION_CHARS`] characters
/// of the source description on a new line.
pub fn target_description(source_title: &str, source_description: Option<&str>) -> String {
    let mut description = format!("{}{}", PROVENANCE_PREFIX, source_title);
    if let Some(text) = source_description.filter(|text| !text.is_empty()) {
        description.push('\n');
        description.extend(text.chars().take(MAX_DESCRIPTION_CHARS));
    }
    description
}

/// Finds the destination playlist by exact title, creating a private one if none exists.
pub struct PlaylistResolver<'a, T: ?Sized> {
    target: &'a T,
}

impl<'a, T: TargetCatalog + ?Sized> PlaylistResolver<'a, T> {
    pub fn new(target: &'a T) -> Self {
        Self { target }
    }

    pub async fn resolve(&self, metadata: &PlaylistMetadata) -> Result<TargetPlaylist, TargetError> {
        let title = target_title(&metadata.title);
        let description = target_description(&metadata.title, metadata.description.as_deref());

        let existing = self.target.library_playlists().await?;
        if let Some(found) = existing.into_iter().find(|pl| pl.title == title) {
            info!("Found existing playlist '{}' with ID: {}", title, found.id);
            return Ok(TargetPlaylist {
                id: found.id,
                title,
                description,
                created: false,
            });
        }

        let id = self.target.create_playlist(&title, &description).await?;
        info!("Created new playlist '{}' with ID: {}", title, id);

        Ok(TargetPlaylist {
            id,
            title,
            description,
            created: true,
        })
    }
}
