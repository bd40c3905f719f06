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

pub mod auth;
pub mod dedup;
pub mod failure_log;
pub mod matcher;
pub mod migrate;
pub mod models;
pub mod playlist_ref;
pub mod resolver;
pub mod source;
pub mod target;
pub mod ytmusic;

#[cfg(test)]
mod test_support;

// Re-export key items for convenience
pub use auth::{get_spotify_client, get_youtube_music_client};
pub use failure_log::{FailureRecorder, FileFailureRecorder};
pub use migrate::{MigrationError, Migrator, ProgressSink};
pub use models::{MigrationResult, SourceTrack, TrackOutcome, TrackReport};
pub use playlist_ref::PlaylistRef;
pub use source::{SourceCatalog, SpotifySource};
pub use target::TargetCatalog;
pub use ytmusic::YouTubeMusic;
