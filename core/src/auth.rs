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

use crate::target::TargetError;
use crate::ytmusic::YouTubeMusic;
use log::info;
use rspotify::{prelude::*, scopes, AuthCodeSpotify, Config, Credentials, OAuth};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to initialize Spotify client: {0}")]
    ClientConfig(String),
    #[error("Spotify authentication failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
    #[error("Failed to initialize YouTube Music client from '{path}': {source}")]
    YouTubeMusic {
        path: String,
        #[source]
        source: TargetError,
    },
}

/// Initializes and authenticates a Spotify client using the Authorization Code Flow.
///
/// Steps:
/// 1. Reads the app credentials (`RSPOTIFY_CLIENT_ID`, `RSPOTIFY_CLIENT_SECRET`) from the
///    environment, which may have been populated from a `.env` file.
/// 2. Reads the redirect URI (`RSPOTIFY_REDIRECT_URI`).
/// 3. Requests read-only playlist scopes; migration never writes to Spotify.
/// 4. Reuses the cached token when there is one and refreshes it when it expires.
///
/// Without a usable cached token the user is sent to the Spotify consent page and the
/// redirect is captured by rspotify's `cli` helper.
pub async fn get_spotify_client() -> Result<AuthCodeSpotify, AuthError> {
    // rspotify reads RSPOTIFY_CLIENT_ID / RSPOTIFY_CLIENT_SECRET.
    let creds = Credentials::from_env().ok_or_else(|| {
        AuthError::ClientConfig("Missing RSPOTIFY_CLIENT_ID or RSPOTIFY_CLIENT_SECRET".to_string())
    })?;

    // Scopes needed to read the playlist being migrated.
    // - playlist-read-private: the user's own private playlists.
    // - playlist-read-collaborative: playlists shared with the user for editing.
    // Public playlists need no scope at all.
    let scopes = scopes!("playlist-read-private", "playlist-read-collaborative");

    let oauth = OAuth::from_env(scopes)
        .ok_or_else(|| AuthError::ClientConfig("Missing RSPOTIFY_REDIRECT_URI".to_string()))?;

    // Token lives in .spotify_token_cache.json next to the working directory.
    let config = Config {
        token_cached: true,
        token_refreshing: true,
        ..Default::default()
    };

    let spotify = AuthCodeSpotify::with_config(creds, oauth, config);

    let url = spotify.get_authorize_url(false)?;

    // Loads the cached token if it is still valid. Otherwise opens the consent page (or prints
    // its URL) and waits for the user to paste the redirected URL back.
    spotify.prompt_for_token(&url).await?;

    Ok(spotify)
}

/// Builds a YouTube Music client from a browser header file (usually `browser.json`).
///
/// The file holds the request headers of a logged-in music.youtube.com session. Errors keep
/// the path so the CLI can point at the file that needs refreshing.
pub fn get_youtube_music_client(headers_path: &Path) -> Result<YouTubeMusic, AuthError> {
    let client =
        YouTubeMusic::from_headers_file(headers_path).map_err(|source| AuthError::YouTubeMusic {
            path: headers_path.display().to_string(),
            source,
        })?;
    info!("YouTube Music client initialized from {}", headers_path.display());
    Ok(client)
}
