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

use lazy_regex::regex_captures;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid Spotify playlist URL: {0}")]
pub struct InvalidReference(pub String);

/// Spotify playlist id extracted from a playlist URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistRef(String);

impl PlaylistRef {
    /// Extracts the id from anything containing `open.spotify.com/playlist/<id>`.
    /// Query strings and trailing path segments after the id are ignored.
    pub fn parse(reference: &str) -> Result<Self, InvalidReference> {
        match regex_captures!(r"open\.spotify\.com/playlist/([a-zA-Z0-9]+)", reference) {
            Some((_, id)) => Ok(Self(id.to_string())),
            None => Err(InvalidReference(reference.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
