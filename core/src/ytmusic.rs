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
use crate::target::{TargetCatalog, TargetError};
use async_trait::async_trait;
use chrono::Utc;
use lazy_regex::regex_replace_all;
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

const BASE_URL: &str = "https://music.youtube.com/youtubei/v1/";
const ORIGIN: &str = "https://music.youtube.com";
const LIBRARY_PLAYLISTS: &str = "FEmusic_liked_playlists";
const SONGS_PARAMS: &str = "EgWKAQIIAWoMEA4QChADEAQQCRAF";
const MAX_PAGES: usize = 200;

/// Containers a paged listing arrives in: the first page's shelf, the legacy continuation
/// payload, then the append action newer responses use. Other sections of the page (e.g. the
/// suggestions under an owned playlist) carry their own continuations and are ignored.
const PLAYLIST_SHELVES: [&str; 3] = [
    "musicPlaylistShelfRenderer",
    "musicPlaylistShelfContinuation",
    "appendContinuationItemsAction",
];
const LIBRARY_SHELVES: [&str; 3] = [
    "gridRenderer",
    "gridContinuation",
    "appendContinuationItemsAction",
];

/// Headers that must not be replayed from the browser session.
const SKIPPED_HEADERS: [&str; 4] = [
    "authorization",
    "accept-encoding",
    "content-encoding",
    "content-length",
];

/// YouTube Music client authenticated with headers copied from a logged-in browser.
///
/// The header file is a JSON object mapping header names to values (the `browser.json`
/// produced by `ytmusicapi browser`). Only the `cookie` header is mandatory; the
/// `authorization` header is recomputed per request from the SAPISID cookie.
pub struct YouTubeMusic {
    client: reqwest::Client,
    headers: HeaderMap,
    sapisid: String,
}

impl YouTubeMusic {
    /// Loads the header file written by `ytmusicapi browser` (or copied by hand from the
    /// browser's network tab).
    pub fn from_headers_file(path: impl AsRef<Path>) -> Result<Self, TargetError> {
        let raw = std::fs::read_to_string(path)?;
        let headers: HashMap<String, String> = serde_json::from_str(&raw)?;
        Self::from_headers(headers)
    }

    /// Builds the client from raw header pairs. Names are case-insensitive; a stale
    /// `authorization` header and transport headers reqwest manages itself are dropped.
    ///
    /// Fails with [`TargetError::Headers`] when there is no cookie carrying a SAPISID.
    pub fn from_headers(raw: HashMap<String, String>) -> Result<Self, TargetError> {
        let mut headers = HeaderMap::new();
        for (name, value) in raw {
            let name = name.to_ascii_lowercase();
            if SKIPPED_HEADERS.contains(&name.as_str()) {
                continue;
            }
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TargetError::Headers(format!("invalid header name '{}'", name)))?;
            let header_value = HeaderValue::from_str(&value)
                .map_err(|_| TargetError::Headers(format!("invalid value for '{}'", name)))?;
            headers.insert(header_name, header_value);
        }

        let cookie = headers
            .get("cookie")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| TargetError::Headers("missing cookie header".to_string()))?;
        let sapisid = sapisid_from_cookie(cookie).ok_or_else(|| {
            TargetError::Headers("cookie has no __Secure-3PAPISID or SAPISID entry".to_string())
        })?;

        headers
            .entry("origin")
            .or_insert(HeaderValue::from_static(ORIGIN));
        headers
            .entry("x-origin")
            .or_insert(HeaderValue::from_static(ORIGIN));

        Ok(Self {
            client: reqwest::Client::new(),
            headers,
            sapisid,
        })
    }

    /// Fresh `SAPISIDHASH` for the current second.
    fn authorization(&self) -> Result<HeaderValue, TargetError> {
        HeaderValue::from_str(&sapisid_hash(&self.sapisid, Utc::now().timestamp()))
            .map_err(|_| TargetError::Headers("SAPISID cookie is not header-safe".to_string()))
    }

    /// POSTs to an InnerTube endpoint with the web client context attached. A continuation
    /// token is passed in the query string, where browse continuations expect it.
    async fn post(
        &self,
        endpoint: &str,
        mut body: Value,
        continuation: Option<&str>,
    ) -> Result<Value, TargetError> {
        body["context"] = client_context();

        let mut request = self
            .client
            .post(format!("{}{}", BASE_URL, endpoint))
            .query(&[("alt", "json"), ("prettyPrint", "false")]);
        if let Some(token) = continuation {
            request = request.query(&[("ctoken", token), ("continuation", token), ("type", "next")]);
        }

        let response = request
            .headers(self.headers.clone())
            .header(AUTHORIZATION, self.authorization()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TargetError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetches every page of the listing held in one of `shelves`.
    async fn browse_all(
        &self,
        browse_id: &str,
        shelves: &[&str],
    ) -> Result<Vec<Value>, TargetError> {
        let first = self
            .post("browse", json!({ "browseId": browse_id }), None)
            .await?;
        collect_pages(browse_id, &first, shelves, |token| async move {
            self.post("browse", json!({ "continuation": token }), Some(token.as_str()))
                .await
        })
        .await
    }
}

/// Follows only the listing's own continuations, starting from the first response. A listing
/// longer than [`MAX_PAGES`] is an error rather than a silently truncated result.
async fn collect_pages<F, Fut>(
    browse_id: &str,
    first: &Value,
    shelves: &[&str],
    mut next_page: F,
) -> Result<Vec<Value>, TargetError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Value, TargetError>>,
{
    let mut pages = Vec::new();
    let mut current = listing_shelf(first, shelves).cloned();

    while let Some(page) = current.take() {
        let token = continuation_token(&page);
        pages.push(page);
        debug!("Fetched page {} of {}", pages.len(), browse_id);

        let Some(token) = token else {
            break;
        };
        if pages.len() >= MAX_PAGES {
            return Err(TargetError::UnexpectedResponse(format!(
                "{} has more than {} pages",
                browse_id, MAX_PAGES
            )));
        }
        let next = next_page(token).await?;
        current = listing_shelf(&next, shelves).cloned();
    }

    Ok(pages)
}

#[async_trait]
impl TargetCatalog for YouTubeMusic {
    async fn library_playlists(&self) -> Result<Vec<TargetPlaylistSummary>, TargetError> {
        let pages = self.browse_all(LIBRARY_PLAYLISTS, &LIBRARY_SHELVES).await?;
        Ok(pages.iter().flat_map(parse_library_playlists).collect())
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<TargetPlaylistId, TargetError> {
        // HTML tags are rejected by the service.
        let description = regex_replace_all!(r"<[^>]*>", description, "");
        let response = self
            .post(
                "playlist/create",
                json!({
                    "title": title,
                    "description": description,
                    "privacyStatus": "PRIVATE",
                }),
                None,
            )
            .await?;

        response["playlistId"]
            .as_str()
            .map(|id| TargetPlaylistId(id.to_string()))
            .ok_or_else(|| {
                TargetError::UnexpectedResponse("playlist/create returned no playlistId".to_string())
            })
    }

    async fn playlist_item_ids(
        &self,
        playlist: &TargetPlaylistId,
    ) -> Result<Vec<TargetItemId>, TargetError> {
        let browse_id = if playlist.0.starts_with("VL") {
            playlist.0.clone()
        } else {
            format!("VL{}", playlist.0)
        };
        let pages = self.browse_all(&browse_id, &PLAYLIST_SHELVES).await?;
        Ok(pages.iter().flat_map(parse_playlist_item_ids).collect())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchCandidate>, TargetError> {
        let response = self
            .post(
                "search",
                json!({ "query": query, "params": SONGS_PARAMS }),
                None,
            )
            .await?;
        Ok(parse_search_results(&response, limit))
    }

    async fn add_items(
        &self,
        playlist: &TargetPlaylistId,
        items: &[TargetItemId],
    ) -> Result<(), TargetError> {
        let actions: Vec<Value> = items
            .iter()
            .map(|item| {
                json!({
                    "action": "ACTION_ADD_VIDEO",
                    "addedVideoId": item.0,
                    "dedupeOption": "DEDUPE_OPTION_SKIP",
                })
            })
            .collect();
        let response = self
            .post(
                "browse/edit_playlist",
                json!({ "playlistId": playlist.0, "actions": actions }),
                None,
            )
            .await?;

        match response["status"].as_str() {
            Some("STATUS_SUCCEEDED") => Ok(()),
            other => Err(TargetError::Service(format!(
                "edit_playlist returned {}",
                other.unwrap_or("no status")
            ))),
        }
    }
}

/// Context InnerTube expects from the music web client. The version tracks today's date.
fn client_context() -> Value {
    json!({
        "client": {
            "clientName": "WEB_REMIX",
            "clientVersion": format!("1.{}.01.00", Utc::now().format("%Y%m%d")),
            "hl": "en",
        },
        "user": {},
    })
}

/// `SAPISIDHASH <ts>_<sha1("<ts> <sapisid> <origin>")>`
pub fn sapisid_hash(sapisid: &str, timestamp: i64) -> String {
    let digest = Sha1::digest(format!("{} {} {}", timestamp, sapisid, ORIGIN).as_bytes());
    format!("SAPISIDHASH {}_{:x}", timestamp, digest)
}

/// `__Secure-3PAPISID` wins over `SAPISID` when both are set.
fn sapisid_from_cookie(cookie: &str) -> Option<String> {
    let mut fallback = None;
    for pair in cookie.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            match name {
                "__Secure-3PAPISID" => return Some(value.to_string()),
                "SAPISID" => fallback = Some(value.to_string()),
                _ => {}
            }
        }
    }
    fallback
}

/// Every object stored under `key`, depth first. Matched objects are not searched further.
fn collect_renderers<'a>(value: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    out.push(v);
                } else {
                    collect_renderers(v, key, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_renderers(item, key, out);
            }
        }
        _ => {}
    }
}

/// First value stored under `key`, checking each object's own keys before its children.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// The first of `shelves` present in the response.
fn listing_shelf<'a>(response: &'a Value, shelves: &[&str]) -> Option<&'a Value> {
    shelves.iter().find_map(|key| find_key(response, key))
}

/// Continuation of a single shelf; callers must not pass a whole response.
fn continuation_token(shelf: &Value) -> Option<String> {
    find_key(shelf, "continuationCommand")
        .and_then(|command| command["token"].as_str())
        .or_else(|| {
            find_key(shelf, "nextContinuationData").and_then(|data| data["continuation"].as_str())
        })
        .map(str::to_string)
}

/// Joined `runs`, or `simpleText` for plain labels.
fn runs_text(text: &Value) -> String {
    match text["runs"].as_array() {
        Some(runs) => runs.iter().filter_map(|run| run["text"].as_str()).collect(),
        None => text["simpleText"].as_str().unwrap_or_default().to_string(),
    }
}

/// Playlist rows carry `playlistItemData`; search rows only have the id on the play button.
fn video_id(renderer: &Value) -> Option<TargetItemId> {
    renderer["playlistItemData"]["videoId"]
        .as_str()
        .or_else(|| find_key(renderer, "videoId").and_then(Value::as_str))
        .map(TargetItemId::from)
}

fn flex_column(renderer: &Value, index: usize) -> &Value {
    &renderer["flexColumns"][index]["musicResponsiveListItemFlexColumnRenderer"]["text"]
}

/// Playlist tiles of one library grid page.
fn parse_library_playlists(shelf: &Value) -> Vec<TargetPlaylistSummary> {
    let mut renderers = Vec::new();
    collect_renderers(shelf, "musicTwoRowItemRenderer", &mut renderers);

    renderers
        .into_iter()
        .filter_map(|renderer| {
            // The "New playlist" tile has no VL browse id.
            let browse_id = renderer["navigationEndpoint"]["browseEndpoint"]["browseId"].as_str()?;
            let id = browse_id.strip_prefix("VL")?;
            Some(TargetPlaylistSummary {
                id: TargetPlaylistId(id.to_string()),
                title: runs_text(&renderer["title"]),
            })
        })
        .collect()
}

/// Video ids of one playlist shelf page. Rows without a video (removed or region-locked
/// uploads) are skipped.
fn parse_playlist_item_ids(shelf: &Value) -> Vec<TargetItemId> {
    let mut renderers = Vec::new();
    collect_renderers(shelf, "musicResponsiveListItemRenderer", &mut renderers);
    renderers.into_iter().filter_map(video_id).collect()
}

/// Song rows of a search response in ranking order, up to `limit`.
///
/// The second flex column reads `Song • <artists> • <album> • <duration>`; artist runs are the
/// ones linking to a `UC` channel id.
fn parse_search_results(response: &Value, limit: usize) -> Vec<SearchCandidate> {
    let mut renderers = Vec::new();
    collect_renderers(response, "musicResponsiveListItemRenderer", &mut renderers);

    renderers
        .into_iter()
        .filter_map(|renderer| {
            let item_id = video_id(renderer)?;
            let artists = flex_column(renderer, 1)["runs"]
                .as_array()
                .map(|runs| {
                    runs.iter()
                        .filter(|run| {
                            run["navigationEndpoint"]["browseEndpoint"]["browseId"]
                                .as_str()
                                .is_some_and(|id| id.starts_with("UC"))
                        })
                        .filter_map(|run| run["text"].as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            Some(SearchCandidate {
                item_id,
                title: runs_text(flex_column(renderer, 0)),
                artists,
            })
        })
        .take(limit)
        .collect()
}
