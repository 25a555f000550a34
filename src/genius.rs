// 🌐 Genius Client - Blocking HTTP catalog over genius.com
// Album search and track listing are JSON; lyrics are scraped from the song page.

use crate::catalog::{AlbumCandidate, LyricsCatalog, LyricsState, TrackInfo};
use crate::config::CatalogConfig;
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

const GENIUS_API_BASE: &str = "https://genius.com/api";
const TRACKS_PER_PAGE: usize = 50;

// ============================================================================
// RESPONSE MODELS
// ============================================================================

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    sections: Vec<SearchSection>,
}

#[derive(Deserialize)]
struct SearchSection {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    result: AlbumResult,
}

#[derive(Deserialize)]
struct AlbumResult {
    id: u64,
    full_title: String,
    artist: Option<ArtistResult>,
}

#[derive(Deserialize)]
struct ArtistResult {
    name: String,
}

#[derive(Deserialize)]
struct TracksResponse {
    #[serde(default)]
    tracks: Vec<AlbumTrack>,
    next_page: Option<u32>,
}

#[derive(Deserialize)]
struct AlbumTrack {
    song: SongResult,
}

#[derive(Deserialize)]
struct SongResult {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    instrumental: bool,
    #[serde(default)]
    lyrics_state: String,
}

#[derive(Deserialize)]
struct SongResponse {
    song: SongPage,
}

#[derive(Deserialize)]
struct SongPage {
    url: String,
}

fn candidates_from(response: SearchResponse, limit: usize) -> Vec<AlbumCandidate> {
    response
        .sections
        .into_iter()
        .flat_map(|section| section.hits)
        .take(limit)
        .map(|hit| AlbumCandidate {
            album_id: hit.result.id.to_string(),
            title: hit.result.full_title,
            artist_name: hit.result.artist.map(|a| a.name).unwrap_or_default(),
        })
        .collect()
}

fn track_from(track: AlbumTrack) -> TrackInfo {
    TrackInfo {
        song_id: track.song.id.to_string(),
        title: track.song.title,
        is_instrumental: track.song.instrumental,
        lyrics_state: LyricsState::parse(&track.song.lyrics_state),
    }
}

// ============================================================================
// LYRICS PAGE SCRAPING
// ============================================================================

/// Pulls the lyric text out of a song page
struct LyricsExtractor {
    container_open: Regex,
    excluded_open: Regex,
    div_tag: Regex,
    line_break: Regex,
    tag: Regex,
}

impl LyricsExtractor {
    fn new() -> Result<Self> {
        Ok(Self {
            container_open: Regex::new(r#"<div[^>]*data-lyrics-container="true"[^>]*>"#)?,
            excluded_open: Regex::new(r#"<div[^>]*data-exclude-from-selection="true"[^>]*>"#)?,
            div_tag: Regex::new(r"(?i)<(/?)div\b[^>]*>")?,
            line_break: Regex::new(r"(?i)<br\s*/?>")?,
            tag: Regex::new(r"<[^>]*>")?,
        })
    }

    /// Text of every lyrics container joined by newlines, `None` if the page has none
    fn extract(&self, html: &str) -> Option<String> {
        let mut blocks = Vec::new();
        let mut pos = 0;

        while let Some(open) = self.container_open.find_at(html, pos) {
            let (body_end, close_end) = self.div_body(html, open.end());
            let body = self.without_excluded(&html[open.end()..body_end]);
            blocks.push(self.to_text(&body));
            pos = close_end;
        }

        if blocks.is_empty() {
            None
        } else {
            Some(blocks.join("\n"))
        }
    }

    /// End of a div's content and end of its closing tag, balancing nested divs.
    /// `body_start` is the offset just past the opening tag. Unclosed divs run to the end.
    fn div_body(&self, html: &str, body_start: usize) -> (usize, usize) {
        let mut depth = 1usize;

        for caps in self.div_tag.captures_iter(&html[body_start..]) {
            let Some(whole) = caps.get(0) else { continue };
            let closing = caps.get(1).map_or(false, |slash| slash.as_str() == "/");

            if closing {
                depth -= 1;
                if depth == 0 {
                    return (body_start + whole.start(), body_start + whole.end());
                }
            } else if !whole.as_str().ends_with("/>") {
                depth += 1;
            }
        }

        (html.len(), html.len())
    }

    /// Drop nested blocks the page marks as not part of the lyrics (contributor headers)
    fn without_excluded(&self, body: &str) -> String {
        let mut kept = String::with_capacity(body.len());
        let mut pos = 0;

        while let Some(open) = self.excluded_open.find_at(body, pos) {
            kept.push_str(&body[pos..open.start()]);
            let (_, close_end) = self.div_body(body, open.end());
            pos = close_end;
        }
        kept.push_str(&body[pos..]);

        kept
    }

    fn to_text(&self, body: &str) -> String {
        let text = self.line_break.replace_all(body, "\n");
        let text = self.tag.replace_all(&text, "");
        decode_entities(&text)
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct GeniusClient {
    client: Client,
    config: CatalogConfig,
    extractor: LyricsExtractor,
}

impl GeniusClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            config,
            extractor: LyricsExtractor::new()?,
        })
    }

    fn get(&self, url: &str) -> Result<Response> {
        debug!(url, "GET");

        let mut request = self.client.get(url);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().with_context(|| format!("Request failed: {}", url))?;
        if !response.status().is_success() {
            anyhow::bail!("Genius request {} failed with status {}", url, response.status());
        }

        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let envelope: Envelope<T> = self
            .get(url)?
            .json()
            .with_context(|| format!("Unexpected response body from {}", url))?;

        Ok(envelope.response)
    }
}

impl LyricsCatalog for GeniusClient {
    fn search_albums(&self, query: &str) -> Result<Vec<AlbumCandidate>> {
        let url = format!(
            "{}/search/album?q={}&per_page={}",
            GENIUS_API_BASE,
            urlencoding::encode(query),
            self.config.search_results
        );

        let response: SearchResponse = self.get_json(&url)?;

        Ok(candidates_from(response, self.config.search_results))
    }

    fn list_tracks(&self, album_id: &str) -> Result<Vec<TrackInfo>> {
        let mut tracks = Vec::new();
        let mut page = Some(1);

        while let Some(current) = page {
            let url = format!(
                "{}/albums/{}/tracks?per_page={}&page={}",
                GENIUS_API_BASE,
                urlencoding::encode(album_id),
                TRACKS_PER_PAGE,
                current
            );

            let response: TracksResponse = self.get_json(&url)?;
            tracks.extend(response.tracks.into_iter().map(track_from));
            page = response.next_page.filter(|next| *next > current);
        }

        Ok(tracks)
    }

    fn get_lyrics(&self, song_id: &str) -> Result<Option<String>> {
        let url = format!("{}/songs/{}", GENIUS_API_BASE, urlencoding::encode(song_id));
        let response: SongResponse = self.get_json(&url)?;

        let html = self
            .get(&response.song.url)?
            .text()
            .with_context(|| format!("Failed to read song page {}", response.song.url))?;

        Ok(self.extractor.extract(&html))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_decoding() {
        let body = r#"{
            "meta": {"status": 200},
            "response": {"sections": [{"type": "album", "hits": [
                {"result": {"id": 10, "full_title": "Wicked by Stephen Schwartz", "artist": {"name": "Stephen Schwartz"}}},
                {"result": {"id": 11, "full_title": "Wicked (Original Broadway Cast Recording) by Original Broadway Cast of Wicked", "artist": {"name": "Original Broadway Cast of Wicked"}}},
                {"result": {"id": 12, "full_title": "No Artist", "artist": null}}
            ]}]}
        }"#;

        let envelope: Envelope<SearchResponse> = serde_json::from_str(body).unwrap();
        let candidates = candidates_from(envelope.response, 5);

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[1].album_id, "11");
        assert_eq!(candidates[1].artist_name, "Original Broadway Cast of Wicked");
        assert_eq!(candidates[2].artist_name, "");
    }

    #[test]
    fn test_search_candidates_capped() {
        let hits: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"result": {{"id": {}, "full_title": "t", "artist": {{"name": "a"}}}}}}"#, i))
            .collect();
        let body = format!(r#"{{"sections": [{{"hits": [{}]}}]}}"#, hits.join(","));

        let response: SearchResponse = serde_json::from_str(&body).unwrap();
        let candidates = candidates_from(response, 5);

        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[4].album_id, "4");
    }

    #[test]
    fn test_tracks_response_decoding() {
        let body = r#"{"response": {"next_page": null, "tracks": [
            {"number": 1, "song": {"id": 100, "title": "Overture", "instrumental": true, "lyrics_state": "complete"}},
            {"number": 2, "song": {"id": 101, "title": "Defying Gravity", "instrumental": false, "lyrics_state": "complete"}},
            {"number": 3, "song": {"id": 102, "title": "Demo", "instrumental": false, "lyrics_state": "incomplete"}}
        ]}}"#;

        let envelope: Envelope<TracksResponse> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.response.next_page, None);

        let tracks: Vec<TrackInfo> = envelope.response.tracks.into_iter().map(track_from).collect();

        assert_eq!(tracks.len(), 3);
        assert!(tracks[0].is_instrumental);
        assert_eq!(tracks[1].song_id, "101");
        assert!(tracks[1].has_usable_lyrics());
        assert_eq!(tracks[2].lyrics_state, LyricsState::Incomplete);
    }

    #[test]
    fn test_extract_lyrics_from_page() {
        let extractor = LyricsExtractor::new().unwrap();
        let html = r#"<html><body>
            <div class="Lyrics__Container" data-lyrics-container="true">[Verse 1]<br/>Something has changed<br>within me &amp; you</div>
            <div class="Other">ignored</div>
            <div data-lyrics-container="true"><a href="/x"><span>It&#x27;s time</span></a></div>
        </body></html>"#;

        let text = extractor.extract(html).unwrap();

        assert_eq!(
            text,
            "[Verse 1]\nSomething has changed\nwithin me & you\nIt's time"
        );
    }

    #[test]
    fn test_nested_divs_do_not_truncate_container() {
        let extractor = LyricsExtractor::new().unwrap();
        let html = r#"<div data-lyrics-container="true"><div class="LyricsHeader">12 Contributors</div>[Verse 1]<br/>Something has changed<br/><div class="Annotation"><span>within me</span></div></div>"#;

        let text = extractor.extract(html).unwrap();

        assert_eq!(text, "12 Contributors[Verse 1]\nSomething has changed\nwithin me");
    }

    #[test]
    fn test_excluded_header_dropped() {
        let extractor = LyricsExtractor::new().unwrap();
        let html = r#"<div data-lyrics-container="true"><div data-exclude-from-selection="true"><div class="LyricsHeader">12 Contributors<div>Translations</div></div></div>[Verse 1]<br/>Something has changed</div>
            <div data-lyrics-container="true">It&#x27;s time</div>"#;

        let text = extractor.extract(html).unwrap();

        assert_eq!(text, "[Verse 1]\nSomething has changed\nIt's time");
    }

    #[test]
    fn test_unclosed_container_runs_to_end() {
        let extractor = LyricsExtractor::new().unwrap();

        assert_eq!(
            extractor.extract(r#"<div data-lyrics-container="true">one<br>two"#),
            Some("one\ntwo".to_string())
        );
    }

    #[test]
    fn test_page_without_lyrics() {
        let extractor = LyricsExtractor::new().unwrap();

        assert_eq!(extractor.extract("<html><div>nothing</div></html>"), None);
    }
}
