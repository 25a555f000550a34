// 📚 Catalog capability - the external lyrics service as seen by the pipeline
// Search albums, list an album's tracks, fetch a song's lyrics

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ============================================================================
// BOUNDARY TYPES
// ============================================================================

/// One album returned by an album search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumCandidate {
    pub album_id: String,
    pub title: String,
    pub artist_name: String,
}

/// Transcription state of a song's lyrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LyricsState {
    Complete,
    Incomplete,
    Unreleased,
    Other(String),
}

impl LyricsState {
    /// Map the catalog's textual state (`"complete"`, `"incomplete"`, ...)
    pub fn parse(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "complete" => LyricsState::Complete,
            "incomplete" => LyricsState::Incomplete,
            "unreleased" => LyricsState::Unreleased,
            other => LyricsState::Other(other.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, LyricsState::Complete)
    }
}

/// One track of an album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub song_id: String,
    pub title: String,
    pub is_instrumental: bool,
    pub lyrics_state: LyricsState,
}

impl TrackInfo {
    /// Only sung, fully transcribed tracks contribute lyrics
    pub fn has_usable_lyrics(&self) -> bool {
        !self.is_instrumental && self.lyrics_state.is_complete()
    }
}

// ============================================================================
// CATALOG TRAIT
// ============================================================================

/// LyricsCatalog - blocking access to an external album/lyrics catalog
///
/// Every call blocks until the remote answers. Failures are unrecoverable at this
/// layer and are returned to the caller unchanged.
pub trait LyricsCatalog {
    /// Albums matching a free-text query, in the catalog's ranking order
    fn search_albums(&self, query: &str) -> Result<Vec<AlbumCandidate>>;

    /// Tracks of an album, in album order
    fn list_tracks(&self, album_id: &str) -> Result<Vec<TrackInfo>>;

    /// Raw lyric text of a song, `None` when the catalog has none
    fn get_lyrics(&self, song_id: &str) -> Result<Option<String>>;
}

// ============================================================================
// TEST DOUBLE
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lyrics_state_parse() {
        assert_eq!(LyricsState::parse("complete"), LyricsState::Complete);
        assert_eq!(LyricsState::parse("Incomplete"), LyricsState::Incomplete);
        assert_eq!(LyricsState::parse("unreleased"), LyricsState::Unreleased);
        assert_eq!(
            LyricsState::parse("pending"),
            LyricsState::Other("pending".to_string())
        );
    }

    #[test]
    fn test_usable_lyrics_filter() {
        let mut track = testing::sung_track("1");
        assert!(track.has_usable_lyrics());

        track.is_instrumental = true;
        assert!(!track.has_usable_lyrics());

        track.is_instrumental = false;
        track.lyrics_state = LyricsState::Incomplete;
        assert!(!track.has_usable_lyrics());
    }
}
