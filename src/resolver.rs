// 🎭 Album Resolver - Show name → catalog album
// Keyword heuristic over the catalog's album search, first hit wins

use crate::catalog::LyricsCatalog;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Keywords that mark a cast recording. Matched by plain substring containment.
pub const ALBUM_KEYWORDS: &[&str] = &["Broadway", "CastRecording"];

/// Values written to tabular output for an unmatched show
pub const UNMATCHED_ALBUM_ID: &str = "-1";
pub const UNMATCHED_ALBUM_TITLE: &str = "Not Found";

// ============================================================================
// ALBUM MATCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlbumMatch {
    /// A candidate album passed the keyword test
    Matched { album_id: String, title: String },

    /// No candidate matched; the show is left out of scoring
    Unmatched,
}

impl AlbumMatch {
    pub fn is_matched(&self) -> bool {
        matches!(self, AlbumMatch::Matched { .. })
    }

    pub fn album_id(&self) -> Option<&str> {
        match self {
            AlbumMatch::Matched { album_id, .. } => Some(album_id),
            AlbumMatch::Unmatched => None,
        }
    }

    /// Album id for CSV columns (`"-1"` when unmatched)
    pub fn album_id_or_sentinel(&self) -> &str {
        self.album_id().unwrap_or(UNMATCHED_ALBUM_ID)
    }

    /// Album title for CSV columns (`"Not Found"` when unmatched)
    pub fn title_or_sentinel(&self) -> &str {
        match self {
            AlbumMatch::Matched { title, .. } => title,
            AlbumMatch::Unmatched => UNMATCHED_ALBUM_TITLE,
        }
    }

    /// Inverse of the sentinel columns, used when reading a scored table back
    pub fn from_columns(album_id: &str, title: &str) -> Self {
        if album_id == UNMATCHED_ALBUM_ID {
            AlbumMatch::Unmatched
        } else {
            AlbumMatch::Matched {
                album_id: album_id.to_string(),
                title: title.to_string(),
            }
        }
    }
}

// ============================================================================
// YEAR SUFFIX
// ============================================================================

/// Remove a trailing revival year from a show name.
///
/// Checked in order, first match wins:
/// - apostrophe three characters from the end (`Show '95`) → drop 4 characters
/// - last 4 characters are digits (`Show 2004`) → drop 5 characters
/// - last 2 characters are digits (`Show 95`) → drop 3 characters
///
/// A name too short for a rule's window is left as it is.
pub fn strip_year_suffix(name: &str) -> &str {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let len = chars.len();

    let all_digits = |n: usize| n <= len && chars[len - n..].iter().all(|(_, c)| c.is_numeric());

    if len >= 3 && chars[len - 3].1 == '\'' {
        drop_last_chars(name, &chars, 4)
    } else if all_digits(4) {
        drop_last_chars(name, &chars, 5)
    } else if all_digits(2) {
        drop_last_chars(name, &chars, 3)
    } else {
        name
    }
}

fn drop_last_chars<'a>(name: &'a str, chars: &[(usize, char)], n: usize) -> &'a str {
    if n > chars.len() {
        return name;
    }
    match chars.get(chars.len() - n) {
        Some((byte_idx, _)) => &name[..*byte_idx],
        None => name,
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

fn has_keyword(text: &str) -> bool {
    ALBUM_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Resolve a show name to the first search candidate carrying a cast-recording keyword
/// in its title or artist name.
pub fn resolve<C: LyricsCatalog + ?Sized>(show_name: &str, catalog: &C) -> Result<AlbumMatch> {
    let query = strip_year_suffix(show_name);
    debug!(show = show_name, query, "searching albums");

    let candidates = catalog
        .search_albums(query)
        .with_context(|| format!("Album search failed for {:?}", query))?;

    for candidate in &candidates {
        if has_keyword(&candidate.title) || has_keyword(&candidate.artist_name) {
            info!(
                show = show_name,
                album_id = %candidate.album_id,
                title = %candidate.title,
                "matched album"
            );
            return Ok(AlbumMatch::Matched {
                album_id: candidate.album_id.clone(),
                title: candidate.title.clone(),
            });
        }
    }

    info!(show = show_name, candidates = candidates.len(), "no matching album");
    Ok(AlbumMatch::Unmatched)
}

// ============================================================================
// TESTS
// ============================================================================
