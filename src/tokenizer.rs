// ✂️ Tokenizer - Raw lyric text → canonical word tokens
// Lowercase, delete punctuation, split, drop bracketed cues, drop boundary tokens

/// Ordered word tokens of one song. Empty is valid (instrumental or unmatched song).
pub type SongLyrics = Vec<String>;

/// Characters deleted outright before splitting. Square brackets are NOT in this set:
/// they are needed afterwards to recognise stage-direction tokens.
const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '&', '-', '*',
    '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2014}', '\u{2013}', '\u{2026}',
];

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Convert raw lyric text into word tokens.
///
/// Absent text yields no tokens. The first and last surviving tokens are always
/// dropped: the lyrics source wraps every page with a title line and a trailer,
/// so those positions never hold sung words.
pub fn normalize(raw_text: Option<&str>) -> SongLyrics {
    let Some(text) = raw_text else {
        return Vec::new();
    };

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect();

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .filter(|token| !token.contains('[') && !token.contains(']'))
        .map(str::to_string)
        .collect();

    if tokens.len() < 3 {
        return Vec::new();
    }

    tokens[1..tokens.len() - 1].to_vec()
}

// ============================================================================
// TESTS
// ============================================================================
