// 📊 Uniqueness Scorer
// Percentage of distinct words among all words, per song and per album

use crate::error::ScoreError;
use std::collections::HashSet;

/// Score of one song: `distinct / total * 100`, truncated. A song without tokens scores 0.
pub fn song_score<S: AsRef<str>>(tokens: &[S]) -> u32 {
    if tokens.is_empty() {
        return 0;
    }

    let distinct: HashSet<&str> = tokens.iter().map(AsRef::as_ref).collect();

    (distinct.len() * 100 / tokens.len()) as u32
}

/// Score of an album: mean of its song scores, truncated.
///
/// Unlike [`song_score`], zero songs is a caller error rather than a zero score.
pub fn album_score<S: AsRef<str>>(songs: &[Vec<S>]) -> Result<u32, ScoreError> {
    if songs.is_empty() {
        return Err(ScoreError::EmptyAlbum);
    }

    let total: u64 = songs.iter().map(|song| song_score(song) as u64).sum();

    Ok((total / songs.len() as u64) as u32)
}

/// Number of tokens across every song of an album.
pub fn total_lyric_count<S: AsRef<str>>(songs: &[Vec<S>]) -> usize {
    songs.iter().map(Vec::len).sum()
}

// ============================================================================
// TESTS
// ============================================================================
