// ⚠️ Error types
// Contract violations get typed errors; I/O and catalog failures travel as anyhow::Error.

use thiserror::Error;

/// Scoring errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// An album score was requested over zero songs
    #[error("cannot score an album with no songs")]
    EmptyAlbum,
}

/// Lyrics cache errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// Album id cannot be used as a cache file name
    #[error("invalid cache key: {0:?}")]
    InvalidKey(String),
}
