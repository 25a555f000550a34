// Lyric Uniqueness - Core Library
// Links Broadway runs to cast-recording lyrics and scores their lyrical uniqueness

pub mod aggregator;
pub mod attendance;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod genius;
pub mod pipeline;
pub mod resolver;
pub mod scoring;
pub mod tokenizer;

// Re-export commonly used types
pub use aggregator::{bucket_by_score, write_buckets, ScoreBucket};
pub use attendance::{
    download_weekly, filter_musicals, load_show_table, load_weekly, process_weekly, sum_by_show,
    write_show_table, write_weekly, ShowRecord, WeeklyRecord,
};
pub use cache::{fetch_album_lyrics, AlbumLyrics, LyricsCache};
pub use catalog::{AlbumCandidate, LyricsCatalog, LyricsState, TrackInfo};
pub use config::CatalogConfig;
pub use error::{CacheError, ScoreError};
pub use genius::GeniusClient;
pub use pipeline::{
    load_scored_table, score_show, score_shows, write_scored_table, ScoredShow, ShowOutcome,
    SkipReason,
};
pub use resolver::{resolve, strip_year_suffix, AlbumMatch};
pub use scoring::{album_score, song_score, total_lyric_count};
pub use tokenizer::{normalize, SongLyrics};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
