// 🔗 Pipeline - Show table → resolved albums → cached lyrics → scores
// Strictly sequential: one show, one album, one song at a time.

use crate::attendance::ShowRecord;
use crate::cache::LyricsCache;
use crate::catalog::LyricsCatalog;
use crate::resolver::{resolve, AlbumMatch};
use crate::scoring::{album_score, total_lyric_count};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ============================================================================
// SCORED SHOW
// ============================================================================

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScoredShow {
    #[serde(rename = "ShowName")]
    pub show_name: String,

    #[serde(rename = "Attendance")]
    pub attendance: u64,

    #[serde(rename = "NumPerformances")]
    pub num_performances: u64,

    #[serde(rename = "WeeksPerformed")]
    pub weeks_performed: u64,

    #[serde(rename = "GeniusID")]
    pub album_id: String,

    #[serde(rename = "AlbumTitle")]
    pub album_title: String,

    #[serde(rename = "UniquenessScore")]
    pub uniqueness_score: u32,

    #[serde(rename = "TotalLyricCount")]
    pub total_lyric_count: usize,
}

impl ScoredShow {
    pub fn album(&self) -> AlbumMatch {
        AlbumMatch::from_columns(&self.album_id, &self.album_title)
    }
}

/// Why a show did not make it into the scored table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No search candidate carried a cast-recording keyword
    NoAlbum,
    /// The album has no sung, fully transcribed tracks
    NoLyrics,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShowOutcome {
    Scored(ScoredShow),
    Skipped(SkipReason),
}

// ============================================================================
// SCORING
// ============================================================================

/// Score one show. A skipped show is intended filtering, not a failure.
pub fn score_show<C: LyricsCatalog + ?Sized>(
    show: &ShowRecord,
    catalog: &C,
    cache: &LyricsCache,
) -> Result<ShowOutcome> {
    let album = resolve(&show.show_name, catalog)?;
    let (album_id, album_title) = match &album {
        AlbumMatch::Matched { album_id, title } => (album_id.clone(), title.clone()),
        AlbumMatch::Unmatched => return Ok(ShowOutcome::Skipped(SkipReason::NoAlbum)),
    };

    let songs = cache
        .album_lyrics(&album, catalog)
        .with_context(|| format!("Failed to get lyrics for {:?}", show.show_name))?;

    // album_score requires at least one song
    if songs.is_empty() {
        return Ok(ShowOutcome::Skipped(SkipReason::NoLyrics));
    }

    let uniqueness_score = album_score(&songs)?;

    Ok(ShowOutcome::Scored(ScoredShow {
        show_name: show.show_name.clone(),
        attendance: show.attendance,
        num_performances: show.num_performances,
        weeks_performed: show.weeks_performed,
        album_id,
        album_title,
        uniqueness_score,
        total_lyric_count: total_lyric_count(&songs),
    }))
}

/// Score every show, dropping those without a matching album or without lyrics.
pub fn score_shows<C: LyricsCatalog + ?Sized>(
    shows: &[ShowRecord],
    catalog: &C,
    cache: &LyricsCache,
) -> Result<Vec<ScoredShow>> {
    let mut scored = Vec::new();

    for (position, show) in shows.iter().enumerate() {
        info!(
            show = %show.show_name,
            position = position + 1,
            total = shows.len(),
            "scoring show"
        );

        match score_show(show, catalog, cache)? {
            ShowOutcome::Scored(row) => scored.push(row),
            ShowOutcome::Skipped(reason) => warn!(show = %show.show_name, ?reason, "show dropped"),
        }
    }

    Ok(scored)
}

// ============================================================================
// SCORED TABLE I/O
// ============================================================================

pub fn read_scored_table<R: Read>(reader: R) -> Result<Vec<ScoredShow>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: ScoredShow = result.context("Failed to deserialize scored show")?;
        rows.push(row);
    }

    Ok(rows)
}

pub fn load_scored_table(csv_path: &Path) -> Result<Vec<ScoredShow>> {
    let file = fs::File::open(csv_path)
        .with_context(|| format!("Failed to open scored table: {:?}", csv_path))?;
    read_scored_table(file)
}

pub fn write_scored_table(csv_path: &Path, rows: &[ScoredShow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create scored table: {:?}", csv_path))?;

    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
