// 📈 Aggregator - Mean attendance per uniqueness score
// Buckets keep first-occurrence order; sort downstream if needed.

use crate::pipeline::ScoredShow;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ============================================================================
// SCORE BUCKET
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBucket {
    #[serde(rename = "UniquenessScore")]
    pub uniqueness_score: u32,

    #[serde(rename = "Attendance")]
    pub mean_attendance: f64,

    #[serde(rename = "NumPerformances")]
    pub mean_performances: f64,

    #[serde(rename = "WeeksPerformed")]
    pub mean_weeks: f64,

    /// Shows sharing this score (not written to CSV)
    #[serde(skip)]
    pub show_count: usize,
}

#[derive(Default)]
struct Totals {
    attendance: u64,
    performances: u64,
    weeks: u64,
    count: usize,
}

// ============================================================================
// BUCKETING
// ============================================================================

/// Group shows by exact score and average their run statistics
pub fn bucket_by_score(shows: &[ScoredShow]) -> Vec<ScoreBucket> {
    let mut order: Vec<u32> = Vec::new();
    let mut totals: HashMap<u32, Totals> = HashMap::new();

    for show in shows {
        let entry = totals.entry(show.uniqueness_score).or_insert_with(|| {
            order.push(show.uniqueness_score);
            Totals::default()
        });

        entry.attendance += show.attendance;
        entry.performances += show.num_performances;
        entry.weeks += show.weeks_performed;
        entry.count += 1;
    }

    order
        .into_iter()
        .filter_map(|score| {
            let t = totals.get(&score)?;
            let n = t.count as f64;
            Some(ScoreBucket {
                uniqueness_score: score,
                mean_attendance: t.attendance as f64 / n,
                mean_performances: t.performances as f64 / n,
                mean_weeks: t.weeks as f64 / n,
                show_count: t.count,
            })
        })
        .collect()
}

pub fn write_buckets(csv_path: &Path, buckets: &[ScoreBucket]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create bucket table: {:?}", csv_path))?;

    for bucket in buckets {
        wtr.serialize(bucket)?;
    }
    wtr.flush()?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
