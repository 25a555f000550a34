// 🎟️ Attendance Table - Weekly Broadway records → one summed row per show
// Upstream producer of the (ShowName, Attendance, NumPerformances, WeeksPerformed) table

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::info;

// ============================================================================
// WEEKLY RECORD (one row per show per week)
// ============================================================================

/// One week of one show. Columns not listed here are ignored on load.
///
/// Reads both the raw CORGIS layout and the processed layout, which has no
/// `Date.Year` column. The year is never written back out.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WeeklyRecord {
    #[serde(rename = "Date.Full", default)]
    pub date: String,

    #[serde(rename = "Show.Name")]
    pub show_name: String,

    #[serde(rename = "Show.Type")]
    pub show_type: String,

    #[serde(rename = "Date.Year", default, skip_serializing)]
    pub year: Option<u32>,

    #[serde(rename = "Statistics.Attendance")]
    pub attendance: u64,

    #[serde(rename = "Statistics.Performances")]
    pub performances: u64,
}

// ============================================================================
// SHOW RECORD (summed over a whole run)
// ============================================================================

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ShowRecord {
    #[serde(rename = "ShowName")]
    pub show_name: String,

    #[serde(rename = "Attendance")]
    pub attendance: u64,

    #[serde(rename = "NumPerformances")]
    pub num_performances: u64,

    /// Number of weekly rows the show appeared in
    #[serde(rename = "WeeksPerformed")]
    pub weeks_performed: u64,
}

// ============================================================================
// LOADING
// ============================================================================

pub fn read_weekly<R: Read>(reader: R) -> Result<Vec<WeeklyRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let record: WeeklyRecord = result
            .with_context(|| format!("Failed to deserialize weekly record {}", index + 1))?;
        records.push(record);
    }

    Ok(records)
}

pub fn load_weekly(csv_path: &Path) -> Result<Vec<WeeklyRecord>> {
    let file = fs::File::open(csv_path)
        .with_context(|| format!("Failed to open weekly CSV: {:?}", csv_path))?;
    read_weekly(file)
}

/// Filter raw weekly records to musicals from `min_year` on and write them to `dest`
/// in the processed layout. Returns the number of weeks kept.
pub fn process_weekly<R: Read>(raw: R, dest: &Path, min_year: u32) -> Result<usize> {
    let musicals = filter_musicals(read_weekly(raw)?, min_year);
    write_weekly(dest, &musicals)?;

    info!(weeks = musicals.len(), dest = ?dest, "wrote processed weekly records");
    Ok(musicals.len())
}

pub fn write_weekly(csv_path: &Path, records: &[WeeklyRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create weekly CSV: {:?}", csv_path))?;

    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Download the raw weekly dataset and write its processed form to `dest`
pub fn download_weekly(url: &str, dest: &Path, min_year: u32) -> Result<usize> {
    info!(url, "downloading weekly attendance data");

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download of {} failed with status {}", url, response.status());
    }

    let body = response
        .bytes()
        .with_context(|| format!("Failed to read body of {}", url))?;

    process_weekly(body.as_ref(), dest, min_year)
}

// ============================================================================
// FILTERING + SUMMING
// ============================================================================

/// Keep musicals from `min_year` onwards. Rows without a year (already processed) pass.
pub fn filter_musicals(records: Vec<WeeklyRecord>, min_year: u32) -> Vec<WeeklyRecord> {
    records
        .into_iter()
        .filter(|r| r.show_type == "Musical" && r.year.map_or(true, |year| year >= min_year))
        .collect()
}

/// One row per show, in the order shows first appear
pub fn sum_by_show(records: &[WeeklyRecord]) -> Vec<ShowRecord> {
    let mut shows: Vec<ShowRecord> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.show_name.as_str()).or_insert_with(|| {
            shows.push(ShowRecord {
                show_name: record.show_name.clone(),
                attendance: 0,
                num_performances: 0,
                weeks_performed: 0,
            });
            shows.len() - 1
        });

        let show = &mut shows[slot];
        show.attendance += record.attendance;
        show.num_performances += record.performances;
        show.weeks_performed += 1;
    }

    shows
}

// ============================================================================
// SHOW TABLE I/O
// ============================================================================

pub fn read_show_table<R: Read>(reader: R) -> Result<Vec<ShowRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut shows = Vec::new();
    for result in rdr.deserialize() {
        let show: ShowRecord = result.context("Failed to deserialize show record")?;
        shows.push(show);
    }

    Ok(shows)
}

pub fn load_show_table(csv_path: &Path) -> Result<Vec<ShowRecord>> {
    let file = fs::File::open(csv_path)
        .with_context(|| format!("Failed to open show table: {:?}", csv_path))?;
    read_show_table(file)
}

pub fn write_show_table(csv_path: &Path, shows: &[ShowRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create show table: {:?}", csv_path))?;

    for show in shows {
        wtr.serialize(show)?;
    }
    wtr.flush()?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
