use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lyric_uniqueness::config::{
    BROADWAY_DATA_URL, DEFAULT_BUCKETS_PATH, DEFAULT_CACHE_DIR, DEFAULT_MIN_YEAR,
    DEFAULT_SCORES_PATH, DEFAULT_SUMMED_PATH, DEFAULT_WEEKLY_PATH,
};
use lyric_uniqueness::{
    bucket_by_score, download_weekly, filter_musicals, load_scored_table, load_show_table,
    load_weekly, score_shows, sum_by_show, write_buckets, write_scored_table, write_show_table,
    CatalogConfig, GeniusClient, LyricsCache,
};

#[derive(Parser)]
#[command(name = "lyric-uniqueness", version)]
#[command(about = "Score Broadway cast recordings by lyrical uniqueness and relate it to attendance")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sum weekly attendance records into one row per musical
    Sum {
        /// Processed weekly records CSV, downloaded and filtered here when missing
        #[arg(long, default_value = DEFAULT_WEEKLY_PATH)]
        input: PathBuf,

        /// Summed show table CSV
        #[arg(long, default_value = DEFAULT_SUMMED_PATH)]
        output: PathBuf,

        /// Drop weeks before this year
        #[arg(long, default_value_t = DEFAULT_MIN_YEAR)]
        min_year: u32,

        /// Fail instead of downloading when the input file is missing
        #[arg(long)]
        offline: bool,

        /// Raw weekly dataset fetched when the input file is missing
        #[arg(long, default_value = BROADWAY_DATA_URL)]
        url: String,
    },

    /// Resolve albums, fetch (or reuse cached) lyrics and score every show
    Score {
        /// Summed show table CSV
        #[arg(long, default_value = DEFAULT_SUMMED_PATH)]
        shows: PathBuf,

        /// Directory holding one lyrics file per album
        #[arg(long, default_value = DEFAULT_CACHE_DIR)]
        cache_dir: PathBuf,

        /// Scored show table CSV
        #[arg(long, default_value = DEFAULT_SCORES_PATH)]
        output: PathBuf,

        #[arg(long, env = "GENIUS_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,
    },

    /// Average attendance, performances and weeks per uniqueness score
    Buckets {
        /// Scored show table CSV
        #[arg(long, default_value = DEFAULT_SCORES_PATH)]
        scores: PathBuf,

        /// Score bucket CSV
        #[arg(long, default_value = DEFAULT_BUCKETS_PATH)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Sum {
            input,
            output,
            min_year,
            offline,
            url,
        } => run_sum(input, output, min_year, offline, &url),
        Command::Score {
            shows,
            cache_dir,
            output,
            access_token,
        } => run_score(shows, cache_dir, output, access_token),
        Command::Buckets { scores, output } => run_buckets(scores, output),
    }
}

fn run_sum(input: PathBuf, output: PathBuf, min_year: u32, offline: bool, url: &str) -> Result<()> {
    println!("🎟️  Summing weekly attendance");

    if !input.exists() {
        if offline {
            anyhow::bail!("{:?} not found and --offline is set", input);
        }
        println!("\n🌐 {:?} not found, downloading {}...", input, url);
        let weeks = download_weekly(url, &input, min_year)?;
        println!("✓ Wrote {} processed musical weeks to {:?}", weeks, input);
    }

    let weekly = load_weekly(&input)?;
    println!("✓ Loaded {} weekly records", weekly.len());

    let musicals = filter_musicals(weekly, min_year);
    println!("✓ Kept {} musical weeks from {} on", musicals.len(), min_year);

    let shows = sum_by_show(&musicals);
    write_show_table(&output, &shows)?;
    println!("✓ Wrote {} shows to {:?}", shows.len(), output);

    Ok(())
}

fn run_score(
    shows_path: PathBuf,
    cache_dir: PathBuf,
    output: PathBuf,
    access_token: Option<String>,
) -> Result<()> {
    println!("🎭 Scoring lyrical uniqueness");

    let shows = load_show_table(&shows_path)?;
    println!("✓ Loaded {} shows", shows.len());

    let catalog = GeniusClient::new(CatalogConfig::default().with_access_token(access_token))?;
    let cache = LyricsCache::open(&cache_dir)?;

    let scored = score_shows(&shows, &catalog, &cache)?;
    write_scored_table(&output, &scored)?;

    println!("✓ Scored {} shows ({} dropped)", scored.len(), shows.len() - scored.len());
    println!("✓ Wrote {:?}", output);

    Ok(())
}

fn run_buckets(scores: PathBuf, output: PathBuf) -> Result<()> {
    println!("📈 Bucketing by uniqueness score");

    let scored = load_scored_table(&scores)?;
    let buckets = bucket_by_score(&scored);
    write_buckets(&output, &buckets)?;

    println!("✓ {} shows in {} buckets → {:?}", scored.len(), buckets.len(), output);

    Ok(())
}
