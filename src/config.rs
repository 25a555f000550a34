// ⚙️ Configuration defaults
// File names match the pipeline's historical outputs so existing data directories keep working.
// The weekly path holds processed records (musicals only, no Date.Year column).

use std::time::Duration;

/// CORGIS weekly Broadway grosses dataset
pub const BROADWAY_DATA_URL: &str =
    "https://corgis-edu.github.io/corgis/datasets/csv/broadway/broadway.csv";

pub const DEFAULT_WEEKLY_PATH: &str = "processed_broadway_data.csv";
pub const DEFAULT_SUMMED_PATH: &str = "summed_broadway_data.csv";
pub const DEFAULT_SCORES_PATH: &str = "musical_scores.csv";
pub const DEFAULT_BUCKETS_PATH: &str = "score_dataframe.csv";
pub const DEFAULT_CACHE_DIR: &str = "lyrics";

/// Weekly records before this year are incomplete
pub const DEFAULT_MIN_YEAR: u32 = 1995;

/// Candidates requested per album search
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Settings for the HTTP catalog client
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Bearer token, sent only when present
    pub access_token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
    pub search_results: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            access_token: None,
            user_agent: format!("lyric-uniqueness/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            search_results: DEFAULT_SEARCH_RESULTS,
        }
    }
}

impl CatalogConfig {
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.trim().is_empty());
        self
    }
}
