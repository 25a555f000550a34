// 💾 Lyrics Cache - Read-through, file-per-album store of normalized lyrics
// Entries are authoritative once written; nothing here ever invalidates them.

use crate::catalog::LyricsCatalog;
use crate::error::CacheError;
use crate::resolver::AlbumMatch;
use crate::tokenizer::{normalize, SongLyrics};
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Songs of one album that have usable lyrics, in album order
pub type AlbumLyrics = Vec<SongLyrics>;

const ENTRY_EXTENSION: &str = "jsonl";

// ============================================================================
// LYRICS CACHE
// ============================================================================

/// One file per album under `dir`, one JSON array of tokens per line (rows are ragged).
pub struct LyricsCache {
    dir: PathBuf,
}

impl LyricsCache {
    /// Open (and create if needed) a cache directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", dir))?;

        Ok(LyricsCache { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing an album id
    pub fn entry_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, ENTRY_EXTENSION)))
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entry_path(key)?.is_file())
    }

    /// Load a persisted entry, `None` on miss
    pub fn load(&self, key: &str) -> Result<Option<AlbumLyrics>> {
        let path = self.entry_path(key)?;
        if !path.is_file() {
            return Ok(None);
        }

        let file = fs::File::open(&path)
            .with_context(|| format!("Failed to open cache entry: {:?}", path))?;

        let mut songs = Vec::new();
        for (line_number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read cache entry: {:?}", path))?;
            let song: SongLyrics = serde_json::from_str(&line).with_context(|| {
                format!("Corrupt cache entry {:?} at line {}", path, line_number + 1)
            })?;
            songs.push(song);
        }

        Ok(Some(songs))
    }

    /// Persist an entry. Written to a temporary file first, then renamed into place;
    /// the temporary file is removed if any step fails.
    pub fn store(&self, key: &str, songs: &AlbumLyrics) -> Result<()> {
        let path = self.entry_path(key)?;
        let tmp_path = path.with_extension(format!("{}.tmp", ENTRY_EXTENSION));

        let result = write_entry(&tmp_path, songs).and_then(|()| {
            fs::rename(&tmp_path, &path)
                .with_context(|| format!("Failed to move cache entry into place: {:?}", path))
        });

        if result.is_err() && tmp_path.exists() {
            let _ = fs::remove_file(&tmp_path);
        }

        result
    }

    /// Return the entry for `key`, computing and persisting it on a miss.
    ///
    /// `compute` runs at most once per call and only on a miss; persisting its
    /// result is the only side effect.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<AlbumLyrics>
    where
        F: FnOnce() -> Result<AlbumLyrics>,
    {
        if let Some(songs) = self.load(key)? {
            debug!(key, songs = songs.len(), "cache hit");
            return Ok(songs);
        }

        info!(key, "cache miss, fetching");
        let songs = compute()?;
        self.store(key, &songs)?;

        Ok(songs)
    }

    /// Lyrics of a resolved album. Unmatched shows yield no songs and touch neither
    /// the catalog nor the disk.
    pub fn album_lyrics<C: LyricsCatalog + ?Sized>(
        &self,
        album: &AlbumMatch,
        catalog: &C,
    ) -> Result<AlbumLyrics> {
        match album.album_id() {
            Some(album_id) => {
                self.get_or_compute(album_id, || fetch_album_lyrics(album_id, catalog))
            }
            None => Ok(Vec::new()),
        }
    }
}

fn write_entry(tmp_path: &Path, songs: &AlbumLyrics) -> Result<()> {
    let file = fs::File::create(tmp_path)
        .with_context(|| format!("Failed to create cache entry: {:?}", tmp_path))?;
    let mut writer = BufWriter::new(file);
    for song in songs {
        serde_json::to_writer(&mut writer, song)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(())
}

fn validate_key(key: &str) -> Result<(), CacheError> {
    let bad = key.is_empty()
        || key == "."
        || key.contains("..")
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0');

    if bad {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(())
}

// ============================================================================
// FETCH
// ============================================================================

/// Fetch and normalize every sung, fully transcribed track of an album.
pub fn fetch_album_lyrics<C: LyricsCatalog + ?Sized>(
    album_id: &str,
    catalog: &C,
) -> Result<AlbumLyrics> {
    let tracks = catalog
        .list_tracks(album_id)
        .with_context(|| format!("Failed to list tracks of album {}", album_id))?;

    let mut songs = Vec::new();
    for track in tracks.iter().filter(|t| t.has_usable_lyrics()) {
        let raw = catalog
            .get_lyrics(&track.song_id)
            .with_context(|| format!("Failed to fetch lyrics of song {}", track.song_id))?;
        songs.push(normalize(raw.as_deref()));
    }

    debug!(
        album_id,
        tracks = tracks.len(),
        kept = songs.len(),
        "fetched album lyrics"
    );

    Ok(songs)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{sung_track, FakeCatalog};
    use crate::catalog::{LyricsState, TrackInfo};
    use tempfile::TempDir;

    fn matched(album_id: &str) -> AlbumMatch {
        AlbumMatch::Matched {
            album_id: album_id.to_string(),
            title: "Test Album".to_string(),
        }
    }

    fn album_catalog() -> FakeCatalog {
        FakeCatalog::new()
            .with_track("42", sung_track("1"), Some("Intro la la la outro"))
            .with_track(
                "42",
                TrackInfo {
                    is_instrumental: true,
                    ..sung_track("2")
                },
                Some("Overture never scored here"),
            )
            .with_track(
                "42",
                TrackInfo {
                    lyrics_state: LyricsState::Incomplete,
                    ..sung_track("3")
                },
                Some("Partial lyrics are skipped entirely"),
            )
            .with_track("42", sung_track("4"), None)
            .with_track("42", sung_track("5"), Some("Title one two three Embed"))
    }

    #[test]
    fn test_fetch_filters_tracks() {
        let catalog = album_catalog();

        let songs = fetch_album_lyrics("42", &catalog).unwrap();

        assert_eq!(
            songs,
            vec![
                vec!["la".to_string(), "la".to_string(), "la".to_string()],
                Vec::new(),
                vec!["one".to_string(), "two".to_string(), "three".to_string()],
            ]
        );
        // Lyrics are only requested for the three usable tracks
        assert_eq!(catalog.lyrics_calls.get(), 3);
    }

    #[test]
    fn test_second_call_hits_cache() {
        let dir = TempDir::new().unwrap();
        let cache = LyricsCache::open(dir.path()).unwrap();
        let catalog = album_catalog();

        let first = cache.album_lyrics(&matched("42"), &catalog).unwrap();
        let calls_after_first = catalog.fetch_calls();
        let second = cache.album_lyrics(&matched("42"), &catalog).unwrap();

        assert_eq!(first, second);
        assert_eq!(catalog.fetch_calls(), calls_after_first);
        assert!(cache.contains("42").unwrap());
    }

    #[test]
    fn test_cache_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let catalog = album_catalog();

        let first = LyricsCache::open(dir.path())
            .unwrap()
            .album_lyrics(&matched("42"), &catalog)
            .unwrap();

        let reopened = LyricsCache::open(dir.path()).unwrap();
        let empty_catalog = FakeCatalog::new();
        let second = reopened.album_lyrics(&matched("42"), &empty_catalog).unwrap();

        assert_eq!(first, second);
        assert_eq!(empty_catalog.fetch_calls(), 0);
    }

    #[test]
    fn test_unmatched_album_skips_catalog_and_disk() {
        let dir = TempDir::new().unwrap();
        let cache = LyricsCache::open(dir.path()).unwrap();
        let catalog = album_catalog();

        let songs = cache.album_lyrics(&AlbumMatch::Unmatched, &catalog).unwrap();

        assert!(songs.is_empty());
        assert_eq!(catalog.fetch_calls(), 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_ragged_and_empty_rows_persist() {
        let dir = TempDir::new().unwrap();
        let cache = LyricsCache::open(dir.path()).unwrap();
        let songs: AlbumLyrics = vec![
            vec!["a".to_string()],
            Vec::new(),
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
        ];

        cache.store("7", &songs).unwrap();

        assert_eq!(cache.load("7").unwrap(), Some(songs));
    }

    #[test]
    fn test_get_or_compute_runs_compute_once() {
        let dir = TempDir::new().unwrap();
        let cache = LyricsCache::open(dir.path()).unwrap();
        let mut runs = 0;

        for _ in 0..3 {
            let songs = cache
                .get_or_compute("9", || {
                    runs += 1;
                    Ok(vec![vec!["x".to_string()]])
                })
                .unwrap();
            assert_eq!(songs, vec![vec!["x".to_string()]]);
        }

        assert_eq!(runs, 1);
    }

    #[test]
    fn test_failed_compute_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let cache = LyricsCache::open(dir.path()).unwrap();

        let result = cache.get_or_compute("13", || Err(anyhow::anyhow!("catalog unavailable")));

        assert!(result.is_err());
        assert!(!cache.contains("13").unwrap());
    }

    #[test]
    fn test_failed_store_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let cache = LyricsCache::open(dir.path()).unwrap();

        // A non-empty directory at the entry path makes the final rename fail
        let blocker = dir.path().join("5.jsonl");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), b"x").unwrap();

        let result = cache.store("5", &vec![vec!["a".to_string()]]);

        assert!(result.is_err());
        assert!(!dir.path().join("5.jsonl.tmp").exists());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let cache = LyricsCache::open(dir.path()).unwrap();

        for key in ["", "..", "../escape", "a/b", "a\\b"] {
            assert!(cache.entry_path(key).is_err(), "key {:?} accepted", key);
        }
    }
}
