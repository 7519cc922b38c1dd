use crate::state::{CrawlErrorRecord, CrawlState, ExtractedPage};
use crate::storage::{CheckpointError, CheckpointResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Snapshot format version
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serialized snapshot of crawl progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,

    /// Hash of the configuration file the crawl was started with
    #[serde(default)]
    pub config_hash: String,

    pub saved_at: DateTime<Utc>,

    /// Pages in discovery order
    pub pages: Vec<ExtractedPage>,

    /// Visited URLs, sorted
    pub visited: Vec<String>,

    /// URLs still queued when the snapshot was taken
    #[serde(default)]
    pub frontier: Vec<String>,

    #[serde(default)]
    pub errors: Vec<CrawlErrorRecord>,
}

impl Checkpoint {
    /// Captures the current state of a crawl
    pub fn from_state(state: &CrawlState, config_hash: &str) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            config_hash: config_hash.to_string(),
            saved_at: Utc::now(),
            pages: state.pages().to_vec(),
            visited: state.visited_sorted(),
            frontier: state.frontier().iter().cloned().collect(),
            errors: state.errors().to_vec(),
        }
    }

    /// Rebuilds the crawl state this snapshot was taken from
    pub fn into_state(self) -> CrawlState {
        let mut state = CrawlState::restore(self.pages, self.visited, self.frontier);
        for error in self.errors {
            state.record_error(error.url, error.message);
        }
        state
    }
}

/// A checkpoint file on disk
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the whole snapshot
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Checkpoint))` - Snapshot loaded
    /// * `Ok(None)` - No checkpoint file exists
    /// * `Err(CheckpointError)` - The file is unreadable or malformed
    pub fn load(&self) -> CheckpointResult<Option<Checkpoint>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let checkpoint: Checkpoint = serde_json::from_str(&content)?;
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion(checkpoint.version));
        }

        Ok(Some(checkpoint))
    }

    /// Like `load`, but a missing file is an error
    pub fn load_required(&self) -> CheckpointResult<Checkpoint> {
        self.load()?
            .ok_or_else(|| CheckpointError::Missing(self.path.clone()))
    }

    /// Writes the snapshot atomically
    ///
    /// The data goes to a sibling temp file which is then renamed over the
    /// target, so readers see either the previous or the new snapshot.
    pub fn save(&self, checkpoint: &Checkpoint) -> CheckpointResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        let json = serde_json::to_vec_pretty(checkpoint)?;

        let write_result = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(
            "Saved checkpoint with {} pages to {}",
            checkpoint.pages.len(),
            self.path.display()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Heading;
    use tempfile::TempDir;

    fn page(url: &str) -> ExtractedPage {
        ExtractedPage {
            url: url.to_string(),
            title: "Install".to_string(),
            content: "bun install".to_string(),
            code_blocks: vec!["bun add react".to_string()],
            headings: vec![Heading::new(1, "Install")],
            fetched_at: Utc::now(),
        }
    }

    fn sample_state() -> CrawlState {
        let mut state = CrawlState::new("https://bun.sh/docs");
        state.next_url();
        state.insert_page(page("https://bun.sh/docs"));
        state.enqueue("https://bun.sh/docs/install".to_string());
        state.record_error("https://bun.sh/docs/broken", "HTTP 500");
        state
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("cache.json"));
        assert!(store.load().unwrap().is_none());
        assert!(matches!(
            store.load_required(),
            Err(CheckpointError::Missing(_))
        ));
    }

    #[test]
    fn test_save_and_load_restores_state() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("nested/cache.json"));
        let state = sample_state();

        store.save(&Checkpoint::from_state(&state, "abc")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.config_hash, "abc");

        let restored = loaded.into_state();
        assert_eq!(restored.pages(), state.pages());
        assert_eq!(restored.visited(), state.visited());
        assert_eq!(restored.frontier(), state.frontier());
        assert_eq!(restored.errors(), state.errors());
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let store = CheckpointStore::new(&path);

        store.save(&Checkpoint::from_state(&CrawlState::default(), "h")).unwrap();
        store.save(&Checkpoint::from_state(&sample_state(), "h")).unwrap();

        assert_eq!(store.load().unwrap().unwrap().pages.len(), 1);
        assert!(!dir.path().join("cache.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_error_not_partial_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"version": 1, "pages": ["#).unwrap();

        let store = CheckpointStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(CheckpointError::Serialization(_))
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let mut checkpoint = Checkpoint::from_state(&CrawlState::default(), "h");
        checkpoint.version = 99;
        fs::write(&path, serde_json::to_string(&checkpoint).unwrap()).unwrap();

        assert!(matches!(
            CheckpointStore::new(&path).load(),
            Err(CheckpointError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_visited_written_sorted() {
        let mut state = CrawlState::default();
        state.enqueue("https://a.dev/z".to_string());
        state.enqueue("https://a.dev/a".to_string());
        while state.next_url().is_some() {}

        let checkpoint = Checkpoint::from_state(&state, "");
        assert_eq!(checkpoint.visited, vec!["https://a.dev/a", "https://a.dev/z"]);
    }
}
