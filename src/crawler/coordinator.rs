//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop:
//! - Seeding or restoring the crawl state
//! - Taking URLs off the FIFO frontier
//! - Fetching, extracting and enqueueing discovered links
//! - Periodic checkpoints and stop requests between steps
//! - Writing the page cache when the crawl ends

use crate::config::SkillConfig;
use crate::crawler::extractor::ContentExtractor;
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::state::CrawlState;
use crate::storage::{Checkpoint, CheckpointStore};
use crate::url::canonicalize;
use crate::SkillError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: SkillConfig,
    fetcher: Fetcher,
    extractor: ContentExtractor,
    state: CrawlState,
    store: Option<CheckpointStore>,
    config_hash: String,
    shutdown: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a coordinator for a fresh crawl starting at the configured start URL
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SkillError)` - Invalid patterns/selectors or HTTP client failure
    pub fn new(config: SkillConfig) -> Result<Self, SkillError> {
        let fetcher = Fetcher::new(&config)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a coordinator using a pre-built fetcher
    pub fn with_fetcher(config: SkillConfig, fetcher: Fetcher) -> Result<Self, SkillError> {
        let extractor = ContentExtractor::new(&config.selectors)?;
        let state = CrawlState::new(canonicalize(config.start_url()));

        Ok(Self {
            config,
            fetcher,
            extractor,
            state,
            store: None,
            config_hash: String::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Persists progress to the given checkpoint file
    ///
    /// The file is written at every checkpoint interval when checkpoints are
    /// enabled, and always once the crawl ends.
    pub fn with_checkpoint(mut self, store: CheckpointStore, config_hash: impl Into<String>) -> Self {
        self.store = Some(store);
        self.config_hash = config_hash.into();
        self
    }

    /// Handle that stops the crawl at the next step boundary when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Loads previously persisted progress before the crawl starts
    ///
    /// Restored pages count against `max_pages`, and restored visited URLs are
    /// never fetched again. Without a checkpoint file the crawl starts fresh.
    pub fn resume(mut self) -> Result<Self, SkillError> {
        let Some(store) = self.store.clone() else {
            tracing::warn!("Resume requested without a checkpoint file; starting fresh");
            return Ok(self);
        };

        match store.load()? {
            Some(checkpoint) => {
                if !self.config_hash.is_empty()
                    && !checkpoint.config_hash.is_empty()
                    && checkpoint.config_hash != self.config_hash
                {
                    tracing::warn!(
                        "Configuration changed since checkpoint was written (saved {})",
                        checkpoint.saved_at
                    );
                }

                let mut state = checkpoint.into_state();
                state.seed_if_idle(&canonicalize(self.config.start_url()));
                tracing::info!(
                    "Resuming with {} pages, {} visited URLs, {} queued",
                    state.page_count(),
                    state.visited().len(),
                    state.frontier().len()
                );
                self.state = state;
            }
            None => {
                tracing::info!(
                    "No checkpoint at {}; starting fresh",
                    store.path().display()
                );
            }
        }

        Ok(self)
    }

    /// Runs the crawl loop until the frontier is exhausted, the page budget
    /// is reached or a stop is requested
    ///
    /// Per-page failures are recorded in the returned state and never end the
    /// crawl. Checkpoint write failures are logged and the crawl continues.
    pub async fn run(mut self) -> CrawlState {
        let max_pages = self.config.max_pages;
        let interval = self.config.checkpoint.interval.max(1);
        let start_time = Instant::now();
        let mut since_checkpoint = 0usize;

        tracing::info!(
            "Starting crawl of {} ({} pages max, {}s between requests)",
            self.config.name,
            max_pages,
            self.config.rate_limit
        );

        if self.config.checkpoint.enabled {
            if let Some(store) = &self.store {
                if !store.exists() {
                    self.save_checkpoint();
                }
            }
        }

        while self.state.page_count() < max_pages {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::warn!("Stop requested, ending crawl early");
                break;
            }

            let Some(url) = self.state.next_url() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if self.process_url(&url).await {
                since_checkpoint += 1;
                if since_checkpoint >= interval {
                    since_checkpoint = 0;
                    let elapsed = start_time.elapsed().as_secs_f64();
                    tracing::info!(
                        "Checkpoint: {} pages extracted, {} in frontier, {:.2} pages/sec",
                        self.state.page_count(),
                        self.state.frontier().len(),
                        self.state.page_count() as f64 / elapsed.max(f64::EPSILON)
                    );
                    if self.config.checkpoint.enabled {
                        self.save_checkpoint();
                    }
                }
            }
        }

        if self.state.page_count() >= max_pages && !self.state.frontier().is_empty() {
            tracing::info!(
                "Page budget of {} reached; {} queued URLs left unfetched",
                max_pages,
                self.state.frontier().len()
            );
        }

        self.save_checkpoint();

        tracing::info!(
            "Crawl finished: {} pages, {} errors in {:?}",
            self.state.page_count(),
            self.state.errors().len(),
            start_time.elapsed()
        );

        self.state
    }

    /// Processes one dequeued URL; returns true if a page was extracted
    async fn process_url(&mut self, url: &str) -> bool {
        match self.fetcher.fetch(url).await {
            Ok(FetchOutcome::Fetched(fetched)) => {
                let page = self.extractor.extract(&fetched.body, url);
                tracing::debug!("Extracted \"{}\" from {}", page.title, url);
                self.state.insert_page(page);

                for link in fetched.links {
                    self.state.enqueue(link);
                }
                true
            }
            Ok(FetchOutcome::Skipped(reason)) => {
                tracing::debug!("Skipped {}: {:?}", url, reason);
                false
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.state.record_error(e.url(), e.to_string());
                false
            }
        }
    }

    fn save_checkpoint(&self) {
        let Some(store) = &self.store else {
            return;
        };

        let checkpoint = Checkpoint::from_state(&self.state, &self.config_hash);
        if let Err(e) = store.save(&checkpoint) {
            tracing::error!(
                "Failed to write checkpoint {}: {}",
                store.path().display(),
                e
            );
        }
    }
}
