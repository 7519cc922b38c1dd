//! Crawler module for documentation page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with filtering and politeness delay
//! - HTML link discovery and content extraction
//! - The breadth-first crawl loop with checkpoints and resume
//! - Dry-run previews

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod preview;

pub use coordinator::Coordinator;
pub use extractor::ContentExtractor;
pub use fetcher::{
    build_http_client, FetchOutcome, FetchedPage, Fetcher, SkipReason, REQUEST_TIMEOUT,
};
pub use parser::{discover_links, extract_links};
pub use preview::{preview, PreviewReport, PREVIEW_SAMPLE_SIZE};

use crate::config::SkillConfig;
use crate::state::CrawlState;
use crate::SkillError;

/// Runs a complete crawl without persistence
///
/// This is the simplest entry point: it crawls breadth-first from the
/// configured start URL and returns the final state, including any
/// per-page errors.
///
/// # Example
///
/// ```no_run
/// use docs_to_skill::config::load_config;
/// use docs_to_skill::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("configs/bun.toml"))?;
/// let state = crawl(config).await?;
/// println!("{} pages, {} errors", state.page_count(), state.errors().len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: SkillConfig) -> Result<CrawlState, SkillError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
