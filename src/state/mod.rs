//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: visited set, FIFO frontier, extracted pages and recorded errors
//! - `ExtractedPage` / `Heading`: structured content of one fetched page
//! - `CrawlErrorRecord`: a per-URL fetch failure

mod crawl_state;
mod page;

// Re-export main types
pub use crawl_state::{CrawlErrorRecord, CrawlState};
pub use page::{ExtractedPage, Heading, UNTITLED};
