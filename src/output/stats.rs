//! End-of-crawl statistics
//!
//! This module summarizes a finished crawl state for the terminal.

use crate::state::{CrawlErrorRecord, CrawlState};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Pages extracted, including restored ones
    pub pages: usize,

    /// URLs taken off the frontier
    pub visited: usize,

    /// URLs still queued when the crawl ended
    pub queued: usize,

    /// Per-URL failures in the order they happened
    pub errors: Vec<CrawlErrorRecord>,

    /// Wall-clock time of the crawl
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Builds a report from a crawl state
    ///
    /// # Arguments
    ///
    /// * `state` - The state returned by the crawl loop
    /// * `elapsed` - How long the crawl took
    pub fn from_state(state: &CrawlState, elapsed: Duration) -> Self {
        Self {
            pages: state.page_count(),
            visited: state.visited().len(),
            queued: state.frontier().len(),
            errors: state.errors().to_vec(),
            elapsed,
        }
    }

    /// Extracted pages per second of wall-clock time
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages as f64 / secs
        } else {
            0.0
        }
    }

    /// True when the crawl stopped with URLs left in the frontier
    pub fn is_partial(&self) -> bool {
        self.queued > 0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The statistics to display
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}

/// Formats the statistics shown at the end of a crawl
///
/// Page and error counts are always present, even when zero.
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Pages extracted: {}\n", report.pages));
    out.push_str(&format!("  URLs visited: {}\n", report.visited));
    out.push_str(&format!("  URLs still queued: {}\n", report.queued));
    out.push_str(&format!("  Errors: {}\n", report.errors.len()));
    out.push_str(&format!(
        "  Duration: {:.1}s ({:.2} pages/sec)\n\n",
        report.elapsed.as_secs_f64(),
        report.pages_per_second()
    ));

    if !report.errors.is_empty() {
        out.push_str("Failed URLs:\n");
        for error in &report.errors {
            out.push_str(&format!("  - {}: {}\n", error.url, error.message));
        }
        out.push('\n');
    }

    if report.is_partial() {
        out.push_str(&format!(
            "Crawl ended with {} URLs unfetched; run again with --resume to continue\n\n",
            report.queued
        ));
    }

    out
}
