use crate::state::page::ExtractedPage;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// A fetch failure recorded during a crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlErrorRecord {
    pub url: String,
    pub message: String,
}

/// Progress of one crawl invocation
///
/// Owned and mutated only by the crawl coordinator; every other component
/// reads it. Any state between two frontier steps is a valid partial crawl.
///
/// # Invariants
///
/// - `visited` only grows
/// - every key of `pages` is in `visited`
/// - a URL is marked visited exactly once, when it is taken off the frontier
/// - the frontier holds each URL at most once and no visited URL
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    visited: HashSet<String>,
    frontier: VecDeque<String>,
    queued: HashSet<String>,
    pages: Vec<ExtractedPage>,
    page_index: HashMap<String, usize>,
    errors: Vec<CrawlErrorRecord>,
}

impl CrawlState {
    /// Creates an empty state whose frontier holds only the start URL
    pub fn new(start_url: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.enqueue(start_url.into());
        state
    }

    /// Rebuilds a state from persisted pages, visited set and frontier
    ///
    /// Page URLs are added to `visited` so the invariants hold even if the
    /// snapshot was written by hand. Visited and repeated frontier entries
    /// are dropped.
    pub fn restore(
        pages: Vec<ExtractedPage>,
        visited: impl IntoIterator<Item = String>,
        frontier: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut state = Self {
            visited: visited.into_iter().collect(),
            ..Self::default()
        };
        for page in pages {
            state.insert_page(page);
        }
        for url in frontier {
            state.enqueue(url);
        }
        state
    }

    /// Takes the next unvisited URL off the head of the frontier and marks it visited
    ///
    /// Already-visited entries are discarded along the way. Dequeue and
    /// visited-mark happen in this one call so a URL can never be handed out twice.
    pub fn next_url(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
            tracing::trace!("Discarding already visited URL: {}", url);
        }
        None
    }

    /// Appends a URL to the tail of the frontier unless it was already
    /// visited or is already waiting in the frontier
    ///
    /// Returns true if the URL was queued.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || !self.queued.insert(url.clone()) {
            return false;
        }
        self.frontier.push_back(url);
        true
    }

    /// Adds the start URL back to the frontier when nothing is left to do
    ///
    /// Used on resume when a snapshot carries no frontier.
    pub fn seed_if_idle(&mut self, start_url: &str) {
        if self.frontier.is_empty() {
            self.enqueue(start_url.to_string());
        }
    }

    /// Stores an extracted page; a page already stored for the URL is kept
    ///
    /// Returns true if the page was inserted.
    pub fn insert_page(&mut self, page: ExtractedPage) -> bool {
        if self.page_index.contains_key(&page.url) {
            return false;
        }
        self.visited.insert(page.url.clone());
        self.page_index.insert(page.url.clone(), self.pages.len());
        self.pages.push(page);
        true
    }

    /// Records a fetch failure for a URL
    pub fn record_error(&mut self, url: impl Into<String>, message: impl Into<String>) {
        self.errors.push(CrawlErrorRecord {
            url: url.into(),
            message: message.into(),
        });
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Visited URLs in sorted order
    pub fn visited_sorted(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.visited.iter().cloned().collect();
        urls.sort();
        urls
    }

    pub fn frontier(&self) -> &VecDeque<String> {
        &self.frontier
    }

    /// Pages in discovery order
    pub fn pages(&self) -> &[ExtractedPage] {
        &self.pages
    }

    pub fn page(&self, url: &str) -> Option<&ExtractedPage> {
        self.page_index.get(url).map(|&idx| &self.pages[idx])
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn errors(&self) -> &[CrawlErrorRecord] {
        &self.errors
    }
}
