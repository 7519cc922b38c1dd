//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the descriptive user agent and timeout
//! - Filtering URLs before any network access
//! - GET requests and error classification
//! - The politeness delay after every network attempt
//! - Discovering in-scope outbound links

use crate::config::SkillConfig;
use crate::crawler::parser::discover_links;
use crate::url::{canonicalize, site_root, UrlFilter};
use crate::{ConfigError, FetchError, SkillError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a URL was not fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rejected by the include/exclude patterns
    Filtered,
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Page body content
    pub body: String,
    /// In-scope links found on the page, in order of appearance
    pub links: Vec<String>,
}

/// Non-error outcome of a fetch attempt
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(FetchedPage),
    Skipped(SkipReason),
}

/// Builds an HTTP client with the given client identifier
///
/// # Example
///
/// ```no_run
/// use docs_to_skill::config::DEFAULT_USER_AGENT;
/// use docs_to_skill::crawler::build_http_client;
///
/// let client = build_http_client(DEFAULT_USER_AGENT).unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(REQUEST_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches single pages politely
///
/// The fetcher never decides whether a URL was already visited; that is
/// settled by the crawl state when the URL is taken off the frontier.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    filter: UrlFilter,
    site_root: String,
    delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the configuration
    ///
    /// The site root is taken from the canonical form of `base_url`, the same
    /// serialization discovered links get, so host case and default ports do
    /// not push every link out of scope.
    pub fn new(config: &SkillConfig) -> Result<Self, SkillError> {
        let client = build_http_client(&config.user_agent)?;
        let filter = UrlFilter::new(&config.url_patterns)?;
        let delay = Duration::try_from_secs_f64(config.rate_limit).map_err(|e| {
            ConfigError::Validation(format!("rate_limit {}: {}", config.rate_limit, e))
        })?;
        let base_url = canonicalize(&config.base_url);
        Ok(Self::with_client(client, filter, site_root(&base_url), delay))
    }

    /// Creates a fetcher from already-built parts
    pub fn with_client(client: Client, filter: UrlFilter, site_root: &str, delay: Duration) -> Self {
        Self {
            client,
            filter,
            site_root: site_root.to_string(),
            delay,
        }
    }

    /// Fetches a URL
    ///
    /// # Request Flow
    ///
    /// 1. URLs rejected by the filter are skipped without network access or delay
    /// 2. Send GET request
    /// 3. Sleep for the politeness delay, whatever the outcome
    /// 4. Non-2xx status, timeout or transport failure → `FetchError`
    /// 5. Discover in-scope links on success
    ///
    /// # Returns
    ///
    /// * `Ok(FetchOutcome::Fetched)` - Page body and discovered links
    /// * `Ok(FetchOutcome::Skipped)` - URL not eligible
    /// * `Err(FetchError)` - Recoverable per-page failure
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        if !self.filter.admit(url) {
            tracing::debug!("Filtered out: {}", url);
            return Ok(FetchOutcome::Skipped(SkipReason::Filtered));
        }

        let page_url = Url::parse(url).map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::info!("Fetching: {}", url);
        let result = self.get(url).await;
        self.pause().await;
        let body = result?;

        let links = discover_links(&body, &page_url, &self.site_root);
        tracing::debug!("Found {} in-scope links on {}", links.len(), url);

        Ok(FetchOutcome::Fetched(FetchedPage { body, links }))
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(body)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
