//! Dry-run preview of a crawl
//!
//! Fetches only the start page and reports which of its links the URL filter
//! would admit, with a rough duration estimate.

use crate::config::SkillConfig;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::parser::extract_links;
use crate::url::{canonicalize, UrlFilter};
use crate::{FetchError, SkillError};
use std::collections::BTreeSet;
use url::Url;

/// Number of sample URLs shown in a preview
pub const PREVIEW_SAMPLE_SIZE: usize = 10;

/// What a crawl of the configured target would look like
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewReport {
    pub start_url: String,
    /// Distinct admitted links on the start page
    pub links_found: usize,
    pub max_pages: usize,
    pub rate_limit: f64,
    /// First admitted links in sorted order
    pub sample: Vec<String>,
}

impl PreviewReport {
    /// Builds a report from the start page's admitted links
    pub fn new(config: &SkillConfig, start_url: String, links: BTreeSet<String>) -> Self {
        Self {
            start_url,
            links_found: links.len(),
            max_pages: config.max_pages,
            rate_limit: config.rate_limit,
            sample: links.into_iter().take(PREVIEW_SAMPLE_SIZE).collect(),
        }
    }

    /// Pages the crawl is expected to reach from what the start page shows
    pub fn estimated_pages(&self) -> usize {
        self.links_found.min(self.max_pages)
    }

    /// Upper bound of the time spent in politeness delays, in minutes
    pub fn estimated_minutes(&self) -> f64 {
        self.max_pages as f64 * self.rate_limit / 60.0
    }
}

/// Fetches the start page and lists the links the filter admits
///
/// # Returns
///
/// * `Ok(PreviewReport)` - Start page fetched
/// * `Err(SkillError)` - Bad patterns, client failure or the start page could not be fetched
pub async fn preview(config: &SkillConfig) -> Result<PreviewReport, SkillError> {
    let filter = UrlFilter::new(&config.url_patterns)?;
    let client = build_http_client(&config.user_agent)?;
    let start_url = canonicalize(config.start_url());
    let page_url = Url::parse(&start_url)?;

    tracing::info!("Previewing {}", start_url);
    let response = client
        .get(page_url.as_str())
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: start_url.clone(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: start_url,
            status: status.as_u16(),
        }
        .into());
    }

    let body = response.text().await.map_err(|e| FetchError::Body {
        url: start_url.clone(),
        message: e.to_string(),
    })?;

    let links: BTreeSet<String> = extract_links(&body, &page_url)
        .into_iter()
        .filter(|link| filter.admit(link))
        .collect();

    Ok(PreviewReport::new(config, start_url, links))
}
