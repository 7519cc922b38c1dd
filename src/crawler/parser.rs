//! HTML link discovery
//!
//! Every `<a href="...">` is resolved against the page URL and stripped of its
//! fragment. `discover_links` additionally keeps only links inside the site root.

use crate::url::{in_scope, resolve_link};
use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from an HTML document, in document order
///
/// # Exclusions
///
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only anchors
///
/// Duplicates are kept; the crawl state discards repeated URLs at dequeue time.
///
/// # Example
///
/// ```
/// use docs_to_skill::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/docs/install#bun">Install</a></body></html>"#;
/// let page = Url::parse("https://bun.sh/docs").unwrap();
/// assert_eq!(extract_links(html, &page), vec!["https://bun.sh/docs/install"]);
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    links_in_document(&document, page_url)
}

/// Extracts links and keeps those prefixed by `site_root`
pub fn discover_links(html: &str, page_url: &Url, site_root: &str) -> Vec<String> {
    extract_links(html, page_url)
        .into_iter()
        .filter(|link| in_scope(link, site_root))
        .collect()
}

fn links_in_document(document: &Html, page_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, page_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}
