//! Content extraction from fetched pages
//!
//! Selector lists are applied in configured order. Title and main content use
//! the first selector that matches; code blocks accumulate across all selectors.

use crate::config::Selectors;
use crate::state::{ExtractedPage, Heading, UNTITLED};
use crate::ConfigError;
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

/// Extracts structured content using pre-compiled selectors
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    title: Vec<Selector>,
    main_content: Vec<Selector>,
    code_blocks: Vec<Selector>,
    headings: Selector,
}

impl ContentExtractor {
    /// Compiles the configured selectors
    pub fn new(selectors: &Selectors) -> Result<Self, ConfigError> {
        Ok(Self {
            title: compile_all(&selectors.title)?,
            main_content: compile_all(&selectors.main_content)?,
            code_blocks: compile_all(&selectors.code_blocks)?,
            headings: compile("h1, h2, h3, h4, h5, h6")?,
        })
    }

    /// Builds an `ExtractedPage` from a page body
    ///
    /// Never fails: missing matches fall back to "Untitled", an empty content
    /// string and empty lists.
    ///
    /// # Example
    ///
    /// ```
    /// use docs_to_skill::config::Selectors;
    /// use docs_to_skill::crawler::ContentExtractor;
    ///
    /// let extractor = ContentExtractor::new(&Selectors::default()).unwrap();
    /// let page = extractor.extract(
    ///     "<main><h1>Install</h1><pre><code>bun add x</code></pre></main>",
    ///     "https://bun.sh/docs/install",
    /// );
    /// assert_eq!(page.title, "Install");
    /// assert_eq!(page.code_blocks, vec!["bun add x"]);
    /// ```
    pub fn extract(&self, body: &str, url: &str) -> ExtractedPage {
        let document = Html::parse_document(body);

        ExtractedPage {
            url: url.to_string(),
            title: self.extract_title(&document),
            content: self.extract_main_content(&document),
            code_blocks: self.extract_code_blocks(&document),
            headings: self.extract_headings(&document),
            fetched_at: Utc::now(),
        }
    }

    /// First selector whose first match has non-empty trimmed text
    fn extract_title(&self, document: &Html) -> String {
        self.title
            .iter()
            .filter_map(|selector| document.select(selector).next())
            .map(|element| element.text().collect::<String>().trim().to_string())
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    fn extract_main_content(&self, document: &Html) -> String {
        self.main_content
            .iter()
            .find_map(|selector| document.select(selector).next())
            .map(joined_text)
            .unwrap_or_default()
    }

    fn extract_code_blocks(&self, document: &Html) -> Vec<String> {
        self.code_blocks
            .iter()
            .flat_map(|selector| document.select(selector))
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    fn extract_headings(&self, document: &Html) -> Vec<Heading> {
        document
            .select(&self.headings)
            .filter_map(|element| {
                let level = heading_level(element.value().name())?;
                Some(Heading::new(
                    level,
                    element.text().collect::<String>().trim(),
                ))
            })
            .collect()
    }
}

/// Descendant text nodes, each trimmed, empty ones dropped, joined by newlines
fn joined_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn compile(raw: &str) -> Result<Selector, ConfigError> {
    Selector::parse(raw).map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", raw, e)))
}

fn compile_all(raw: &[String]) -> Result<Vec<Selector>, ConfigError> {
    raw.iter().map(|s| compile(s)).collect()
}
