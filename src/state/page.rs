//! Structured content extracted from a single documentation page

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when no title selector matches
pub const UNTITLED: &str = "Untitled";

/// One entry of a page's heading outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,

    /// Trimmed heading text
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// A successfully fetched, filtered-in page
///
/// Created once by the extractor and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Canonical, fragment-stripped URL
    pub url: String,

    /// First non-empty title selector match, or "Untitled"
    pub title: String,

    /// Text of the first matching main-content selector, or empty
    pub content: String,

    /// Raw text of every code-block selector match
    #[serde(default)]
    pub code_blocks: Vec<String>,

    /// All `h1`..`h6` elements in document order
    #[serde(default)]
    pub headings: Vec<Heading>,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}
