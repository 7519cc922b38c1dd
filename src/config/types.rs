use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Client identifier sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Documentation Scraper for Copilot Skills)";

/// Main configuration structure for a documentation target
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillConfig {
    /// Identifier of the target; output paths are derived from it
    pub name: String,

    /// Free text describing the documented system
    pub description: String,

    /// Root URL of the documentation site
    pub base_url: String,

    /// First URL to crawl (defaults to `base_url`)
    #[serde(default)]
    pub start_url: Option<String>,

    /// Maximum number of pages to extract
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Delay after each network request, in seconds
    #[serde(default = "default_rate_limit", alias = "rate_limit_seconds")]
    pub rate_limit: f64,

    #[serde(default)]
    pub url_patterns: UrlPatterns,

    #[serde(default)]
    pub selectors: Selectors,

    /// Category name to keywords, in declaration order
    #[serde(default)]
    pub categories: CategoryTable,

    /// File glob hints rendered into the instructions document
    #[serde(default)]
    pub file_patterns: Vec<String>,

    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    /// Client identifier header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl SkillConfig {
    /// The URL the crawl starts from
    pub fn start_url(&self) -> &str {
        self.start_url.as_deref().unwrap_or(&self.base_url)
    }
}

fn default_max_pages() -> usize {
    100
}

fn default_rate_limit() -> f64 {
    0.5
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// URL include/exclude regular expressions
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UrlPatterns {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

/// CSS selectors used by the content extractor
///
/// Each field accepts either a list or a single comma-separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Selectors {
    #[serde(default = "default_title_selectors", deserialize_with = "selector_list")]
    pub title: Vec<String>,

    #[serde(
        default = "default_main_content_selectors",
        deserialize_with = "selector_list"
    )]
    pub main_content: Vec<String>,

    #[serde(
        default = "default_code_block_selectors",
        deserialize_with = "selector_list"
    )]
    pub code_blocks: Vec<String>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            title: default_title_selectors(),
            main_content: default_main_content_selectors(),
            code_blocks: default_code_block_selectors(),
        }
    }
}

fn default_title_selectors() -> Vec<String> {
    vec!["h1".to_string(), "title".to_string()]
}

fn default_main_content_selectors() -> Vec<String> {
    vec!["main".to_string(), "article".to_string()]
}

fn default_code_block_selectors() -> Vec<String> {
    vec!["pre code".to_string()]
}

/// Splits a comma-separated selector string into trimmed, non-empty parts
pub fn split_selector_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn selector_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::One(raw) => split_selector_list(&raw),
        Raw::Many(list) => list
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    })
}

/// Periodic checkpoint settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckpointConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Successful pages between checkpoints
    #[serde(default = "default_checkpoint_interval")]
    pub interval: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: default_checkpoint_interval(),
        }
    }
}

fn default_checkpoint_interval() -> usize {
    50
}

/// Ordered mapping from category name to its keywords
///
/// Declaration order of both categories and keywords is significant to
/// categorization, so entries are kept in the order the file lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTable(Vec<(String, Vec<String>)>);

impl CategoryTable {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(name, kw)| (name.as_str(), kw.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for CategoryTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = CategoryTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to keyword lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, Vec<String>)> = Vec::new();
                while let Some((name, keywords)) = map.next_entry::<String, Vec<String>>()? {
                    push_unique(&mut entries, name, keywords)?;
                }
                Ok(CategoryTable(entries))
            }

            // Also accept [["name", ["kw", ...]], ...]
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut entries: Vec<(String, Vec<String>)> = Vec::new();
                while let Some((name, keywords)) = seq.next_element::<(String, Vec<String>)>()? {
                    push_unique(&mut entries, name, keywords)?;
                }
                Ok(CategoryTable(entries))
            }
        }

        deserializer.deserialize_any(TableVisitor)
    }
}

fn push_unique<E: de::Error>(
    entries: &mut Vec<(String, Vec<String>)>,
    name: String,
    keywords: Vec<String>,
) -> Result<(), E> {
    if entries.iter().any(|(existing, _)| *existing == name) {
        return Err(E::custom(format!("duplicate category '{}'", name)));
    }
    entries.push((name, keywords));
    Ok(())
}
