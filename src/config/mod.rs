//! Configuration module for docs-to-skill
//!
//! This module handles loading, parsing, and validating documentation target
//! descriptors. Both TOML and JSON files are accepted; the format follows the
//! file extension.
//!
//! # Example
//!
//! ```no_run
//! use docs_to_skill::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("configs/bun.json")).unwrap();
//! println!("Crawl will fetch at most {} pages", config.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    split_selector_list, CategoryTable, CheckpointConfig, Selectors, SkillConfig, UrlPatterns,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, ConfigFormat,
};
