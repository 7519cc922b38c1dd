//! Output module for generating skill artifacts
//!
//! This module handles:
//! - Assigning extracted pages to categories
//! - Formatting the per-category references, index, skill prompt and instructions
//! - Writing those documents under the workspace layout
//! - Crawl statistics for the terminal

mod categorizer;
mod markdown;
pub mod stats;

pub use categorizer::{categorize, CategoryGroups, DEFAULT_CATEGORY};
pub use markdown::{
    display_name, format_index, format_instructions, format_reference_doc, format_skill_prompt,
    truncate_chars,
};
pub use stats::{format_report, print_report, CrawlReport};

use crate::config::SkillConfig;
use crate::state::ExtractedPage;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

const GITHUB_DIR: &str = ".github";
const SKILLS_DIR: &str = "copilot-skills";
const REFERENCES_DIR: &str = "references";
const INDEX_FILE: &str = "reference.md";
const CACHE_FILE: &str = ".scrape_cache.json";

/// Where every generated file of one skill lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    name: String,
}

impl OutputLayout {
    /// Creates the layout for skill `name` under the workspace `root`
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `.github/copilot-skills/{name}`
    pub fn skill_dir(&self) -> PathBuf {
        self.root.join(GITHUB_DIR).join(SKILLS_DIR).join(&self.name)
    }

    pub fn references_dir(&self) -> PathBuf {
        self.skill_dir().join(REFERENCES_DIR)
    }

    pub fn reference_path(&self, category: &str) -> PathBuf {
        self.references_dir().join(format!("{}.md", category))
    }

    pub fn index_path(&self) -> PathBuf {
        self.skill_dir().join(INDEX_FILE)
    }

    pub fn prompt_path(&self) -> PathBuf {
        self.root
            .join(GITHUB_DIR)
            .join("prompts")
            .join(format!("{}.skill.prompt.md", self.name))
    }

    pub fn instructions_path(&self) -> PathBuf {
        self.root
            .join(GITHUB_DIR)
            .join("instructions")
            .join(format!("{}.instructions.md", self.name))
    }

    /// Checkpoint and page cache file
    pub fn cache_path(&self) -> PathBuf {
        self.skill_dir().join(CACHE_FILE)
    }

    /// Skill directory as written inside generated documents
    pub fn relative_skill_dir(name: &str) -> String {
        format!("{}/{}/{}", GITHUB_DIR, SKILLS_DIR, name)
    }

    pub fn relative_references_dir(name: &str) -> String {
        format!("{}/{}", Self::relative_skill_dir(name), REFERENCES_DIR)
    }

    pub fn relative_index_path(name: &str) -> String {
        format!("{}/{}", Self::relative_skill_dir(name), INDEX_FILE)
    }
}

/// Reference document of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDoc {
    pub category: String,
    pub contents: String,
}

/// Every generated document of a skill, in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillArtifacts {
    /// One per non-empty category, in first-seen order
    pub references: Vec<ReferenceDoc>,
    pub index: String,
    pub skill_prompt: String,
    pub instructions: String,
}

/// Builds all documents from the extracted pages
///
/// Pages are grouped by [`categorize`]; categories with no pages get no
/// reference document. The result depends only on the arguments, so
/// regenerating from the same pages and timestamp yields identical text.
///
/// # Arguments
///
/// * `pages` - Extracted pages in crawl order
/// * `config` - Skill name, description, categories and file patterns
/// * `generated_at` - Timestamp written into the index
pub fn generate(
    pages: &[ExtractedPage],
    config: &SkillConfig,
    generated_at: DateTime<Utc>,
) -> SkillArtifacts {
    let groups = CategoryGroups::build(pages, &config.categories);
    let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    let references = groups
        .iter()
        .map(|(category, members)| ReferenceDoc {
            category: category.to_string(),
            contents: format_reference_doc(category, members),
        })
        .collect();

    SkillArtifacts {
        references,
        index: format_index(config, &groups, pages.len(), &timestamp),
        skill_prompt: format_skill_prompt(config, &groups, pages.len()),
        instructions: format_instructions(config),
    }
}

/// Writes generated documents, creating directories as needed
///
/// Existing files are overwritten. Reference documents of categories that
/// no longer have pages are left in place.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths written, references first
/// * `Err(OutputError)` - A directory or file could not be written
pub fn write_artifacts(
    artifacts: &SkillArtifacts,
    layout: &OutputLayout,
) -> OutputResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.references.len() + 3);

    for doc in &artifacts.references {
        let path = layout.reference_path(&doc.category);
        write_file(&path, &doc.contents)?;
        written.push(path);
    }

    for (path, contents) in [
        (layout.index_path(), &artifacts.index),
        (layout.prompt_path(), &artifacts.skill_prompt),
        (layout.instructions_path(), &artifacts.instructions),
    ] {
        write_file(&path, contents)?;
        written.push(path);
    }

    tracing::info!("Wrote {} files under {}", written.len(), layout.root().display());
    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| OutputError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
