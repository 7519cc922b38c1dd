//! Markdown document formatting
//!
//! Every function here is pure: the same pages, configuration and timestamp
//! always produce the same text.

use crate::config::SkillConfig;
use crate::output::categorizer::CategoryGroups;
use crate::output::OutputLayout;
use crate::state::ExtractedPage;

/// Headings listed per page in a reference document
const MAX_TOPICS: usize = 5;

/// Code blocks shown per page
const MAX_CODE_EXAMPLES: usize = 2;

/// Characters kept from each code block
const CODE_PREVIEW_CHARS: usize = 200;

/// Characters kept from page content
const SUMMARY_CHARS: usize = 500;

/// Formats the reference document of one category
///
/// # Example
///
/// ```
/// use docs_to_skill::output::format_reference_doc;
/// use docs_to_skill::state::{ExtractedPage, Heading};
///
/// let page = ExtractedPage {
///     url: "https://demo.dev/docs/start".to_string(),
///     title: "Getting Started".to_string(),
///     content: "Demo content here".to_string(),
///     code_blocks: vec!["npm install demo".to_string()],
///     headings: vec![Heading::new(1, "Getting Started")],
///     fetched_at: chrono::Utc::now(),
/// };
/// let doc = format_reference_doc("getting_started", &[&page]);
/// assert!(doc.starts_with("# Getting Started\n"));
/// assert!(doc.contains("• Getting Started"));
/// ```
pub fn format_reference_doc(category: &str, pages: &[&ExtractedPage]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", display_name(category)));

    for page in pages {
        md.push_str(&format!("## {}\n\n", page.title));
        md.push_str(&format!("**URL**: {}\n\n", page.url));

        if !page.headings.is_empty() {
            md.push_str("**Topics**:\n");
            for heading in page.headings.iter().take(MAX_TOPICS) {
                let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
                md.push_str(&format!("{}• {}\n", indent, heading.text));
            }
            md.push('\n');
        }

        if !page.code_blocks.is_empty() {
            md.push_str("**Code Examples**:\n```\n");
            for code in page.code_blocks.iter().take(MAX_CODE_EXAMPLES) {
                md.push_str(truncate_chars(code, CODE_PREVIEW_CHARS));
                md.push_str("\n...\n");
            }
            md.push_str("```\n\n");
        }

        if !page.content.is_empty() {
            md.push_str("**Summary**:\n");
            md.push_str(truncate_chars(&page.content, SUMMARY_CHARS));
            md.push_str("...\n\n");
        }

        md.push_str("---\n\n");
    }

    md
}

/// Formats the index document listing every category
pub fn format_index(
    config: &SkillConfig,
    groups: &CategoryGroups<'_>,
    total_pages: usize,
    generated_at: &str,
) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} - Reference\n\n", display_name(&config.name)));
    md.push_str(&format!("{}\n\n", config.description));

    md.push_str("## Documentation Categories\n\n");
    for (category, count) in groups.counts_sorted() {
        md.push_str(&format!(
            "- **{}**: {} pages\n",
            display_name(category),
            count
        ));
    }

    md.push_str(&format!("\nTotal Pages: {}\n", total_pages));
    md.push_str(&format!("Generated: {}\n", generated_at));

    md
}

/// Formats the skill prompt document
pub fn format_skill_prompt(
    config: &SkillConfig,
    groups: &CategoryGroups<'_>,
    total_pages: usize,
) -> String {
    let mut md = String::new();
    let counts = groups.counts_sorted();

    md.push_str(&format!("# {}\n\n", display_name(&config.name)));
    md.push_str(&format!("**Purpose**: {}\n\n", config.description));

    md.push_str("## When to Use This Skill\n\n");
    md.push_str(&format!(
        "Use this skill when working with {}:\n",
        config.name
    ));
    for (category, _) in &counts {
        md.push_str(&format!("- {}\n", category.replace('_', " ")));
    }

    md.push_str("\n## Quick Reference\n\n");
    md.push_str("### Categories\n\n");
    md.push_str("| Category | Pages |\n");
    md.push_str("|----------|-------|\n");
    for (category, count) in &counts {
        md.push_str(&format!("| {} | {} |\n", category, count));
    }

    md.push_str("\n## Reference Documentation\n\n");
    md.push_str(&format!(
        "Complete documentation available in `{}/`\n",
        OutputLayout::relative_references_dir(&config.name)
    ));
    md.push_str(&format!("\nTotal pages: {}\n", total_pages));

    md
}

/// Formats the instructions document
pub fn format_instructions(config: &SkillConfig) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} Instructions\n\n", display_name(&config.name)));
    md.push_str(&format!(
        "Auto-loaded context when editing {}-related files.\n\n",
        config.name
    ));

    md.push_str("## Quick Start\n\n");
    md.push_str("```bash\n");
    md.push_str("# Find documentation in\n");
    md.push_str(&format!(
        "{}/\n",
        OutputLayout::relative_skill_dir(&config.name)
    ));
    md.push_str("```\n\n");

    md.push_str("## File Patterns\n\n");
    for pattern in &config.file_patterns {
        md.push_str(&format!("- `{}`\n", pattern));
    }

    md.push_str("\n## Documentation Reference\n\n");
    md.push_str(&format!(
        "See `{}` for overview.\n",
        OutputLayout::relative_index_path(&config.name)
    ));
    md.push_str(&format!("\n**Generated from**: {}\n", config.base_url));

    md
}

/// Turns `getting_started` into `Getting Started`
///
/// Underscores become spaces; every letter following a non-letter is
/// uppercased and every other letter lowercased.
pub fn display_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for c in raw.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

/// Returns at most `max` characters of `s`, cut on a char boundary
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
