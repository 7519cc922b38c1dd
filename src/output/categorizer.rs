//! Keyword categorization of extracted pages

use crate::config::CategoryTable;
use crate::state::ExtractedPage;

/// Category assigned when no keyword matches
pub const DEFAULT_CATEGORY: &str = "reference";

/// Characters of page content included in the search text
const CONTENT_PREFIX_CHARS: usize = 200;

/// Assigns a page to the first category with a matching keyword
///
/// The search text is `"{title} {url} {first 200 chars of content}"`,
/// lowercased. Categories are tried in declaration order and, within a
/// category, keywords in declaration order; the first keyword contained in
/// the search text decides. This is first-match, not best-match.
///
/// # Examples
///
/// ```
/// use docs_to_skill::config::CategoryTable;
/// use docs_to_skill::output::categorize;
/// # use docs_to_skill::state::ExtractedPage;
/// # let page = ExtractedPage {
/// #     url: "https://demo.dev/docs/intro".to_string(),
/// #     title: "Tutorial".to_string(),
/// #     content: String::new(),
/// #     code_blocks: vec![],
/// #     headings: vec![],
/// #     fetched_at: chrono::Utc::now(),
/// # };
///
/// let categories = CategoryTable::new(vec![
///     ("guides".to_string(), vec!["tutorial".to_string()]),
///     ("api".to_string(), vec!["tutorial".to_string(), "reference".to_string()]),
/// ]);
/// assert_eq!(categorize(&page, &categories), "guides");
/// ```
pub fn categorize<'a>(page: &ExtractedPage, categories: &'a CategoryTable) -> &'a str {
    let haystack = search_text(page);

    for (name, keywords) in categories.iter() {
        for keyword in keywords {
            if haystack.contains(&keyword.to_lowercase()) {
                return name;
            }
        }
    }

    DEFAULT_CATEGORY
}

fn search_text(page: &ExtractedPage) -> String {
    let content: String = page.content.chars().take(CONTENT_PREFIX_CHARS).collect();
    format!("{} {} {}", page.title, page.url, content).to_lowercase()
}

/// Pages grouped by category
///
/// Categories appear in the order their first page was seen; pages keep the
/// order of the input slice.
#[derive(Debug, Clone, Default)]
pub struct CategoryGroups<'a> {
    groups: Vec<(String, Vec<&'a ExtractedPage>)>,
}

impl<'a> CategoryGroups<'a> {
    /// Groups pages by their assigned category
    pub fn build(pages: &'a [ExtractedPage], categories: &CategoryTable) -> Self {
        let mut groups: Vec<(String, Vec<&'a ExtractedPage>)> = Vec::new();

        for page in pages {
            let category = categorize(page, categories);
            match groups.iter_mut().find(|(name, _)| name == category) {
                Some((_, members)) => members.push(page),
                None => groups.push((category.to_string(), vec![page])),
            }
        }

        Self { groups }
    }

    /// Groups in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a ExtractedPage])> {
        self.groups
            .iter()
            .map(|(name, pages)| (name.as_str(), pages.as_slice()))
    }

    /// Category names with page counts, sorted by name
    pub fn counts_sorted(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .groups
            .iter()
            .map(|(name, pages)| (name.as_str(), pages.len()))
            .collect();
        counts.sort_by(|a, b| a.0.cmp(b.0));
        counts
    }

    pub fn get(&self, category: &str) -> Option<&[&'a ExtractedPage]> {
        self.groups
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, pages)| pages.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of grouped pages
    pub fn page_count(&self) -> usize {
        self.groups.iter().map(|(_, pages)| pages.len()).sum()
    }
}
