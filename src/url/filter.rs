use crate::config::UrlPatterns;
use crate::ConfigError;
use regex::Regex;

/// Decides whether a discovered URL is eligible for crawling
///
/// Patterns are compiled once. Matching is a regex *search*, not a full match,
/// so `"/blog"` rejects any URL containing `/blog`.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl UrlFilter {
    /// Compiles the configured include/exclude patterns
    ///
    /// # Returns
    ///
    /// * `Ok(UrlFilter)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - A pattern is not a valid regex
    pub fn new(patterns: &UrlPatterns) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile_all(&patterns.include)?,
            exclude: compile_all(&patterns.exclude)?,
        })
    }

    /// Checks a URL against the exclude list, then the include list
    ///
    /// # Rules
    ///
    /// 1. Any exclude match rejects, whatever the include list says
    /// 2. With a non-empty include list, at least one include pattern must match
    /// 3. With no include patterns, everything not excluded is admitted
    ///
    /// # Examples
    ///
    /// ```
    /// use docs_to_skill::config::UrlPatterns;
    /// use docs_to_skill::url::UrlFilter;
    ///
    /// let filter = UrlFilter::new(&UrlPatterns {
    ///     include: vec!["/docs/".to_string()],
    ///     exclude: vec!["/docs/legacy".to_string()],
    /// })
    /// .unwrap();
    ///
    /// assert!(filter.admit("https://bun.sh/docs/install"));
    /// assert!(!filter.admit("https://bun.sh/docs/legacy/install"));
    /// assert!(!filter.admit("https://bun.sh/blog"));
    /// ```
    pub fn admit(&self, url: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(url)) {
            return false;
        }

        if self.include.is_empty() {
            return true;
        }

        self.include.iter().any(|re| re.is_match(url))
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
        })
        .collect()
}
