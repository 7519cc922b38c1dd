use crate::config::types::{CategoryTable, CheckpointConfig, Selectors, SkillConfig, UrlPatterns};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &SkillConfig) -> Result<(), ConfigError> {
    validate_identifier("name", &config.name)?;

    if config.description.trim().is_empty() {
        return Err(ConfigError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    validate_http_url("base_url", &config.base_url)?;
    if let Some(start_url) = &config.start_url {
        validate_http_url("start_url", start_url)?;
    }

    validate_limits(config)?;
    validate_url_patterns(&config.url_patterns)?;
    validate_selectors(&config.selectors)?;
    validate_categories(&config.categories)?;
    validate_checkpoint(&config.checkpoint)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates page budget and politeness delay
fn validate_limits(config: &SkillConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if !config.rate_limit.is_finite() || config.rate_limit < 0.0 {
        return Err(ConfigError::Validation(format!(
            "rate_limit must be a non-negative number of seconds, got {}",
            config.rate_limit
        )));
    }

    Ok(())
}

/// Names end up in file paths, so only a conservative character set is allowed
fn validate_identifier(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "{} must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            field, value
        )));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

fn validate_url_patterns(patterns: &UrlPatterns) -> Result<(), ConfigError> {
    for pattern in patterns.include.iter().chain(&patterns.exclude) {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }
    Ok(())
}

fn validate_selectors(selectors: &Selectors) -> Result<(), ConfigError> {
    for (field, list) in [
        ("title", &selectors.title),
        ("main_content", &selectors.main_content),
        ("code_blocks", &selectors.code_blocks),
    ] {
        for raw in list {
            Selector::parse(raw).map_err(|e| {
                ConfigError::InvalidSelector(format!("selectors.{} '{}': {:?}", field, raw, e))
            })?;
        }
    }
    Ok(())
}

fn validate_categories(categories: &CategoryTable) -> Result<(), ConfigError> {
    for (name, keywords) in categories.iter() {
        validate_identifier("category name", name)?;

        if keywords.iter().any(|kw| kw.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "category '{}' contains an empty keyword",
                name
            )));
        }
    }
    Ok(())
}

fn validate_checkpoint(checkpoint: &CheckpointConfig) -> Result<(), ConfigError> {
    if checkpoint.interval < 1 {
        return Err(ConfigError::Validation(format!(
            "checkpoint.interval must be >= 1, got {}",
            checkpoint.interval
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SkillConfig {
        SkillConfig {
            name: "demo".to_string(),
            description: "Demo docs".to_string(),
            base_url: "https://demo.dev/docs".to_string(),
            start_url: None,
            max_pages: 10,
            rate_limit: 0.0,
            url_patterns: UrlPatterns::default(),
            selectors: Selectors::default(),
            categories: CategoryTable::default(),
            file_patterns: vec![],
            checkpoint: CheckpointConfig::default(),
            user_agent: "TestBot/1.0".to_string(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("name", "bun").is_ok());
        assert!(validate_identifier("name", "next-js_14").is_ok());

        assert!(validate_identifier("name", "").is_err());
        assert!(validate_identifier("name", "../etc").is_err());
        assert!(validate_identifier("name", "has space").is_err());
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut config = base_config();
        config.description = "   ".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_urls_rejected() {
        let mut config = base_config();
        config.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        let mut config = base_config();
        config.start_url = Some("ftp://demo.dev/".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_negative_rate_limit_rejected() {
        let mut config = base_config();
        config.rate_limit = -1.0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let mut config = base_config();
        config.url_patterns.exclude = vec!["(unclosed".to_string()];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let mut config = base_config();
        config.selectors.title = vec!["h1[".to_string()];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_category_names_must_be_path_safe() {
        let mut config = base_config();
        config.categories = CategoryTable::new(vec![(
            "../escape".to_string(),
            vec!["x".to_string()],
        )]);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_checkpoint_interval_rejected() {
        let mut config = base_config();
        config.checkpoint.interval = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }
}
