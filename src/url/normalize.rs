use url::Url;

/// Returns the canonical form of a URL: parsed, serialized, fragment removed
///
/// Unparseable input falls back to plain text truncation at the first `#`,
/// so a bad URL still yields a stable key.
///
/// # Examples
///
/// ```
/// use docs_to_skill::url::canonicalize;
///
/// assert_eq!(canonicalize("https://bun.sh/docs#install"), "https://bun.sh/docs");
/// assert_eq!(canonicalize("https://bun.sh"), "https://bun.sh/");
/// ```
pub fn canonicalize(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => strip_fragment(url_str).to_string(),
    }
}

/// Removes everything from the first `#` onwards
pub fn strip_fragment(url_str: &str) -> &str {
    match url_str.find('#') {
        Some(idx) => &url_str[..idx],
        None => url_str,
    }
}

/// Resolves a link href against the page it appeared on
///
/// Returns None if the link should be ignored:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors (same page)
/// - hrefs that do not resolve to an http(s) URL
///
/// The returned URL has its fragment stripped.
pub fn resolve_link(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute = page_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute.to_string())
}
