/// Marker that ends the site root inside a base URL
const DOCS_SEGMENT: &str = "/docs";

/// Derives the site root that discovered links must start with
///
/// The base URL is cut at its first `/docs` occurrence; a base URL without
/// one is used whole. The comparison is a plain string prefix, so
/// `https://example.com` also admits `https://example.com.evil/` and
/// documentation mounted outside the prefix is never followed.
///
/// # Examples
///
/// ```
/// use docs_to_skill::url::site_root;
///
/// assert_eq!(site_root("https://bun.sh/docs"), "https://bun.sh");
/// assert_eq!(site_root("https://bun.sh/docs/api/"), "https://bun.sh");
/// assert_eq!(site_root("https://tokio.rs/tokio/tutorial"), "https://tokio.rs/tokio/tutorial");
/// ```
pub fn site_root(base_url: &str) -> &str {
    match base_url.find(DOCS_SEGMENT) {
        Some(idx) => &base_url[..idx],
        None => base_url,
    }
}

/// Checks whether a resolved link belongs to the crawled site
pub fn in_scope(url: &str, root: &str) -> bool {
    url.starts_with(root)
}
