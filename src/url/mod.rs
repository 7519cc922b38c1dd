//! URL handling module for docs-to-skill
//!
//! This module provides the include/exclude URL filter, canonicalization
//! (fragment stripping), link resolution and the site-root scope rule used
//! when following links.

mod filter;
mod normalize;
mod scope;

// Re-export main functions
pub use filter::UrlFilter;
pub use normalize::{canonicalize, resolve_link, strip_fragment};
pub use scope::{in_scope, site_root};
