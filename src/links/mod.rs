// src/links/mod.rs
// =============================================================================
// Everything about URLs: normalization, the crawl scope gate, and pulling
// outbound links out of a page.
//
// Submodules:
// - normalize: absolute, fragment-free URLs and directory prefixes
// - scope: the allow/deny rules that define what may be crawled
// - html: <a href> extraction feeding both of the above
// =============================================================================

mod html;
mod normalize;
mod scope;

pub use html::{extract_hrefs, extract_links};
pub use normalize::{is_skippable_href, normalize, parse_page_url, path_prefix, NormalizedUrl};
pub use scope::ScopePolicy;
