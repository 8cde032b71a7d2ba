// src/links/html.rs
// =============================================================================
// This module pulls outbound links out of a parsed HTML page.
//
// For every <a href="..."> on the page:
// 1. Skip hrefs that can never be crawled (#anchors, mailto:, javascript:)
// 2. Resolve the href against the page URL and drop its fragment
// 3. Keep it only if the scope gate accepts it
//
// A single broken href never fails the page. It is logged at debug level
// and skipped; the other links on the page are still returned.
//
// Rust concepts:
// - Iterators: document.select() walks matching elements in document order
// - LazyLock: the selector is parsed once, on first use
// =============================================================================

use super::normalize::{is_skippable_href, normalize, NormalizedUrl};
use super::scope::ScopePolicy;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

// Every href attribute value on the page, in document order
pub fn extract_hrefs(document: &Html) -> Vec<String> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}

// Absolute, fragment-free, in-scope links from the page at `base`
//
// Example:
//   html = "<a href='/next'>n</a><a href='/x?action=download'>d</a>"
//   base = "http://www.ics.uci.edu/page"
//   result = ["http://www.ics.uci.edu/next"]
pub fn extract_links(document: &Html, base: &Url, scope: &ScopePolicy) -> Vec<NormalizedUrl> {
    let mut links = Vec::new();

    for href in extract_hrefs(document) {
        if is_skippable_href(&href) {
            continue;
        }

        let link = match normalize(base, &href) {
            Ok(link) => link,
            Err(e) => {
                tracing::debug!(page = %base, error = %e, "skipping malformed href");
                continue;
            }
        };

        if scope.is_in_scope(link.as_url()) {
            links.push(link);
        } else {
            tracing::trace!(link = %link, "link out of scope");
        }
    }

    links
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a static LazyLock<Selector>?
//    - Parsing a selector is not free, and "a[href]" never changes
//    - LazyLock parses it the first time it is used and shares it after
//    - The unwrap() can only fail on a typo in the constant, which every
//      test in this module would catch
//
// 2. Why filter_map?
//    - attr("href") returns Option<&str>
//    - filter_map keeps the Some values and drops the None ones in one step
//
// 3. What does %base mean inside tracing::debug!?
//    - It records the field using its Display impl
//    - ?value would use Debug instead
// -----------------------------------------------------------------------------
