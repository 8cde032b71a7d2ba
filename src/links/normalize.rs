// src/links/normalize.rs
// =============================================================================
// Turns hrefs into absolute, fragment-free URLs.
//
// Two URLs that differ only by their fragment (#section) point at the same
// page, so the fragment is always dropped. Everything else about the URL
// (scheme, host, path, query) is kept exactly as the url crate serializes it.
//
// Also computes the "path prefix" of a page: the URL cut back to its last
// directory. Trap detection and duplicate detection both group pages by it.
// =============================================================================

use crate::error::InvalidUrlError;
use std::fmt;
use url::Url;

/// An absolute URL with its fragment removed.
///
/// Equality and hashing go through the serialized form, so
/// `http://a.ics.uci.edu/x#one` and `http://a.ics.uci.edu/x#two` are the
/// same `NormalizedUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    pub fn from_url(mut url: Url) -> Self {
        url.set_fragment(None);
        Self(url)
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_string(self) -> String {
        self.0.into()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Parses the URL a page was fetched from. There is no base to fall back
// on, so anything that is not an absolute URL is an error.
pub fn parse_page_url(raw: &str) -> Result<Url, InvalidUrlError> {
    Url::parse(raw.trim()).map_err(|e| InvalidUrlError::new(raw, e))
}

// Resolves an href found on the page at `base`.
//
// Examples (base = "http://www.ics.uci.edu/about/index.html"):
//   "/next"               -> "http://www.ics.uci.edu/next"
//   "people.html"         -> "http://www.ics.uci.edu/about/people.html"
//   "../grad/#apply"      -> "http://www.ics.uci.edu/grad/"
//   "https://cs.uci.edu"  -> "https://cs.uci.edu/"
pub fn normalize(base: &Url, href: &str) -> Result<NormalizedUrl, InvalidUrlError> {
    let href = href.trim();

    // Absolute hrefs parse on their own; anything else is joined onto base
    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => base.join(href).map_err(|e| InvalidUrlError::new(href, e))?,
    };

    Ok(NormalizedUrl::from_url(resolved))
}

// hrefs that can never lead to a crawlable page: in-page anchors and
// non-navigational schemes.
pub fn is_skippable_href(href: &str) -> bool {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("javascript:")
        || lower.starts_with("data:")
}

// The directory a page lives in: origin plus the path up to and including
// its last '/'. Query and fragment are dropped.
//
//   "https://wics.ics.uci.edu/events/2022-05-22"     -> "https://wics.ics.uci.edu/events/"
//   "http://www.ics.uci.edu/page?foo=1"               -> "http://www.ics.uci.edu/"
pub fn path_prefix(url: &Url) -> String {
    let path = url.path();
    let dir = match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "/",
    };
    format!("{}{}", url.origin().ascii_serialization(), dir)
}
