// src/links/scope.rs
// =============================================================================
// The scope gate: decides whether a URL may be crawled at all.
//
// A URL is in scope only when every rule passes:
// 1. scheme is http or https
// 2. host is a subdomain of one of the allowed parent domains (the bare
//    parent itself is not, the same rule the subdomain tally uses)
// 3. query has no blocked action marker (action=download, ical=1, ...)
// 4. path has no blocked upload directory
// 5. path does not contain "pdf" anywhere
// 6. path does not end in a non-HTML file extension
//
// The policy is built once from CrawlConfig and never changes afterwards,
// so is_in_scope is a pure function of its input.
// =============================================================================

use crate::config::CrawlConfig;
use crate::error::InvalidUrlError;
use std::collections::HashSet;
use url::Url;

#[derive(Debug, Clone)]
pub struct ScopePolicy {
    // Allowed parent domains with exactly one leading dot, lowercased
    allowed_domains: Vec<String>,
    blocked_query_markers: Vec<String>,
    blocked_path_segments: Vec<String>,
    blocked_extensions: HashSet<String>,
}

impl ScopePolicy {
    pub fn new(config: &CrawlConfig) -> Self {
        let allowed_domains = config
            .allowed_domains
            .iter()
            .map(|d| d.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .map(|d| format!(".{}", d))
            .collect();

        let blocked_extensions = config
            .blocked_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .collect();

        Self {
            allowed_domains,
            blocked_query_markers: config.blocked_query_markers.clone(),
            blocked_path_segments: config.blocked_path_segments.clone(),
            blocked_extensions,
        }
    }

    pub fn is_in_scope(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match url.host_str() {
            Some(host) if self.host_allowed(host) => {}
            _ => return false,
        }

        if let Some(query) = url.query() {
            if self.blocked_query_markers.iter().any(|m| query.contains(m.as_str())) {
                return false;
            }
        }

        let path = url.path();
        if self.blocked_path_segments.iter().any(|s| path.contains(s.as_str())) {
            return false;
        }

        if path.contains("pdf") {
            return false;
        }

        !self.has_blocked_extension(path)
    }

    /// Parses `raw` and applies the gate. An unparseable URL is an error,
    /// not an out-of-scope verdict.
    pub fn check_str(&self, raw: &str) -> Result<bool, InvalidUrlError> {
        let url = Url::parse(raw.trim()).map_err(|e| InvalidUrlError::new(raw, e))?;
        Ok(self.is_in_scope(&url))
    }

    fn host_allowed(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.allowed_domains
            .iter()
            .any(|domain| host.ends_with(domain.as_str()))
    }

    // Case-insensitive, anchored at the end of the path
    fn has_blocked_extension(&self, path: &str) -> bool {
        let lower = path.to_ascii_lowercase();
        match lower.rsplit_once('.') {
            Some((_, ext)) => !ext.contains('/') && self.blocked_extensions.contains(ext),
            None => false,
        }
    }
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self::new(&CrawlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_scope(raw: &str) -> bool {
        ScopePolicy::default().check_str(raw).unwrap()
    }

    #[test]
    fn test_allowed_hosts() {
        assert!(in_scope("http://www.ics.uci.edu/"));
        assert!(in_scope("https://vision.ics.uci.edu/papers/"));
        assert!(in_scope("https://www.stat.uci.edu/news"));
    }

    #[test]
    fn test_bare_parent_domain_not_in_scope() {
        assert!(!in_scope("https://ics.uci.edu/"));
        assert!(!in_scope("http://stat.uci.edu/news"));
        assert!(in_scope("https://www.ics.uci.edu/"));
    }

    #[test]
    fn test_foreign_hosts() {
        assert!(!in_scope("https://www.uci.edu/"));
        assert!(!in_scope("https://www.google.com/calendar/event?action=TEMPLATE"));
        assert!(!in_scope("https://fakeics.uci.edu/"));
        assert!(!in_scope("https://ics.uci.edu.evil.com/"));
    }

    #[test]
    fn test_scheme() {
        assert!(!in_scope("ftp://www.ics.uci.edu/file"));
        assert!(!in_scope("mailto:someone@ics.uci.edu"));
    }

    #[test]
    fn test_blocked_query_markers() {
        assert!(!in_scope(
            "http://sli.ics.uci.edu/Classes/2016S-274b?action=download&upname=HW4c.zip"
        ));
        assert!(!in_scope("https://wics.ics.uci.edu/events/2022-05-23/?ical=1"));
        assert!(!in_scope("https://www.ics.uci.edu/wiki?action=upload"));
        assert!(in_scope("https://www.ics.uci.edu/wiki?action=edit"));
    }

    #[test]
    fn test_blocked_paths() {
        assert!(!in_scope("http://www.stat.uci.edu/wp-content/uploads/Abstract6-6-19"));
        assert!(!in_scope("https://www.ics.uci.edu/pdfs/handbook"));
        assert!(!in_scope("https://www.ics.uci.edu/paper.pdf"));
    }

    #[test]
    fn test_blocked_extensions() {
        assert!(!in_scope("https://www.ics.uci.edu/logo.PNG"));
        assert!(!in_scope("https://www.ics.uci.edu/data/set.zip"));
        assert!(!in_scope("https://www.ics.uci.edu/~bob/hw1.py"));
        assert!(!in_scope("https://www.ics.uci.edu/slides.pptx"));
        assert!(in_scope("https://www.ics.uci.edu/page.html"));
        assert!(in_scope("https://www.ics.uci.edu/v1.2/intro"));
    }

    #[test]
    fn test_extension_only_at_end() {
        // ".r" in the middle of a path is not an extension
        assert!(in_scope("https://www.ics.uci.edu/a.r/index"));
        assert!(!in_scope("https://www.ics.uci.edu/analysis.r"));
    }

    #[test]
    fn test_scope_is_pure() {
        let policy = ScopePolicy::default();
        let url = Url::parse("https://www.informatics.uci.edu/research/").unwrap();
        let first = policy.is_in_scope(&url);
        for _ in 0..3 {
            assert_eq!(policy.is_in_scope(&url), first);
        }
    }

    #[test]
    fn test_unparseable_is_error() {
        assert!(ScopePolicy::default().check_str("::not a url::").is_err());
    }

    #[test]
    fn test_custom_domains() {
        let config = CrawlConfig {
            allowed_domains: vec!["example.edu".to_string()],
            ..Default::default()
        };
        let policy = ScopePolicy::new(&config);
        assert!(policy.check_str("https://cs.example.edu/").unwrap());
        assert!(!policy.check_str("https://www.ics.uci.edu/").unwrap());
    }
}
