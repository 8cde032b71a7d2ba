// src/crawl/processor.rs
// =============================================================================
// The per-page pipeline. The fetcher hands us one page at a time; we decide
// what it is worth and return the links to crawl next.
//
// Every page goes through the same steps, and any step can end it early:
//
//   parse URL ──(unparseable)──────────────> Err(InvalidUrlError)
//   status    ──(301/302)──────────────────> Redirected
//             ──(anything but 200/204)─────> Rejected
//   scope     ──(not allowed)──────────────> Rejected
//   body      ──(204 or no bytes)──────────> Empty
//   extract   ──(too large, or panicked)───> Failed      (logged, crawl goes on)
//   duplicate ──(same as last page in dir)─> Duplicate   (nothing recorded)
//   trap      ──(too many pages in dir)────> TrapExceeded (recorded, no links)
//   aggregate + links ─────────────────────> Processed
//
// Extraction (text, tokens and hrefs) only reads the page and runs inside
// catch_unwind. Statistics are touched afterwards, in commit(), so a page
// that fails leaves the aggregates exactly as they were.
//
// The processor is single-threaded and takes &mut self. A scheduler that
// fetches concurrently must hold one lock around the whole process() call.
// =============================================================================

use super::stats::{PageRecord, ReportData, StatsAggregator};
use super::trap::TrapDetector;
use crate::config::CrawlConfig;
use crate::content::{decode_body, extract_text, tokenize, Fingerprint};
use crate::error::{ExtractError, InvalidUrlError};
use crate::links::{extract_links, parse_page_url, path_prefix, NormalizedUrl, ScopePolicy};
use scraper::Html;
use serde::Serialize;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use url::Url;

/// One fetched page, as handed over by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,
    /// HTTP status code (0 when the request never got a response)
    pub status: u16,
    /// Raw response body, if any
    pub content: Option<Vec<u8>>,
    /// Where the response actually came from, or the redirect target
    pub final_url: Option<String>,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, status: u16, content: Option<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            content,
            final_url: None,
        }
    }

    /// A 200 response carrying `html`.
    pub fn ok(url: impl Into<String>, html: &str) -> Self {
        Self::new(url, 200, Some(html.as_bytes().to_vec()))
    }

    pub fn with_final_url(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = Some(final_url.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Any status other than 200, 204, 301 and 302
    Status(u16),
    /// The page URL fails the scope gate
    OutOfScope,
}

/// How far a page got through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    Rejected { reason: RejectReason },
    Empty,
    /// Observed but not followed
    Redirected { target: Option<String> },
    /// The extractor failed on this page
    Failed { error: String },
    Duplicate { of: String, similarity: f64 },
    TrapExceeded { prefix: String, count: usize },
    Processed { words: usize },
}

impl PageOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PageOutcome::Rejected { .. } => "rejected",
            PageOutcome::Empty => "empty",
            PageOutcome::Redirected { .. } => "redirected",
            PageOutcome::Failed { .. } => "failed",
            PageOutcome::Duplicate { .. } => "duplicate",
            PageOutcome::TrapExceeded { .. } => "trap",
            PageOutcome::Processed { .. } => "processed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
    /// Absolute, fragment-free, in-scope links, in document order
    pub links: Vec<String>,
}

// Everything read out of one page before any state changes
struct ExtractedPage {
    text: String,
    tokens: Vec<String>,
    candidates: Vec<NormalizedUrl>,
    prefix: String,
}

pub struct PageProcessor {
    config: CrawlConfig,
    scope: ScopePolicy,
    stop_words: HashSet<String>,
    traps: TrapDetector,
    stats: StatsAggregator,
}

impl PageProcessor {
    pub fn new(config: CrawlConfig) -> Self {
        Self {
            scope: ScopePolicy::new(&config),
            stop_words: config.stop_word_set(),
            traps: TrapDetector::new(config.trap_threshold),
            stats: StatsAggregator::new(config.subdomain_suffix.clone()),
            config,
        }
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    pub fn traps(&self) -> &TrapDetector {
        &self.traps
    }

    pub fn report(&self) -> ReportData {
        self.stats.snapshot(self.config.top_n)
    }

    /// Runs one page through the pipeline and returns the links to crawl
    /// next. Only an unparseable page URL is an error.
    pub fn process(&mut self, page: &FetchedPage) -> Result<PageResult, InvalidUrlError> {
        let url = parse_page_url(&page.url)?;

        let (outcome, links) = match self.precheck(&url, page) {
            Some(outcome) => (outcome, Vec::new()),
            None => {
                let body = page.content.as_deref().unwrap_or_default();
                match guard_extraction(|| self.extract_page(&url, body)) {
                    Ok(extracted) => self.commit(&url, extracted),
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "failed to analyze page, skipping");
                        (PageOutcome::Failed { error: e.to_string() }, Vec::new())
                    }
                }
            }
        };

        tracing::debug!(url = %url, outcome = outcome.label(), links = links.len(), "page done");

        Ok(PageResult {
            url: url.to_string(),
            outcome,
            links,
        })
    }

    // Status, scope and emptiness checks. None means "go on and analyze".
    fn precheck(&self, url: &Url, page: &FetchedPage) -> Option<PageOutcome> {
        match page.status {
            200 | 204 => {}
            301 | 302 => {
                tracing::info!(
                    url = %url,
                    target = page.final_url.as_deref().unwrap_or("?"),
                    "redirect observed, not followed"
                );
                return Some(PageOutcome::Redirected {
                    target: page.final_url.clone(),
                });
            }
            status => {
                return Some(PageOutcome::Rejected {
                    reason: RejectReason::Status(status),
                })
            }
        }

        if !self.scope.is_in_scope(url) {
            return Some(PageOutcome::Rejected {
                reason: RejectReason::OutOfScope,
            });
        }

        let has_body = page
            .content
            .as_deref()
            .is_some_and(|body| !body.iter().all(u8::is_ascii_whitespace));
        if page.status == 204 || !has_body {
            return Some(PageOutcome::Empty);
        }

        None
    }

    // Read-only: parses the body and pulls out text, tokens and links
    fn extract_page(&self, url: &Url, body: &[u8]) -> Result<ExtractedPage, ExtractError> {
        let limit = self.config.max_content_size;
        if body.len() > limit {
            return Err(ExtractError::ContentTooLarge {
                size: body.len(),
                limit,
            });
        }

        let html = decode_body(body);
        let document = Html::parse_document(&html);

        let text = extract_text(&document);
        let candidates = extract_links(&document, url, &self.scope);
        let tokens = tokenize(&text).collect();

        Ok(ExtractedPage {
            text,
            tokens,
            candidates,
            prefix: path_prefix(url),
        })
    }

    fn commit(&mut self, url: &Url, page: ExtractedPage) -> (PageOutcome, Vec<String>) {
        let ExtractedPage {
            text,
            tokens,
            candidates,
            prefix,
        } = page;

        // Compare only with the latest page of the same directory
        if let Some(previous) = self.stats.last_page_for_prefix(&prefix) {
            let n = self.config.shingle_size;
            let current = Fingerprint::from_tokens(&tokens, n);
            let earlier = Fingerprint::from_text(&previous.text, n);
            if current.is_duplicate(&earlier, self.config.similarity_threshold) {
                let outcome = PageOutcome::Duplicate {
                    of: previous.url.clone(),
                    similarity: current.similarity(&earlier),
                };
                return (outcome, Vec::new());
            }
        }

        let trapped = self.traps.record_and_check(&prefix);

        let page_url = NormalizedUrl::from_url(url.clone());
        self.stats.record_page(page_url.as_str(), tokens.len());
        self.stats.record_words(&tokens, &self.stop_words);
        let record = PageRecord {
            url: page_url.into_string(),
            text,
        };
        if self.stats.remember_page(&prefix, record) {
            self.stats.record_subdomain(url);
        }

        if trapped {
            let count = self.traps.count(&prefix);
            return (PageOutcome::TrapExceeded { prefix, count }, Vec::new());
        }

        let mut links = Vec::with_capacity(candidates.len());
        for link in candidates {
            self.stats.record_link(&link);
            links.push(link.into_string());
        }

        (PageOutcome::Processed { words: tokens.len() }, links)
    }
}

// Runs an extraction step, turning a panic into ExtractError::Panicked.
// Extraction never touches processor state, so nothing is left half done.
fn guard_extraction<T>(
    extract: impl FnOnce() -> Result<T, ExtractError>,
) -> Result<T, ExtractError> {
    panic::catch_unwind(AssertUnwindSafe(extract))
        .unwrap_or_else(|payload| Err(ExtractError::Panicked(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Default for PageProcessor {
    fn default() -> Self {
        Self::new(CrawlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body><p>Crawler notes</p><a href="/next">n</a></body></html>"#;

    #[test]
    fn test_invalid_page_url_is_error() {
        let mut processor = PageProcessor::default();
        let result = processor.process(&FetchedPage::ok("not a url", PAGE));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_200_rejected() {
        let mut processor = PageProcessor::default();
        let page = FetchedPage::new("http://www.ics.uci.edu/a", 404, Some(PAGE.into()));
        let result = processor.process(&page).unwrap();
        assert_eq!(
            result.outcome,
            PageOutcome::Rejected { reason: RejectReason::Status(404) }
        );
        assert!(result.links.is_empty());
        assert_eq!(processor.stats().processed_page_count(), 0);
    }

    #[test]
    fn test_out_of_scope_rejected() {
        let mut processor = PageProcessor::default();
        let result = processor
            .process(&FetchedPage::ok("https://www.example.com/", PAGE))
            .unwrap();
        assert_eq!(
            result.outcome,
            PageOutcome::Rejected { reason: RejectReason::OutOfScope }
        );
    }

    #[test]
    fn test_empty_bodies() {
        let mut processor = PageProcessor::default();
        let url = "http://www.ics.uci.edu/a";

        let missing = processor.process(&FetchedPage::new(url, 200, None)).unwrap();
        assert_eq!(missing.outcome, PageOutcome::Empty);

        let blank = processor.process(&FetchedPage::ok(url, "  \n ")).unwrap();
        assert_eq!(blank.outcome, PageOutcome::Empty);

        let no_content = processor
            .process(&FetchedPage::new(url, 204, Some(PAGE.into())))
            .unwrap();
        assert_eq!(no_content.outcome, PageOutcome::Empty);

        assert_eq!(processor.report(), PageProcessor::default().report());
    }

    #[test]
    fn test_redirect_observed_not_followed() {
        let mut processor = PageProcessor::default();
        let page = FetchedPage::new("http://www.ics.uci.edu/old", 301, Some(PAGE.into()))
            .with_final_url("http://www.ics.uci.edu/new");
        let result = processor.process(&page).unwrap();
        assert_eq!(
            result.outcome,
            PageOutcome::Redirected { target: Some("http://www.ics.uci.edu/new".into()) }
        );
        assert!(result.links.is_empty());
        assert_eq!(processor.stats().unique_page_count(), 0);
    }

    #[test]
    fn test_processed_page_updates_everything() {
        let mut processor = PageProcessor::default();
        let result = processor
            .process(&FetchedPage::ok("http://www.ics.uci.edu/about/index.html#top", PAGE))
            .unwrap();
        assert_eq!(result.url, "http://www.ics.uci.edu/about/index.html#top");
        assert_eq!(result.outcome, PageOutcome::Processed { words: 2 });
        assert_eq!(result.links, vec!["http://www.ics.uci.edu/next"]);

        let stats = processor.stats();
        assert_eq!(stats.unique_page_count(), 1);
        assert_eq!(stats.word_count("crawler"), 1);
        assert!(stats.page("http://www.ics.uci.edu/about/index.html").is_some());
        assert_eq!(stats.subdomains_sorted()[0].host, "www.ics.uci.edu");
        assert_eq!(processor.traps().count("http://www.ics.uci.edu/about/"), 1);
    }

    #[test]
    fn test_oversized_body_fails_and_leaves_stats_alone() {
        let mut processor = PageProcessor::new(CrawlConfig {
            max_content_size: 16,
            ..Default::default()
        });
        let before = processor.report();

        let result = processor
            .process(&FetchedPage::ok("http://www.ics.uci.edu/big/page", PAGE))
            .unwrap();

        assert!(matches!(
            result.outcome,
            PageOutcome::Failed { ref error } if error.contains("too large")
        ));
        assert!(result.links.is_empty());
        assert_eq!(processor.report(), before);
        assert_eq!(processor.traps().count("http://www.ics.uci.edu/big/"), 0);

        // The next page that fits is processed normally
        let small = processor
            .process(&FetchedPage::ok("http://www.ics.uci.edu/s", "<p>tiny</p>"))
            .unwrap();
        assert_eq!(small.outcome, PageOutcome::Processed { words: 1 });
    }

    #[test]
    fn test_panic_during_extraction_is_contained() {
        let result: Result<(), ExtractError> = guard_extraction(|| panic!("parser blew up"));
        assert_eq!(result, Err(ExtractError::Panicked("parser blew up".to_string())));

        let formatted: Result<(), ExtractError> =
            guard_extraction(|| panic!("bad node {}", 7));
        assert_eq!(formatted, Err(ExtractError::Panicked("bad node 7".to_string())));

        assert_eq!(guard_extraction(|| Ok(3)), Ok(3));
    }

    #[test]
    fn test_curly_contractions_are_stop_words() {
        let mut processor = PageProcessor::default();
        let html = "<p>It’s what we’re doing and it's what we're doing. Don’t stop, don’t.</p>";
        processor
            .process(&FetchedPage::ok("http://www.ics.uci.edu/quotes", html))
            .unwrap();

        let stats = processor.stats();
        assert_eq!(stats.word_count("it’s"), 0);
        assert_eq!(stats.word_count("it's"), 0);
        assert_eq!(stats.word_count("don't"), 0);
        assert_eq!(stats.word_count("we're"), 0);

        let top: Vec<String> = processor.report().top_words.into_iter().map(|w| w.word).collect();
        assert_eq!(top, vec!["stop"]);
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let result = PageResult {
            url: "http://www.ics.uci.edu/".into(),
            outcome: PageOutcome::TrapExceeded {
                prefix: "http://www.ics.uci.edu/".into(),
                count: 16,
            },
            links: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "trap_exceeded");
        assert_eq!(json["count"], 16);
    }
}
