// src/lib.rs
// =============================================================================
// crawl-sieve: the page-analysis core of a scoped university crawler.
//
// A fetcher hands over one fetched page at a time. The core decides whether
// the page is worth reading, pulls out its visible text, skips it if it is a
// near-copy of the previous page in the same directory, updates the crawl
// statistics, and returns the in-scope links to fetch next.
//
// Modules:
// - config: every tunable constant, loadable from JSON
// - links: URL normalization, the scope gate, <a href> extraction
// - content: text extraction, tokenizing, shingle fingerprints
// - crawl: trap detection, statistics, and the page processor
// - error: typed errors
// =============================================================================

pub mod config;
pub mod content;
pub mod crawl;
pub mod error;
pub mod links;

pub use config::CrawlConfig;
pub use crawl::{FetchedPage, PageOutcome, PageProcessor, PageResult, ReportData};
pub use error::{ConfigError, ExtractError, InvalidUrlError};
