// src/crawl/mod.rs
// =============================================================================
// Crawl-level state and the per-page pipeline that drives it.
//
// Submodules:
// - processor: validate -> extract -> dedupe -> count -> links, per page
// - stats: crawl-lifetime aggregates and the report snapshot
// - trap: per-directory page counts that cut off trap fan-out
// =============================================================================

mod processor;
mod stats;
mod trap;

pub use processor::{FetchedPage, PageOutcome, PageProcessor, PageResult, RejectReason};
pub use stats::{LongestPage, PageRecord, ReportData, StatsAggregator, SubdomainCount, WordCount};
pub use trap::TrapDetector;
