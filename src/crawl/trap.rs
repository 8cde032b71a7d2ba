// src/crawl/trap.rs
// =============================================================================
// Crawler trap detection by directory fan-out.
//
// Calendars, paginated archives and faceted search pages can generate an
// endless supply of distinct URLs under one directory:
//   https://wics.ics.uci.edu/events/2022-05-22
//   https://wics.ics.uci.edu/events/2022-05-23
//   ...
// We count how many pages we have analyzed under each directory prefix.
// Once a prefix goes over the threshold its pages are still counted, but
// their links are no longer followed, which cuts the fan-out.
// =============================================================================

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TrapDetector {
    threshold: usize,
    counts: HashMap<String, usize>,
}

impl TrapDetector {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            counts: HashMap::new(),
        }
    }

    /// Counts one more page under `prefix` and reports whether the prefix
    /// is now over the threshold.
    pub fn record_and_check(&mut self, prefix: &str) -> bool {
        let count = match self.counts.get_mut(prefix) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.counts.insert(prefix.to_string(), 1);
                1
            }
        };

        if count == self.threshold + 1 {
            tracing::info!(prefix, threshold = self.threshold, "trap threshold exceeded, suppressing links");
        }

        count > self.threshold
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.counts.get(prefix).copied().unwrap_or(0)
    }

    /// Prefixes currently over the threshold, most visited first.
    pub fn tripped(&self) -> Vec<(&str, usize)> {
        let mut tripped: Vec<(&str, usize)> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > self.threshold)
            .map(|(prefix, count)| (prefix.as_str(), *count))
            .collect();
        tripped.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tripped
    }
}
