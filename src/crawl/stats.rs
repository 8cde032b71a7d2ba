// src/crawl/stats.rs
// =============================================================================
// Crawl-lifetime statistics.
//
// Tracks, across every page the processor accepts:
// - the set of unique outbound URLs (fragment already stripped)
// - the text of each analyzed page, and the latest page per directory
// - the longest page by word count
// - word frequencies, without stop words
// - pages per subdomain of the designated parent domain
//
// Nothing here does I/O. snapshot() produces a ReportData value that the
// caller can print or serialize however it likes.
//
// Rust concepts:
// - BTreeMap: keeps subdomains sorted by host for free
// - sort_by with then_with: ordering by count, then by first appearance
// =============================================================================

use crate::links::NormalizedUrl;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use url::Url;

/// The extracted text of an analyzed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongestPage {
    pub url: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdomainCount {
    pub host: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy)]
struct WordEntry {
    count: u64,
    // Order in which the word was first counted, for tie-breaking
    first_seen: usize,
}

#[derive(Debug, Default)]
pub struct StatsAggregator {
    subdomain_suffix: String,
    unique_pages: HashSet<String>,
    pages: HashMap<String, PageRecord>,
    // prefix -> url of the latest page recorded under it
    last_by_prefix: HashMap<String, String>,
    longest: Option<LongestPage>,
    words: HashMap<String, WordEntry>,
    subdomains: BTreeMap<String, u64>,
}

impl StatsAggregator {
    pub fn new(subdomain_suffix: impl Into<String>) -> Self {
        Self {
            subdomain_suffix: subdomain_suffix.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Replaces the longest page only on a strictly greater word count, so
    /// the first of several equally long pages is kept.
    pub fn record_page(&mut self, url: &str, token_count: usize) {
        let current = self.longest.as_ref().map_or(0, |page| page.word_count);
        if token_count > current {
            self.longest = Some(LongestPage {
                url: url.to_string(),
                word_count: token_count,
            });
        }
    }

    /// Stores the page's text and makes it the latest page of `prefix`.
    /// Returns true when this URL had not been stored before.
    pub fn remember_page(&mut self, prefix: &str, record: PageRecord) -> bool {
        let url = record.url.clone();
        let is_new = self.pages.insert(url.clone(), record).is_none();
        self.last_by_prefix.insert(prefix.to_string(), url);
        is_new
    }

    pub fn record_words<S: AsRef<str>>(&mut self, tokens: &[S], stop_words: &HashSet<String>) {
        for token in tokens {
            let word = token.as_ref().to_lowercase();
            if stop_words.contains(&word) {
                continue;
            }
            let next_order = self.words.len();
            self.words
                .entry(word)
                .or_insert(WordEntry {
                    count: 0,
                    first_seen: next_order,
                })
                .count += 1;
        }
    }

    pub fn record_subdomain(&mut self, url: &Url) {
        let Some(host) = url.host_str() else {
            return;
        };
        let host = host.to_ascii_lowercase();
        if !self.subdomain_suffix.is_empty() && host.ends_with(&self.subdomain_suffix) {
            *self.subdomains.entry(host).or_insert(0) += 1;
        }
    }

    /// Adds an outbound link to the unique-page set. Returns true if new.
    pub fn record_link(&mut self, url: &NormalizedUrl) -> bool {
        self.unique_pages.insert(url.as_str().to_string())
    }

    pub fn last_page_for_prefix(&self, prefix: &str) -> Option<&PageRecord> {
        self.last_by_prefix
            .get(prefix)
            .and_then(|url| self.pages.get(url))
    }

    pub fn page(&self, url: &str) -> Option<&PageRecord> {
        self.pages.get(url)
    }

    pub fn unique_page_count(&self) -> usize {
        self.unique_pages.len()
    }

    pub fn processed_page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn longest_page(&self) -> Option<&LongestPage> {
        self.longest.as_ref()
    }

    pub fn word_count(&self, word: &str) -> u64 {
        self.words.get(word).map_or(0, |entry| entry.count)
    }

    /// Most frequent words, highest count first; equal counts keep the
    /// order in which the words were first seen.
    pub fn top_n_words(&self, n: usize) -> Vec<WordCount> {
        let mut entries: Vec<(&String, &WordEntry)> = self.words.iter().collect();
        entries.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then_with(|| a.1.first_seen.cmp(&b.1.first_seen))
        });
        entries
            .into_iter()
            .take(n)
            .map(|(word, entry)| WordCount {
                word: word.clone(),
                count: entry.count,
            })
            .collect()
    }

    pub fn subdomains_sorted(&self) -> Vec<SubdomainCount> {
        self.subdomains
            .iter()
            .map(|(host, &count)| SubdomainCount {
                host: host.clone(),
                count,
            })
            .collect()
    }

    pub fn snapshot(&self, top_n: usize) -> ReportData {
        ReportData {
            unique_pages: self.unique_page_count(),
            processed_pages: self.processed_page_count(),
            longest_page: self.longest.clone(),
            top_words: self.top_n_words(top_n),
            subdomains: self.subdomains_sorted(),
        }
    }
}

/// Point-in-time copy of the aggregate statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportData {
    pub unique_pages: usize,
    pub processed_pages: usize,
    pub longest_page: Option<LongestPage>,
    pub top_words: Vec<WordCount>,
    pub subdomains: Vec<SubdomainCount>,
}

// One `label: value` record per line
impl fmt::Display for ReportData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "unique pages: {}", self.unique_pages)?;
        writeln!(f, "processed pages: {}", self.processed_pages)?;
        match &self.longest_page {
            Some(page) => {
                writeln!(f, "longest page: {}", page.url)?;
                writeln!(f, "longest page word count: {}", page.word_count)?;
            }
            None => {
                writeln!(f, "longest page: -")?;
                writeln!(f, "longest page word count: 0")?;
            }
        }
        for entry in &self.top_words {
            writeln!(f, "{}: {}", entry.word, entry.count)?;
        }
        for entry in &self.subdomains {
            writeln!(f, "{}: {}", entry.host, entry.count)?;
        }
        Ok(())
    }
}
