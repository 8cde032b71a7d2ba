// src/config.rs
// =============================================================================
// Crawl configuration: every tunable constant the core recognizes.
//
// The defaults reproduce the policy of the UCI crawler this core was built
// for (four allowed parent domains, trap cutoff of 15 pages per directory,
// 3-token shingles with a 15% similarity threshold, top 50 words). A JSON
// file can override any subset of fields; missing fields keep their default.
//
// Rust concepts:
// - #[serde(default)]: fill missing fields from the Default impl
// - Result<T, ConfigError>: typed startup errors
// =============================================================================

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Parent domains a host must sit under to be in scope.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    ".ics.uci.edu",
    ".cs.uci.edu",
    ".informatics.uci.edu",
    ".stat.uci.edu",
];

/// Query fragments that mark download/upload actions and calendar exports.
pub const DEFAULT_BLOCKED_QUERY_MARKERS: &[&str] = &["action=download", "action=upload", "ical=1"];

/// Path segments that only ever hold uploaded files.
pub const DEFAULT_BLOCKED_PATH_SEGMENTS: &[&str] = &["/wp-content/uploads"];

/// File extensions that are never HTML pages.
pub const DEFAULT_BLOCKED_EXTENSIONS: &[&str] = &[
    "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid", "mp2", "mp3",
    "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf", "ps", "eps",
    "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data", "dat", "exe", "bz2",
    "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1", "thmx",
    "mso", "arff", "rtf", "jar", "csv", "txt", "ppsx", "war", "r", "bib", "mat", "m", "uai",
    "java", "py", "scm", "rkt", "ss", "sql", "odc", "img", "rm", "smil", "wmv", "swf", "wma",
    "zip", "rar", "gz",
];

/// English stop words excluded from the word-frequency table.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does", "doesn't",
    "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had", "hadn't",
    "has", "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd", "i'll",
    "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "let's", "me",
    "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same",
    "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so", "some", "such",
    "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
    "there's", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd",
    "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with", "won't",
    "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Every constant the page processor and its components read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Hosts must be subdomains of one of these (leading dot optional)
    pub allowed_domains: Vec<String>,
    /// Substrings that disqualify a query string
    pub blocked_query_markers: Vec<String>,
    /// Substrings that disqualify a path
    pub blocked_path_segments: Vec<String>,
    /// Extensions (without the dot) that disqualify a path
    pub blocked_extensions: Vec<String>,
    /// Hosts ending with this suffix are tallied per subdomain
    pub subdomain_suffix: String,
    /// Pages allowed under one directory prefix before links are suppressed
    pub trap_threshold: usize,
    /// Tokens per shingle
    pub shingle_size: usize,
    /// Similarity percentage at or above which a page is a duplicate
    pub similarity_threshold: f64,
    /// Words left out of the frequency table
    pub stop_words: Vec<String>,
    /// Number of words in the report
    pub top_n: usize,
    /// Bodies larger than this many bytes are not parsed
    pub max_content_size: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            allowed_domains: to_strings(DEFAULT_ALLOWED_DOMAINS),
            blocked_query_markers: to_strings(DEFAULT_BLOCKED_QUERY_MARKERS),
            blocked_path_segments: to_strings(DEFAULT_BLOCKED_PATH_SEGMENTS),
            blocked_extensions: to_strings(DEFAULT_BLOCKED_EXTENSIONS),
            subdomain_suffix: ".ics.uci.edu".to_string(),
            trap_threshold: 15,
            shingle_size: 3,
            similarity_threshold: 15.0,
            stop_words: to_strings(DEFAULT_STOP_WORDS),
            top_n: 50,
            max_content_size: 10 * 1024 * 1024,
        }
    }
}

impl CrawlConfig {
    /// Reads a JSON config file and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CrawlConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every page out of scope or make
    /// the duplicate gate meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_domains.iter().all(|d| d.trim().is_empty()) {
            return Err(ConfigError::EmptyScope);
        }
        if self.shingle_size == 0 {
            return Err(ConfigError::ZeroShingleSize);
        }
        if self.max_content_size == 0 {
            return Err(ConfigError::ZeroContentSize);
        }
        if !(0.0..=100.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::SimilarityThreshold(self.similarity_threshold));
        }
        Ok(())
    }

    /// Stop words as a lookup set, in the same form the tokenizer yields
    /// (lowercase, ASCII apostrophes).
    pub fn stop_word_set(&self) -> HashSet<String> {
        self.stop_words
            .iter()
            .map(|w| w.to_lowercase().replace('’', "'"))
            .collect()
    }
}
