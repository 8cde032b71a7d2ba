// src/error.rs
// =============================================================================
// Typed errors for the analysis core.
//
// The core only has one hard failure: a page URL that does not parse.
// Everything else that can go wrong on a page (an oversized body, a panic
// deep inside the HTML parser) is an ExtractError, which the page processor
// catches, logs and turns into "no links for this page". Configuration
// problems are reported once at startup as ConfigError.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// A URL (page URL or href) that could not be parsed or resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid URL '{url}': {reason}")]
pub struct InvalidUrlError {
    pub url: String,
    pub reason: String,
}

impl InvalidUrlError {
    pub fn new(url: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failures while pulling text or links out of a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("content too large: {size} bytes (max {limit} bytes)")]
    ContentTooLarge { size: usize, limit: usize },

    #[error("extractor panicked: {0}")]
    Panicked(String),
}

/// Problems with the crawl configuration, detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("allowed_domains must not be empty")]
    EmptyScope,

    #[error("shingle_size must be at least 1")]
    ZeroShingleSize,

    #[error("max_content_size must be at least 1")]
    ZeroContentSize,

    #[error("similarity_threshold must be within 0..=100, got {0}")]
    SimilarityThreshold(f64),
}
