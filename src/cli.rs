// src/cli.rs
// =============================================================================
// Command-line interface for the crawl-sieve driver.
//
// The binary stands in for the crawler's fetcher: it gets pages (over HTTP
// or from disk), feeds them one by one to the page processor, and prints
// what happened plus the final statistics report.
//
// Rust concepts:
// - Derive macros: clap generates the parser from these types
// - global = true: an option that can appear before or after the subcommand
// =============================================================================

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "crawl-sieve",
    version,
    about = "Analyze crawled pages: scope-filter links, drop near-duplicates, collect statistics",
    long_about = "crawl-sieve runs fetched pages through the link-extraction and page-analysis \
                  core of a scoped university crawler and prints the links it would follow \
                  next, along with word, page and subdomain statistics."
)]
pub struct Cli {
    /// JSON file overriding the default crawl configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch pages over HTTP and analyze them in the given order
    ///
    /// Example: crawl-sieve fetch https://www.ics.uci.edu https://www.stat.uci.edu
    Fetch {
        /// Page URLs, processed in the order given
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// How many requests may be in flight at once
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },

    /// Analyze a saved HTML file as if it had been fetched from --url
    ///
    /// Example: crawl-sieve file saved.html --url https://www.ics.uci.edu/about/
    File {
        /// Path to the HTML file
        path: PathBuf,

        /// URL the page was fetched from
        #[arg(long)]
        url: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check URLs against the scope gate without fetching anything
    ///
    /// Exits with 1 if any URL is out of scope or invalid.
    Scope {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },
}
