// src/main.rs
// =============================================================================
// Entry point of the crawl-sieve driver.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr) and load the crawl configuration
// 3. Dispatch to the subcommand handler
// 4. Print per-page results and the statistics report (stdout)
// 5. Exit with proper code (0 = success, 1 = out-of-scope URLs, 2 = error)
// =============================================================================

mod cli;
mod fetch;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use crawl_sieve::links::ScopePolicy;
use crawl_sieve::{CrawlConfig, FetchedPage, PageProcessor, PageResult};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => CrawlConfig::load(path)
            .with_context(|| format!("invalid configuration in {}", path.display()))?,
        None => CrawlConfig::default(),
    };
    config.validate().context("invalid default configuration")?;

    match cli.command {
        Commands::Fetch { urls, json, concurrency } => {
            handle_fetch(config, urls, json, concurrency).await
        }
        Commands::File { path, url, json } => handle_file(config, &path, &url, json),
        Commands::Scope { urls } => Ok(handle_scope(&config, &urls)),
    }
}

// Logs go to stderr so --json output on stdout stays machine-readable
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {}", e);
    }
}

async fn handle_fetch(
    config: CrawlConfig,
    urls: Vec<String>,
    json: bool,
    concurrency: usize,
) -> Result<i32> {
    tracing::info!(pages = urls.len(), concurrency, "fetching pages");

    let pages = fetch::fetch_pages(urls, concurrency).await?;
    let mut processor = PageProcessor::new(config);
    let results = process_all(&mut processor, &pages);

    print_results(&processor, &results, json)?;
    Ok(0)
}

fn handle_file(config: CrawlConfig, path: &Path, url: &str, json: bool) -> Result<i32> {
    let html = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let page = FetchedPage::new(url, 200, Some(html));

    let mut processor = PageProcessor::new(config);
    // A bad --url is a usage error, so it is fatal here
    let result = processor.process(&page)?;

    print_results(&processor, &[result], json)?;
    Ok(0)
}

fn handle_scope(config: &CrawlConfig, urls: &[String]) -> i32 {
    let scope = ScopePolicy::new(config);
    let mut all_in_scope = true;

    for url in urls {
        let verdict = match scope.check_str(url) {
            Ok(true) => "in scope",
            Ok(false) => {
                all_in_scope = false;
                "out of scope"
            }
            Err(e) => {
                all_in_scope = false;
                tracing::debug!(error = %e, "unparseable URL");
                "invalid"
            }
        };
        println!("{:<13} {}", verdict, url);
    }

    if all_in_scope {
        0
    } else {
        1
    }
}

// Runs pages through the processor in order. An unparseable page URL is
// reported and skipped; it never stops the rest of the batch.
fn process_all(processor: &mut PageProcessor, pages: &[FetchedPage]) -> Vec<PageResult> {
    let mut results = Vec::with_capacity(pages.len());
    for page in pages {
        match processor.process(page) {
            Ok(result) => results.push(result),
            Err(e) => tracing::error!(error = %e, "skipping page"),
        }
    }
    results
}

fn print_results(processor: &PageProcessor, results: &[PageResult], json: bool) -> Result<()> {
    let report = processor.report();
    let tripped = processor.traps().tripped();

    if json {
        let traps: Vec<_> = tripped
            .iter()
            .map(|(prefix, count)| serde_json::json!({ "prefix": prefix, "count": count }))
            .collect();
        let output = serde_json::json!({
            "pages": results,
            "report": report,
            "traps": traps,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_table(results);
        println!("{}", report);
        print_traps(&tripped);
    }
    Ok(())
}

// Directories whose links stopped being followed
fn print_traps(tripped: &[(&str, usize)]) {
    if tripped.is_empty() {
        return;
    }
    println!();
    println!("Trapped directories (links no longer followed):");
    for (prefix, count) in tripped {
        println!("  {}: {}", prefix, count);
    }
}

fn print_table(results: &[PageResult]) {
    println!("{:<60} {:<12} {:>6}", "URL", "OUTCOME", "LINKS");
    println!("{}", "=".repeat(80));

    for result in results {
        let url_display = if result.url.chars().count() > 57 {
            format!("{}...", result.url.chars().take(57).collect::<String>())
        } else {
            result.url.clone()
        };
        println!(
            "{:<60} {:<12} {:>6}",
            url_display,
            result.outcome.label(),
            result.links.len()
        );
        for link in &result.links {
            println!("    -> {}", link);
        }
    }

    println!();
}
