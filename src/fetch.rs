// src/fetch.rs
// =============================================================================
// Fetches pages for the driver.
//
// This is deliberately the simplest possible fetcher: one GET per URL, no
// retries, no frontier. It exists so the analysis core can be run against
// real pages from the command line.
//
// Two details matter to the core:
// - Redirects are NOT followed by the HTTP client. The core wants to see a
//   301/302 as such and records the Location header as final_url.
// - Requests run concurrently, but results come back in input order
//   (buffered, not buffer_unordered), so statistics don't depend on which
//   server answered first.
//
// Rust concepts:
// - async/await and Streams: bounded concurrency with futures::stream
// - Client::clone(): cheap, shares the connection pool
// =============================================================================

use anyhow::{Context, Result};
use crawl_sieve::FetchedPage;
use futures::stream::{self, StreamExt};
use reqwest::{header::LOCATION, redirect, Client};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("crawl-sieve/", env!("CARGO_PKG_VERSION"));

// Fetches every URL and returns the pages in the same order as `urls`.
// Transport failures (DNS, timeout, refused) come back as status 0 so the
// processor rejects them like any other bad status.
pub async fn fetch_pages(urls: Vec<String>, concurrency: usize) -> Result<Vec<FetchedPage>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .redirect(redirect::Policy::none())
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")?;

    let requests = urls.into_iter().map(|url| {
        let client = client.clone();
        async move { fetch_page(&client, url).await }
    });

    let pages: Vec<FetchedPage> = stream::iter(requests)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    Ok(pages)
}

async fn fetch_page(client: &Client, url: String) -> FetchedPage {
    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "fetch failed");
            return FetchedPage::new(url, 0, None);
        }
    };

    let status = response.status().as_u16();
    let final_url = if response.status().is_redirection() {
        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|location| resolve_location(&url, location))
    } else {
        Some(response.url().to_string())
    };

    let content = match response.bytes().await {
        Ok(body) => Some(body.to_vec()),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "failed to read response body");
            None
        }
    };

    FetchedPage {
        url,
        status,
        content,
        final_url,
    }
}

// Location headers may be relative to the requested URL
fn resolve_location(requested: &str, location: &str) -> Option<String> {
    let base = Url::parse(requested).ok()?;
    base.join(location).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_location() {
        assert_eq!(
            resolve_location("http://www.ics.uci.edu/old/page", "/new/page"),
            Some("http://www.ics.uci.edu/new/page".to_string())
        );
    }

    #[test]
    fn test_resolve_absolute_location() {
        assert_eq!(
            resolve_location("http://www.ics.uci.edu/", "https://www.ics.uci.edu/"),
            Some("https://www.ics.uci.edu/".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_status_zero() {
        // Port 9 on localhost is not listening; no external network needed
        let pages = fetch_pages(vec!["http://127.0.0.1:9/".to_string()], 1)
            .await
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].status, 0);
        assert!(pages[0].content.is_none());
    }
}
