// src/content/extract.rs
// =============================================================================
// This module extracts the "real" text of a page.
//
// Navigation menus, site headers and footers repeat on every page of a site
// and would swamp the word counts, so we only read content-bearing elements
// (title, paragraphs, headings, lists, tables) and skip any of them that
// sit inside <nav>, <header> or <footer>.
//
// Each matching element contributes its full text, and elements are joined
// with single spaces in document order. Nested matches (an <li> inside a
// <ul>) therefore contribute their text once per matching element.
//
// Rust concepts:
// - Cow<str>: borrowed when the body is valid UTF-8, owned when we had to
//   replace invalid bytes
// - ElementRef derefs to a tree node, which gives us .ancestors()
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;
use std::sync::LazyLock;

// Elements whose text counts as page content
static CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title, p, h1, h2, h3, ul, ol, li, table, tr, td").unwrap()
});

// Content under any of these is boilerplate
const BOILERPLATE_TAGS: &[&str] = &["nav", "header", "footer"];

// Decodes a response body. Pages with broken encodings are still analyzed,
// with invalid sequences replaced by U+FFFD.
pub fn decode_body(body: &[u8]) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(body);
    if let Cow::Owned(_) = text {
        tracing::debug!(bytes = body.len(), "body was not valid UTF-8, decoded lossily");
    }
    text
}

pub fn extract_text(document: &Html) -> String {
    if !document.errors.is_empty() {
        tracing::trace!(errors = document.errors.len(), "HTML parse errors recovered");
    }

    let parts: Vec<String> = document
        .select(&CONTENT_SELECTOR)
        .filter(|element| !has_boilerplate_ancestor(element))
        .map(|element| element.text().collect::<String>())
        .collect();

    parts.join(" ")
}

fn has_boilerplate_ancestor(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(|node| node.value().as_element())
        .any(|parent| BOILERPLATE_TAGS.contains(&parent.name()))
}
