// src/content/mod.rs
// =============================================================================
// Page text: what a page says, as opposed to where it links.
//
// Submodules:
// - extract: visible content text from a parsed document
// - tokenize: lowercase word tokens from that text
// - fingerprint: shingle hashes for near-duplicate detection
// =============================================================================

mod extract;
mod fingerprint;
mod tokenize;

pub use extract::{decode_body, extract_text};
pub use fingerprint::{Fingerprint, SAMPLE_MODULUS};
pub use tokenize::{tokenize, Tokens};
