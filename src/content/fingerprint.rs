// src/content/fingerprint.rs
// =============================================================================
// Near-duplicate detection with hashed shingles.
//
// How it works:
// 1. Slide a window of n tokens over the page (n = 3 by default); each
//    window is a "shingle"
// 2. Hash every shingle with xxh3, a fixed 64-bit hash, so the same
//    shingle hashes the same way in every run and on every machine
// 3. Keep only hashes divisible by 4. This samples about a quarter of the
//    shingles, and two pages sharing a shingle always both keep or both
//    drop it
// 4. Compare two pages by the Jaccard overlap of their kept hashes,
//    as a percentage
//
// Two pages with no kept hashes at all are "not similar" (0%), never a
// division by zero.
// =============================================================================

use super::tokenize::tokenize;
use std::collections::HashSet;
use xxhash_rust::xxh3::xxh3_64;

/// Only hashes `h` with `h % SAMPLE_MODULUS == 0` are kept.
pub const SAMPLE_MODULUS: u64 = 4;

// Separates tokens inside a hashed shingle so ("ab", "c") != ("a", "bc")
const TOKEN_SEPARATOR: u8 = 0x1f;

/// Sampled shingle hashes of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint {
    hashes: HashSet<u64>,
}

impl Fingerprint {
    /// Fingerprint of an already tokenized page. Fewer than `n` tokens
    /// (or `n == 0`) gives an empty fingerprint.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], n: usize) -> Self {
        if n == 0 || tokens.len() < n {
            return Self::default();
        }

        let hashes = tokens
            .windows(n)
            .map(shingle_hash)
            .filter(|hash| hash % SAMPLE_MODULUS == 0)
            .collect();

        Self { hashes }
    }

    pub fn from_text(text: &str, n: usize) -> Self {
        let tokens: Vec<String> = tokenize(text).collect();
        Self::from_tokens(&tokens, n)
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Jaccard overlap of the two hash sets, in `[0, 100]`.
    pub fn similarity(&self, other: &Fingerprint) -> f64 {
        let shared = self.hashes.intersection(&other.hashes).count();
        let union = self.hashes.len() + other.hashes.len() - shared;
        if union == 0 {
            return 0.0;
        }
        shared as f64 / union as f64 * 100.0
    }

    /// Two empty fingerprints are never duplicates, whatever the threshold.
    pub fn is_duplicate(&self, other: &Fingerprint, threshold: f64) -> bool {
        if self.is_empty() && other.is_empty() {
            return false;
        }
        self.similarity(other) >= threshold
    }
}

fn shingle_hash<S: AsRef<str>>(shingle: &[S]) -> u64 {
    let mut buf = Vec::with_capacity(shingle.iter().map(|t| t.as_ref().len() + 1).sum());
    for (i, token) in shingle.iter().enumerate() {
        if i > 0 {
            buf.push(TOKEN_SEPARATOR);
        }
        buf.extend_from_slice(token.as_ref().as_bytes());
    }
    xxh3_64(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Distinct words; with 40+ of them a 1-in-4 sample is never empty in practice
    fn long_text(prefix: &str, count: usize) -> String {
        (0..count)
            .map(|i| format!("{}{}", prefix, i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_only_sampled_hashes_kept() {
        let fp = Fingerprint::from_text(&long_text("word", 60), 3);
        assert!(!fp.is_empty());
        assert!(fp.hashes.iter().all(|h| h % SAMPLE_MODULUS == 0));
        assert!(fp.hashes.len() <= 58);
    }

    #[test]
    fn test_deterministic() {
        let text = long_text("token", 40);
        assert_eq!(Fingerprint::from_text(&text, 3), Fingerprint::from_text(&text, 3));
    }

    #[test]
    fn test_reflexive() {
        let fp = Fingerprint::from_text(&long_text("page", 60), 3);
        assert_eq!(fp.similarity(&fp), 100.0);
        assert!(fp.is_duplicate(&fp, 15.0));
    }

    #[test]
    fn test_symmetric() {
        let a = Fingerprint::from_text(&long_text("shared", 50), 3);
        let mut text_b = long_text("shared", 30);
        text_b.push(' ');
        text_b.push_str(&long_text("other", 30));
        let b = Fingerprint::from_text(&text_b, 3);
        assert_eq!(a.similarity(&b), b.similarity(&a));
    }

    #[test]
    fn test_disjoint_pages() {
        let a = Fingerprint::from_text(&long_text("alpha", 60), 3);
        let b = Fingerprint::from_text(&long_text("beta", 60), 3);
        assert_eq!(a.similarity(&b), 0.0);
        assert!(!a.is_duplicate(&b, 15.0));
    }

    #[test]
    fn test_near_duplicates() {
        let original = long_text("w", 100);
        let mut edited: Vec<String> = original.split(' ').map(String::from).collect();
        for word in edited.iter_mut().skip(95) {
            word.push('x');
        }
        let a = Fingerprint::from_text(&original, 3);
        let b = Fingerprint::from_text(&edited.join(" "), 3);
        assert!(a.similarity(&b) >= 50.0);
        assert!(a.is_duplicate(&b, 15.0));
    }

    #[test]
    fn test_both_empty_is_not_similar() {
        let a = Fingerprint::from_text("too short", 3);
        let b = Fingerprint::from_text("", 3);
        assert!(a.is_empty());
        assert!(b.is_empty());
        assert_eq!(a.similarity(&b), 0.0);
        assert!(!a.is_duplicate(&b, 0.0));
    }

    #[test]
    fn test_zero_shingle_size() {
        let tokens = vec!["a", "b", "c"];
        assert!(Fingerprint::from_tokens(&tokens, 0).is_empty());
    }

    #[test]
    fn test_separator_distinguishes_shingles() {
        assert_ne!(shingle_hash(&["ab", "c"]), shingle_hash(&["a", "bc"]));
    }
}
