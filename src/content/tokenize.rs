// src/content/tokenize.rs
// =============================================================================
// Splits page text into lowercase word tokens.
//
// A token is, in priority order:
// - an abbreviation: two word-runs joined by one period   ("u.s", "3.14")
// - a contraction: two word-runs joined by one apostrophe ("don't")
// - a plain run of letters, digits and underscores        ("crawler")
//
// Sentence-ending periods are not part of any token ("end." -> "end").
// Typographic apostrophes are folded to ASCII, so "it’s" and "it's" are the
// same word.
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern, checked by the tests below
    Regex::new(r"\w+\.\w+|\w+['’]\w+|\w+").unwrap()
});

/// Lazy token stream over an owned, lowercased copy of the input.
///
/// Cloning a `Tokens` gives an independent iterator from the same position,
/// so a stream can be restarted or consumed twice without re-tokenizing.
#[derive(Debug, Clone)]
pub struct Tokens {
    text: String,
    pos: usize,
}

impl Iterator for Tokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let found = TOKEN_RE.find_at(&self.text, self.pos)?;
        self.pos = found.end();
        Some(found.as_str().to_string())
    }
}

pub fn tokenize(text: &str) -> Tokens {
    Tokens {
        text: text.to_lowercase().replace('’', "'"),
        pos: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text).collect()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(tokens("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_abbreviation_and_contraction() {
        assert_eq!(
            tokens("The U.S. team don't stop."),
            vec!["the", "u.s", "team", "don't", "stop"]
        );
    }

    #[test]
    fn test_curly_apostrophe_folds_to_ascii() {
        assert_eq!(tokens("It’s fine"), vec!["it's", "fine"]);
        assert_eq!(tokens("don’t"), tokens("don't"));
    }

    #[test]
    fn test_numbers_and_underscores() {
        assert_eq!(tokens("pi is 3.14 in cs_161"), vec!["pi", "is", "3.14", "in", "cs_161"]);
    }

    #[test]
    fn test_case_insensitive() {
        let lower = "informatics and computer science";
        assert_eq!(tokens(lower), tokens(&lower.to_uppercase()));
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert!(tokens("").is_empty());
        assert!(tokens(" -- !! ... ").is_empty());
    }

    #[test]
    fn test_restartable() {
        let stream = tokenize("one two three");
        let first: Vec<_> = stream.clone().collect();
        let second: Vec<_> = stream.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
