//! Text normalizer: lowercase, letters only, stopwords and short tokens removed.

use std::collections::HashSet;

use crate::matching::stopwords::ENGLISH_STOPWORDS;

/// Tokens with fewer characters than this are dropped (keeps length > 3).
pub const DEFAULT_MIN_TOKEN_LEN: usize = 4;

/// Pure, deterministic text normalizer.
///
/// Holds its stopword set by value so it can be built once at startup and shared
/// read-only across requests.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
    min_token_len: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english(DEFAULT_MIN_TOKEN_LEN)
    }
}

impl Normalizer {
    pub fn new<I, S>(stopwords: I, min_token_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            min_token_len,
        }
    }

    pub fn english(min_token_len: usize) -> Self {
        Self::new(ENGLISH_STOPWORDS.iter().copied(), min_token_len)
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    /// Normalized tokens in document order.
    ///
    /// Non-letters are deleted rather than replaced, so "node.js" becomes "nodejs"
    /// and "python3" becomes "python".
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphabetic() || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| token.chars().count() >= self.min_token_len)
            .filter(|token| !self.stopwords.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Tokens rejoined by single spaces. Empty input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}
