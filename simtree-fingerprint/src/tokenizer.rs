//! Keyword tokenizer for commit messages.

use crate::MAX_KEYWORDS;

/// Characters that separate keyword tokens.
const DELIMITERS: &[char] = &[
    ' ', '\t', '\n', '\r', '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}',
];

/// Splits commit messages into keyword tokens.
///
/// Tokens keep their original case. Only tokens strictly longer than
/// `min_length` characters are kept, and the output is capped at
/// `max_keywords` entries in message order.
#[derive(Debug, Clone)]
pub struct KeywordTokenizer {
    min_length: usize,
    max_keywords: usize,
}

impl Default for KeywordTokenizer {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_keywords: MAX_KEYWORDS,
        }
    }
}

impl KeywordTokenizer {
    /// Set the maximum number of keywords returned (default: 20).
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    /// Tokens must be longer than this many characters (default: 3).
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Extract keyword tokens from `text`.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(DELIMITERS)
            .filter(|token| token.chars().count() > self.min_length)
            .take(self.max_keywords)
            .map(str::to_string)
            .collect()
    }

    /// Get the maximum number of keywords.
    pub fn max_keywords(&self) -> usize {
        self.max_keywords
    }
}
