// Regex-backed default collaborators
use regex::Regex;

use crate::error::{DensityError, Result};
use crate::tokenize::{NumericTokenExtractor, SentenceSegmenter, TokenCounts};

/// Terminal punctuation (plus closing quotes/brackets) followed by whitespace.
/// A period inside `1.5` is never followed by whitespace, so decimals survive.
const SENTENCE_BOUNDARY: &str = r#"[.!?]+["')\]]*\s+"#;

const SCALE: &str = r"(?:\s*(?:million|billion|trillion|[mbt])\b)?";

fn numeric_pattern() -> String {
    let currency = format!(r"\$\s*\d[\d,]*(?:\.\d+)?{SCALE}");
    let percentage = r"\d[\d,]*(?:\.\d+)?\s*%".to_string();
    let grouped = r"\d{1,3}(?:,\d{3})+(?:\.\d+)?(?:\s*(?:million|billion|trillion)\b)?".to_string();
    let plain = format!(r"\d+(?:\.\d+)?{SCALE}");
    format!("(?i){currency}|{percentage}|{grouped}|{plain}")
}

/// Splits on sentence-ending punctuation
pub struct RegexSegmenter {
    boundary: Regex,
}

impl RegexSegmenter {
    pub fn new() -> Result<Self> {
        let boundary = Regex::new(SENTENCE_BOUNDARY).map_err(|e| {
            DensityError::Config(format!("Invalid sentence boundary pattern: {}", e))
        })?;
        Ok(Self { boundary })
    }
}

impl SentenceSegmenter for RegexSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for m in self.boundary.find_iter(text) {
            let sentence = text[start..m.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = m.end();
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }

        sentences
    }
}

/// Recognizes currency, percentages, grouped and plain numbers
///
/// Bare four-digit tokens are read as years and are not counted.
pub struct RegexNumericExtractor {
    numeric: Regex,
    year: Regex,
}

impl RegexNumericExtractor {
    pub fn new() -> Result<Self> {
        let numeric = Regex::new(&numeric_pattern())
            .map_err(|e| DensityError::Config(format!("Invalid numeric token pattern: {}", e)))?;
        let year = Regex::new(r"^\d{4}$")
            .map_err(|e| DensityError::Config(format!("Invalid year pattern: {}", e)))?;
        Ok(Self { numeric, year })
    }

    /// Numeric surface forms found in `sentence`, in order
    pub fn extract<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        self.numeric
            .find_iter(sentence)
            .map(|m| m.as_str())
            .filter(|token| !self.year.is_match(token.trim()))
            .collect()
    }
}

impl NumericTokenExtractor for RegexNumericExtractor {
    fn count(&self, sentence: &str) -> TokenCounts {
        let word_tokens = sentence
            .split_whitespace()
            .filter(|word| word.chars().any(char::is_alphanumeric))
            .count();

        TokenCounts {
            numeric_tokens: self.extract(sentence).len() as i64,
            word_tokens: word_tokens as i64,
        }
    }
}
