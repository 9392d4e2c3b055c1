//! Sentence segmentation and numeric token counting
//!
//! The density engine only needs two things from the raw transcript: an
//! ordered list of sentences and, per sentence, how many word tokens it has
//! and how many of those are numeric. Both are seams (`SentenceSegmenter`,
//! `NumericTokenExtractor`) so callers can plug in a real NLP pipeline; the
//! regex implementations here are the defaults used by the CLI.

mod regex_impl;

pub use regex_impl::{RegexNumericExtractor, RegexSegmenter};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Splits raw text into ordered sentences
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Counts numeric and word tokens in a single sentence
pub trait NumericTokenExtractor: Send + Sync {
    fn count(&self, sentence: &str) -> TokenCounts;
}

/// Token counts reported by an extractor
///
/// Signed on purpose: upstream extractors are not trusted, and a negative
/// count is coerced to zero by the classifier rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    pub numeric_tokens: i64,
    pub word_tokens: i64,
}

/// One sentence together with its token counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceTokens {
    pub text: String,
    pub numeric_tokens: i64,
    pub word_tokens: i64,
}

impl SentenceTokens {
    pub fn new(text: impl Into<String>, numeric_tokens: i64, word_tokens: i64) -> Self {
        Self {
            text: text.into(),
            numeric_tokens,
            word_tokens,
        }
    }

    pub fn from_counts(text: impl Into<String>, counts: TokenCounts) -> Self {
        Self::new(text, counts.numeric_tokens, counts.word_tokens)
    }
}

/// Segmenter and extractor bundled together
#[derive(Clone)]
pub struct Tokenizer {
    segmenter: Arc<dyn SentenceSegmenter>,
    extractor: Arc<dyn NumericTokenExtractor>,
}

impl Tokenizer {
    pub fn new(
        segmenter: Arc<dyn SentenceSegmenter>,
        extractor: Arc<dyn NumericTokenExtractor>,
    ) -> Self {
        Self {
            segmenter,
            extractor,
        }
    }

    /// Tokenizer backed by the built-in regex segmenter and extractor
    pub fn regex() -> Result<Self> {
        Ok(Self::new(
            Arc::new(RegexSegmenter::new()?),
            Arc::new(RegexNumericExtractor::new()?),
        ))
    }

    /// Segment `text` and count tokens in every resulting sentence
    pub fn measure(&self, text: &str) -> Vec<SentenceTokens> {
        self.segmenter
            .segment(text)
            .into_iter()
            .map(|sentence| {
                let counts = self.extractor.count(&sentence);
                SentenceTokens::from_counts(sentence, counts)
            })
            .collect()
    }

    /// Count tokens in a sentence that was already segmented upstream
    pub fn measure_sentence(&self, sentence: &str) -> SentenceTokens {
        SentenceTokens::from_counts(sentence, self.extractor.count(sentence))
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer").finish_non_exhaustive()
    }
}
