//! Sentence density classification
//!
//! Turns an ordered list of measured sentences into per-sentence numeric
//! density (percent of word tokens that are numeric), assigns each sentence a
//! density tier, and aggregates corpus statistics over the whole sequence.

pub mod stats;

use serde::{Deserialize, Serialize};

use crate::config::DensityConfig;
use crate::tokenize::SentenceTokens;

/// Density tier of a single sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityTier {
    Dense,
    Moderate,
    Sparse,
    Narrative,
}

impl DensityTier {
    /// Tier for a density percentage under the given thresholds
    pub fn classify(density: f64, thresholds: &DensityConfig) -> Self {
        if density >= thresholds.dense_threshold {
            DensityTier::Dense
        } else if density >= thresholds.moderate_threshold {
            DensityTier::Moderate
        } else if density >= thresholds.sparse_threshold {
            DensityTier::Sparse
        } else {
            DensityTier::Narrative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DensityTier::Dense => "dense",
            DensityTier::Moderate => "moderate",
            DensityTier::Sparse => "sparse",
            DensityTier::Narrative => "narrative",
        }
    }
}

/// Sentence paired with its density, for inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSentence {
    pub sentence: String,
    pub density: f64,
}

/// Sentence-level numeric density metrics for one document
///
/// Tier counts always sum to `total_sentences`. An empty document yields
/// `SentenceDensityMetrics::default()`, where every field is zero or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceDensityMetrics {
    pub total_sentences: usize,
    pub numeric_dense_sentences: usize,
    pub numeric_moderate_sentences: usize,
    pub numeric_sparse_sentences: usize,
    pub narrative_sentences: usize,

    pub mean_numeric_density: f64,
    pub median_numeric_density: f64,
    /// Population standard deviation
    pub std_numeric_density: f64,
    pub max_numeric_density: f64,
    pub min_numeric_density: f64,
    pub p25_density: f64,
    pub p75_density: f64,

    pub proportion_numeric_dense: f64,
    pub proportion_narrative: f64,

    /// Highest-density sentences, descending, ties in document order
    pub top_dense_sentences: Vec<DenseSentence>,
    /// Density of every sentence in document order
    pub density_by_position: Vec<f64>,
}

impl SentenceDensityMetrics {
    /// Sentences carrying any numeric content (dense + moderate + sparse)
    pub fn numeric_sentences(&self) -> usize {
        self.numeric_dense_sentences
            + self.numeric_moderate_sentences
            + self.numeric_sparse_sentences
    }
}

/// Density of one sentence as a percentage in [0, 100]
///
/// Negative counts from a misbehaving extractor are treated as zero, and a
/// sentence without words has density 0.0.
pub fn sentence_density(numeric_tokens: i64, word_tokens: i64) -> f64 {
    if numeric_tokens < 0 || word_tokens < 0 {
        tracing::warn!(
            numeric_tokens,
            word_tokens,
            "negative token count coerced to zero"
        );
    }

    let numeric = numeric_tokens.max(0) as f64;
    let words = word_tokens.max(0) as f64;
    if words == 0.0 {
        return 0.0;
    }

    (numeric * 100.0 / words).min(100.0)
}

/// Classifies sentences into density tiers and aggregates statistics
pub struct DensityClassifier {
    thresholds: DensityConfig,
}

impl DensityClassifier {
    pub fn new(thresholds: DensityConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DensityConfig {
        &self.thresholds
    }

    /// Classify every sentence and build the document's density metrics
    pub fn classify(&self, sentences: &[SentenceTokens]) -> SentenceDensityMetrics {
        if sentences.is_empty() {
            return SentenceDensityMetrics::default();
        }

        let densities: Vec<f64> = sentences
            .iter()
            .map(|s| sentence_density(s.numeric_tokens, s.word_tokens))
            .collect();

        let (mut dense, mut moderate, mut sparse, mut narrative) = (0, 0, 0, 0);
        for &density in &densities {
            match DensityTier::classify(density, &self.thresholds) {
                DensityTier::Dense => dense += 1,
                DensityTier::Moderate => moderate += 1,
                DensityTier::Sparse => sparse += 1,
                DensityTier::Narrative => narrative += 1,
            }
        }

        let sorted = stats::sorted(&densities);
        let total = sentences.len();

        tracing::debug!(
            total,
            dense,
            moderate,
            sparse,
            narrative,
            "classified sentence densities"
        );

        SentenceDensityMetrics {
            total_sentences: total,
            numeric_dense_sentences: dense,
            numeric_moderate_sentences: moderate,
            numeric_sparse_sentences: sparse,
            narrative_sentences: narrative,
            mean_numeric_density: stats::mean(&densities),
            median_numeric_density: stats::percentile(&sorted, 50.0),
            std_numeric_density: stats::population_std(&densities),
            max_numeric_density: sorted[total - 1],
            min_numeric_density: sorted[0],
            p25_density: stats::percentile(&sorted, 25.0),
            p75_density: stats::percentile(&sorted, 75.0),
            proportion_numeric_dense: dense as f64 / total as f64,
            proportion_narrative: narrative as f64 / total as f64,
            top_dense_sentences: self.top_dense(sentences, &densities),
            density_by_position: densities,
        }
    }

    fn top_dense(&self, sentences: &[SentenceTokens], densities: &[f64]) -> Vec<DenseSentence> {
        let mut ranked: Vec<(usize, f64)> = densities.iter().copied().enumerate().collect();
        // Stable sort keeps document order among equal densities
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
            .into_iter()
            .take(self.thresholds.top_sentences)
            .map(|(idx, density)| DenseSentence {
                sentence: sentences[idx].text.clone(),
                density,
            })
            .collect()
    }
}

impl Default for DensityClassifier {
    fn default() -> Self {
        Self::new(DensityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earnings_sentences() -> Vec<SentenceTokens> {
        vec![
            SentenceTokens::new("Revenue was $1.5 billion.", 2, 5),
            SentenceTokens::new("We are happy with our team.", 0, 6),
            SentenceTokens::new("EPS was $2.50, up from $2.10.", 2, 6),
            SentenceTokens::new("Our culture remains strong.", 0, 4),
        ]
    }

    #[test]
    fn test_sentence_density_basic() {
        assert_eq!(sentence_density(2, 5), 40.0);
        assert_eq!(sentence_density(0, 6), 0.0);
    }

    #[test]
    fn test_sentence_density_zero_words() {
        assert_eq!(sentence_density(3, 0), 0.0);
        assert_eq!(sentence_density(0, 0), 0.0);
    }

    #[test]
    fn test_sentence_density_negative_counts() {
        assert_eq!(sentence_density(-4, 10), 0.0);
        assert_eq!(sentence_density(2, -1), 0.0);
    }

    #[test]
    fn test_sentence_density_capped() {
        assert_eq!(sentence_density(9, 3), 100.0);
    }

    #[test]
    fn test_tier_boundaries() {
        let t = DensityConfig::default();
        assert_eq!(DensityTier::classify(10.0, &t), DensityTier::Dense);
        assert_eq!(DensityTier::classify(9.99, &t), DensityTier::Moderate);
        assert_eq!(DensityTier::classify(5.0, &t), DensityTier::Moderate);
        assert_eq!(DensityTier::classify(4.99, &t), DensityTier::Sparse);
        assert_eq!(DensityTier::classify(1.0, &t), DensityTier::Sparse);
        assert_eq!(DensityTier::classify(0.99, &t), DensityTier::Narrative);
        assert_eq!(DensityTier::classify(0.0, &t), DensityTier::Narrative);
    }

    #[test]
    fn test_classify_earnings_scenario() {
        let metrics = DensityClassifier::default().classify(&earnings_sentences());

        assert_eq!(metrics.total_sentences, 4);
        assert_eq!(metrics.numeric_dense_sentences, 2);
        assert_eq!(metrics.narrative_sentences, 2);
        assert_eq!(metrics.numeric_moderate_sentences, 0);
        assert_eq!(metrics.numeric_sparse_sentences, 0);

        assert_eq!(metrics.density_by_position[0], 40.0);
        assert_eq!(metrics.density_by_position[1], 0.0);
        assert!((metrics.density_by_position[2] - 33.333).abs() < 0.01);
        assert!((metrics.mean_numeric_density - 18.333).abs() < 0.01);
        assert_eq!(metrics.max_numeric_density, 40.0);
        assert_eq!(metrics.min_numeric_density, 0.0);
        assert!((metrics.median_numeric_density - 16.667).abs() < 0.01);
        assert_eq!(metrics.proportion_numeric_dense, 0.5);
        assert_eq!(metrics.proportion_narrative, 0.5);
    }

    #[test]
    fn test_top_dense_ordering() {
        let metrics = DensityClassifier::default().classify(&earnings_sentences());
        let top: Vec<&str> = metrics
            .top_dense_sentences
            .iter()
            .map(|s| s.sentence.as_str())
            .collect();

        // Zero-density ties keep their original order
        assert_eq!(
            top,
            vec![
                "Revenue was $1.5 billion.",
                "EPS was $2.50, up from $2.10.",
                "We are happy with our team.",
                "Our culture remains strong.",
            ]
        );
    }

    #[test]
    fn test_top_dense_truncated() {
        let sentences: Vec<SentenceTokens> = (0..25)
            .map(|i| SentenceTokens::new(format!("s{i}"), i % 4, 10))
            .collect();
        let metrics = DensityClassifier::default().classify(&sentences);

        assert_eq!(metrics.top_dense_sentences.len(), 10);
        assert!(metrics
            .top_dense_sentences
            .windows(2)
            .all(|w| w[0].density >= w[1].density));
    }

    #[test]
    fn test_empty_input() {
        let metrics = DensityClassifier::default().classify(&[]);
        assert_eq!(metrics, SentenceDensityMetrics::default());
        assert_eq!(metrics.total_sentences, 0);
        assert_eq!(metrics.mean_numeric_density, 0.0);
        assert!(metrics.top_dense_sentences.is_empty());
    }

    #[test]
    fn test_degenerate_sentences() {
        let sentences = vec![
            SentenceTokens::new("...", 0, 0),
            SentenceTokens::new("Yes.", 0, 1),
        ];
        let metrics = DensityClassifier::default().classify(&sentences);
        assert_eq!(metrics.narrative_sentences, 2);
        assert_eq!(metrics.max_numeric_density, 0.0);
    }
}
