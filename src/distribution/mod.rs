//! Distribution pattern analysis
//!
//! Characterizes *where* numeric density sits inside a document: positional
//! split (beginning / middle / end), a shape label with a confidence, dense
//! clusters found with a sliding window, the Q&A answer-vs-question gap and
//! per-speaker averages.

mod clusters;

pub use clusters::{ClusterDetector, DensityCluster};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{ClusterConfig, DistributionConfig};
use crate::density::{sentence_density, stats, SentenceDensityMetrics};
use crate::tokenize::Tokenizer;

/// Shape of numeric density across a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternType {
    Uniform,
    FrontLoaded,
    BackLoaded,
    Clustered,
    Scattered,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Uniform => "uniform",
            PatternType::FrontLoaded => "front-loaded",
            PatternType::BackLoaded => "back-loaded",
            PatternType::Clustered => "clustered",
            PatternType::Scattered => "scattered",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional section and speaker text accompanying the sentence sequence
///
/// Both maps default to empty. `sections` is only consulted for the Q&A
/// differential; `speakers` maps a speaker identifier to everything that
/// speaker said.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryText {
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
    #[serde(default)]
    pub speakers: BTreeMap<String, String>,
}

/// Numeric density distribution within a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionPattern {
    pub beginning_density: f64,
    pub middle_density: f64,
    pub end_density: f64,

    pub pattern_type: PatternType,
    pub pattern_confidence: f64,

    pub cluster_count: usize,
    /// Ordered, non-overlapping
    pub clusters: Vec<DensityCluster>,

    pub question_avg_density: f64,
    pub answer_avg_density: f64,
    /// Answer minus question density
    pub qa_density_differential: f64,

    pub speaker_densities: BTreeMap<String, f64>,

    /// std / mean of the density sequence
    pub density_variance_ratio: f64,
    /// Same value as `density_variance_ratio`, kept for output compatibility
    pub coefficient_of_variation: f64,
}

/// Mean density of the first, middle and last segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionalDensity {
    pub beginning: f64,
    pub middle: f64,
    pub end: f64,
}

/// Split `densities` into beginning / middle / end and average each part
///
/// beginning = first floor(n * beginning_fraction) sentences, end = everything
/// from floor(n * end_fraction) on, middle = the rest. Empty parts are 0.0.
pub fn positional_density(densities: &[f64], config: &DistributionConfig) -> PositionalDensity {
    let n = densities.len();
    let begin_idx = ((n as f64 * config.beginning_fraction) as usize).min(n);
    let end_idx = ((n as f64 * config.end_fraction) as usize).clamp(begin_idx, n);

    PositionalDensity {
        beginning: stats::mean(&densities[..begin_idx]),
        middle: stats::mean(&densities[begin_idx..end_idx]),
        end: stats::mean(&densities[end_idx..]),
    }
}

/// Label the density shape; first matching rule wins
///
/// 1. CV below `uniform_cv` is uniform.
/// 2. Beginning exceeds both middle and end by the significant gap: front-loaded.
/// 3. End exceeds middle by the gap and `end - middle > -(beginning - middle)`:
///    back-loaded.
/// 4. CV above `clustered_cv` is clustered.
/// 5. Otherwise scattered.
pub fn classify_pattern(
    position: PositionalDensity,
    densities: &[f64],
    config: &DistributionConfig,
) -> (PatternType, f64) {
    let cv = stats::coefficient_of_variation(densities);
    let begin_vs_middle = position.beginning - position.middle;
    let begin_vs_end = position.beginning - position.end;
    let end_vs_middle = position.end - position.middle;
    let gap = config.significant_difference;

    if cv < config.uniform_cv {
        return (PatternType::Uniform, config.uniform_confidence);
    }

    if begin_vs_middle > gap && begin_vs_end > gap {
        let confidence = (begin_vs_middle / config.confidence_scale).min(1.0);
        return (PatternType::FrontLoaded, confidence);
    }

    if end_vs_middle > gap && end_vs_middle > -begin_vs_middle {
        let confidence = (end_vs_middle / config.confidence_scale).min(1.0);
        return (PatternType::BackLoaded, confidence);
    }

    if cv > config.clustered_cv {
        return (PatternType::Clustered, config.clustered_confidence);
    }

    (PatternType::Scattered, config.scattered_confidence)
}

/// Analyzes where numeric density concentrates in a document
pub struct DistributionAnalyzer {
    config: DistributionConfig,
    detector: ClusterDetector,
    tokenizer: Tokenizer,
}

impl DistributionAnalyzer {
    /// Create analyzer
    ///
    /// # Arguments
    /// * `config` - Positional split and shape thresholds
    /// * `clusters` - Window size and hot-window threshold
    /// * `narrative_ceiling` - Density below which a sentence is narrative;
    ///   such sentences are trimmed from cluster edges
    /// * `tokenizer` - Used to measure section and speaker text
    pub fn new(
        config: DistributionConfig,
        clusters: &ClusterConfig,
        narrative_ceiling: f64,
        tokenizer: Tokenizer,
    ) -> Self {
        Self {
            config,
            detector: ClusterDetector::new(
                clusters.window_size,
                clusters.density_threshold,
                narrative_ceiling,
            ),
            tokenizer,
        }
    }

    /// Build the distribution pattern for one document
    pub fn analyze(
        &self,
        metrics: &SentenceDensityMetrics,
        auxiliary: &AuxiliaryText,
    ) -> DistributionPattern {
        let densities = &metrics.density_by_position;

        let position = positional_density(densities, &self.config);
        let (pattern_type, pattern_confidence) =
            classify_pattern(position, densities, &self.config);
        let clusters = self.detector.detect(densities);
        let qa = self.qa_densities(&auxiliary.sections);
        let speaker_densities = self.speaker_densities(&auxiliary.speakers);

        let variance_ratio = if metrics.mean_numeric_density > 0.0 {
            metrics.std_numeric_density / metrics.mean_numeric_density
        } else {
            0.0
        };

        tracing::debug!(
            pattern = %pattern_type,
            confidence = pattern_confidence,
            clusters = clusters.len(),
            speakers = speaker_densities.len(),
            "distribution pattern classified"
        );

        DistributionPattern {
            beginning_density: position.beginning,
            middle_density: position.middle,
            end_density: position.end,
            pattern_type,
            pattern_confidence,
            cluster_count: clusters.len(),
            clusters,
            question_avg_density: qa.question,
            answer_avg_density: qa.answer,
            qa_density_differential: qa.differential,
            speaker_densities,
            density_variance_ratio: variance_ratio,
            coefficient_of_variation: variance_ratio,
        }
    }

    fn qa_densities(&self, sections: &BTreeMap<String, String>) -> QaDensities {
        let Some(text) = self
            .config
            .qa_section_keys
            .iter()
            .find_map(|key| sections.get(key))
        else {
            return QaDensities::default();
        };

        let (questions, answers): (Vec<_>, Vec<_>) = self
            .tokenizer
            .measure(text)
            .into_iter()
            .partition(|s| s.text.contains('?'));

        let question_densities: Vec<f64> = questions
            .iter()
            .map(|s| sentence_density(s.numeric_tokens, s.word_tokens))
            .collect();
        let answer_densities: Vec<f64> = answers
            .iter()
            .map(|s| sentence_density(s.numeric_tokens, s.word_tokens))
            .collect();

        let question = stats::mean(&question_densities);
        let answer = stats::mean(&answer_densities);
        let differential = if question_densities.is_empty() || answer_densities.is_empty() {
            0.0
        } else {
            answer - question
        };

        QaDensities {
            question,
            answer,
            differential,
        }
    }

    fn speaker_densities(&self, speakers: &BTreeMap<String, String>) -> BTreeMap<String, f64> {
        speakers
            .iter()
            .filter_map(|(speaker, text)| {
                let densities: Vec<f64> = self
                    .tokenizer
                    .measure(text)
                    .iter()
                    .map(|s| sentence_density(s.numeric_tokens, s.word_tokens))
                    .collect();
                // Speakers with no sentences are left out rather than reported as 0%
                (!densities.is_empty()).then(|| (speaker.clone(), stats::mean(&densities)))
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct QaDensities {
    question: f64,
    answer: f64,
    differential: f64,
}
