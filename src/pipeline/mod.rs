// Density analysis pipeline
//
// Stage 1: Sentence density classification
// Stage 2: Distribution pattern analysis
// Stage 3: Informativeness composition

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::{Config, HeatmapConfig};
use crate::density::{DensityClassifier, SentenceDensityMetrics};
use crate::distribution::{AuxiliaryText, DistributionAnalyzer, DistributionPattern};
use crate::error::Result;
use crate::heatmap::HeatmapRenderer;
use crate::informativeness::{InformativenessComposer, InformativenessMetrics, NumericalScores};
use crate::tokenize::{SentenceTokens, Tokenizer};

/// One input sentence: raw text to be measured, or pre-counted tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentenceInput {
    Text(String),
    Counted(SentenceTokens),
}

impl From<&str> for SentenceInput {
    fn from(text: &str) -> Self {
        SentenceInput::Text(text.to_string())
    }
}

impl From<SentenceTokens> for SentenceInput {
    fn from(tokens: SentenceTokens) -> Self {
        SentenceInput::Counted(tokens)
    }
}

/// Everything the pipeline needs for one transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptInput {
    pub sentences: Vec<SentenceInput>,
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
    #[serde(default)]
    pub speakers: BTreeMap<String, String>,
    #[serde(default)]
    pub numerical_scores: NumericalScores,
}

/// Combined output of all three stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityReport {
    pub sentence_metrics: SentenceDensityMetrics,
    pub distribution: DistributionPattern,
    pub informativeness: InformativenessMetrics,
}

impl DensityReport {
    /// Heatmap rendered with the given layout
    pub fn render_heatmap(&self, layout: &HeatmapConfig) -> String {
        HeatmapRenderer::new(layout.clone()).render(&self.distribution, &self.sentence_metrics)
    }

    /// Short human-readable digest
    pub fn summary(&self) -> String {
        let m = &self.sentence_metrics;
        let d = &self.distribution;
        let i = &self.informativeness;

        let mut lines = vec![
            format!("Sentences:            {}", m.total_sentences),
            format!(
                "Tiers:                dense {} | moderate {} | sparse {} | narrative {}",
                m.numeric_dense_sentences,
                m.numeric_moderate_sentences,
                m.numeric_sparse_sentences,
                m.narrative_sentences
            ),
            format!(
                "Density:              mean {:.2}% | median {:.2}% | std {:.2}",
                m.mean_numeric_density, m.median_numeric_density, m.std_numeric_density
            ),
            format!(
                "Pattern:              {} ({:.0}% confidence, {} clusters)",
                d.pattern_type,
                d.pattern_confidence * 100.0,
                d.cluster_count
            ),
            format!(
                "Informativeness:      {:.1} ({}, {})",
                i.informativeness_score,
                i.quantitative_disclosure_level.as_str(),
                i.transparency_tier.as_str()
            ),
            format!("Forecast relevance:   {:.1}", i.forecast_relevance_score),
            format!("Avoidance risk:       {:.1}", i.numeric_avoidance_risk),
            format!("Vagueness penalty:    {:.1}", i.vagueness_penalty),
            format!(
                "vs S&P 500:           {}",
                i.vs_sp500_informativeness.as_str()
            ),
        ];

        if let Some(top) = m.top_dense_sentences.first() {
            lines.push(format!(
                "Densest sentence:     {:.1}% \"{}\"",
                top.density, top.sentence
            ));
        }

        lines.join("\n")
    }
}

/// Orchestrates classifier, analyzer and composer under one config
pub struct DensityPipeline {
    tokenizer: Tokenizer,
    classifier: DensityClassifier,
    analyzer: DistributionAnalyzer,
    composer: InformativenessComposer,
}

impl DensityPipeline {
    /// Create pipeline
    ///
    /// # Arguments
    /// * `config` - Validated configuration
    /// * `tokenizer` - Measures raw sentences, section and speaker text
    pub fn new(config: Config, tokenizer: Tokenizer) -> Self {
        let Config {
            density,
            distribution,
            clusters,
            informativeness,
            ..
        } = config;

        let narrative_ceiling = density.sparse_threshold;

        Self {
            analyzer: DistributionAnalyzer::new(
                distribution,
                &clusters,
                narrative_ceiling,
                tokenizer.clone(),
            ),
            classifier: DensityClassifier::new(density),
            composer: InformativenessComposer::new(informativeness),
            tokenizer,
        }
    }

    /// Pipeline using the built-in regex tokenizer
    pub fn with_regex(config: Config) -> Result<Self> {
        Ok(Self::new(config, Tokenizer::regex()?))
    }

    /// Run all three stages over a transcript
    pub fn analyze(&self, input: &TranscriptInput) -> DensityReport {
        let sentences: Vec<SentenceTokens> = input
            .sentences
            .iter()
            .map(|sentence| match sentence {
                SentenceInput::Text(text) => self.tokenizer.measure_sentence(text),
                SentenceInput::Counted(tokens) => tokens.clone(),
            })
            .collect();

        let auxiliary = AuxiliaryText {
            sections: input.sections.clone(),
            speakers: input.speakers.clone(),
        };

        self.run(&sentences, &auxiliary, &input.numerical_scores)
    }

    /// Segment raw transcript text, then analyze it
    pub fn analyze_text(
        &self,
        text: &str,
        sections: BTreeMap<String, String>,
        speakers: BTreeMap<String, String>,
        scores: NumericalScores,
    ) -> DensityReport {
        let sentences = self.tokenizer.measure(text);
        let auxiliary = AuxiliaryText { sections, speakers };
        self.run(&sentences, &auxiliary, &scores)
    }

    fn run(
        &self,
        sentences: &[SentenceTokens],
        auxiliary: &AuxiliaryText,
        scores: &NumericalScores,
    ) -> DensityReport {
        let start = Instant::now();

        let sentence_metrics = self.classifier.classify(sentences);
        let distribution = self.analyzer.analyze(&sentence_metrics, auxiliary);
        let informativeness = self
            .composer
            .compose(&sentence_metrics, scores, &distribution);

        tracing::info!(
            sentences = sentence_metrics.total_sentences,
            pattern = %distribution.pattern_type,
            score = informativeness.informativeness_score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "density analysis complete"
        );

        DensityReport {
            sentence_metrics,
            distribution,
            informativeness,
        }
    }
}
