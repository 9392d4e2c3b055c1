//! Informativeness scoring
//!
//! Fuses sentence density, distribution shape and the externally supplied
//! numeric-transparency scores into one disclosure-quality assessment.
//! Every output is bounded; malformed (negative, NaN, infinite) external
//! inputs are coerced before use so the composer never fails.

use serde::{Deserialize, Serialize};

use crate::config::InformativenessConfig;
use crate::density::SentenceDensityMetrics;
use crate::distribution::DistributionPattern;

/// Lower bound of the specificity index scale
pub const MIN_SPECIFICITY_INDEX: f64 = 0.3;

/// Result of the upstream numerical-transparency analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericalScores {
    /// Forward-looking numeric density, percent
    pub forward_looking_density: f64,
    /// Backward-looking numeric density, percent
    pub backward_looking_density: f64,
    pub forward_to_backward_ratio: f64,
    /// Number precision on a [0.3, 2.0] scale
    pub numerical_specificity_index: f64,
    /// How well numbers are explained, [0, 1]
    pub contextualization_quality_score: f64,
}

impl Default for NumericalScores {
    /// Floor of every scale: nothing forward-looking, least specific
    fn default() -> Self {
        Self {
            forward_looking_density: 0.0,
            backward_looking_density: 0.0,
            forward_to_backward_ratio: 0.0,
            numerical_specificity_index: MIN_SPECIFICITY_INDEX,
            contextualization_quality_score: 0.0,
        }
    }
}

impl NumericalScores {
    /// Replace non-finite values with zero and negatives with zero
    fn sanitized(&self) -> Self {
        let clean = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                tracing::warn!(field = name, value, "malformed numerical score coerced to zero");
                0.0
            }
        };

        Self {
            forward_looking_density: clean("forward_looking_density", self.forward_looking_density),
            backward_looking_density: clean(
                "backward_looking_density",
                self.backward_looking_density,
            ),
            forward_to_backward_ratio: clean(
                "forward_to_backward_ratio",
                self.forward_to_backward_ratio,
            ),
            numerical_specificity_index: clean(
                "numerical_specificity_index",
                self.numerical_specificity_index,
            ),
            contextualization_quality_score: clean(
                "contextualization_quality_score",
                self.contextualization_quality_score,
            ),
        }
    }
}

/// Bucketing of the informativeness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl DisclosureLevel {
    /// `cuts` are the very_high, high, medium and low lower bounds
    pub fn from_score(score: f64, cuts: &[f64; 4]) -> Self {
        if score >= cuts[0] {
            DisclosureLevel::VeryHigh
        } else if score >= cuts[1] {
            DisclosureLevel::High
        } else if score >= cuts[2] {
            DisclosureLevel::Medium
        } else if score >= cuts[3] {
            DisclosureLevel::Low
        } else {
            DisclosureLevel::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisclosureLevel::VeryHigh => "very_high",
            DisclosureLevel::High => "high",
            DisclosureLevel::Medium => "medium",
            DisclosureLevel::Low => "low",
            DisclosureLevel::VeryLow => "very_low",
        }
    }
}

/// Independent quartile-style bucketing of the same score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransparencyTier {
    TopQuartile,
    AboveAverage,
    Average,
    BelowAverage,
    BottomQuartile,
}

impl TransparencyTier {
    pub fn from_score(score: f64, cuts: &[f64; 4]) -> Self {
        if score >= cuts[0] {
            TransparencyTier::TopQuartile
        } else if score >= cuts[1] {
            TransparencyTier::AboveAverage
        } else if score >= cuts[2] {
            TransparencyTier::Average
        } else if score >= cuts[3] {
            TransparencyTier::BelowAverage
        } else {
            TransparencyTier::BottomQuartile
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransparencyTier::TopQuartile => "top_quartile",
            TransparencyTier::AboveAverage => "above_average",
            TransparencyTier::Average => "average",
            TransparencyTier::BelowAverage => "below_average",
            TransparencyTier::BottomQuartile => "bottom_quartile",
        }
    }
}

/// Position against the fixed market reference band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Benchmark {
    Above,
    At,
    Below,
}

impl Benchmark {
    /// Above when strictly over `above`, at when within [`at_floor`, `above`]
    pub fn from_score(score: f64, above: f64, at_floor: f64) -> Self {
        if score > above {
            Benchmark::Above
        } else if score >= at_floor {
            Benchmark::At
        } else {
            Benchmark::Below
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Benchmark::Above => "above",
            Benchmark::At => "at",
            Benchmark::Below => "below",
        }
    }
}

/// Informativeness metrics derived from numeric content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformativenessMetrics {
    /// Share of sentences with any numeric content, [0, 1]
    pub numeric_inclusion_ratio: f64,
    pub guidance_numeric_density: f64,
    pub results_numeric_density: f64,
    pub specificity_weighted_nir: f64,

    /// Composite score, [0, 100]
    pub informativeness_score: f64,
    /// [0, 100]
    pub forecast_relevance_score: f64,

    pub quantitative_disclosure_level: DisclosureLevel,
    pub transparency_tier: TransparencyTier,

    /// [0, 100], grows as mean density falls below the baseline
    pub numeric_avoidance_risk: f64,
    /// [0, 100], at most 50 with the default weight; grows as specificity falls
    pub vagueness_penalty: f64,

    pub contextualization_score: f64,

    pub vs_sp500_informativeness: Benchmark,
}

/// Weighted parts of the informativeness score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponents {
    pub density: f64,
    pub specificity: f64,
    pub guidance: f64,
    pub context: f64,
}

impl ScoreComponents {
    pub fn total(&self) -> f64 {
        self.density + self.specificity + self.guidance + self.context
    }
}

/// Builds `InformativenessMetrics` from the upstream analyses
pub struct InformativenessComposer {
    config: InformativenessConfig,
}

impl InformativenessComposer {
    pub fn new(config: InformativenessConfig) -> Self {
        Self { config }
    }

    /// Weighted components; every sub-ratio is clamped to [0, 1] before weighting
    pub fn components(&self, mean_density: f64, scores: &NumericalScores) -> ScoreComponents {
        let c = &self.config;
        let ratio = |value: f64, ceiling: f64| (value / ceiling).clamp(0.0, 1.0);

        ScoreComponents {
            density: ratio(mean_density, c.density_ceiling) * c.density_weight,
            specificity: ratio(scores.numerical_specificity_index, c.specificity_scale_max)
                * c.specificity_weight,
            guidance: ratio(scores.forward_looking_density, c.guidance_ceiling) * c.guidance_weight,
            context: scores.contextualization_quality_score.clamp(0.0, 1.0) * c.context_weight,
        }
    }

    /// Compose the final metrics
    pub fn compose(
        &self,
        metrics: &SentenceDensityMetrics,
        scores: &NumericalScores,
        distribution: &DistributionPattern,
    ) -> InformativenessMetrics {
        let c = &self.config;
        let scores = scores.sanitized();

        let numeric_inclusion_ratio = if metrics.total_sentences > 0 {
            metrics.numeric_sentences() as f64 / metrics.total_sentences as f64
        } else {
            0.0
        };

        let specificity_ratio = scores.numerical_specificity_index / c.specificity_scale_max;
        let specificity_weighted_nir = numeric_inclusion_ratio * specificity_ratio;

        let components = self.components(metrics.mean_numeric_density, &scores);
        let informativeness_score = components.total().clamp(0.0, 100.0);

        let forecast_relevance_score = (scores.forward_looking_density
            * c.forecast_guidance_multiplier
            + (scores.forward_to_backward_ratio / c.forecast_ratio_divisor)
                * c.forecast_ratio_weight
            + components.specificity
            + components.context)
            .clamp(0.0, 100.0);

        let numeric_avoidance_risk = ((c.avoidance_baseline - metrics.mean_numeric_density)
            * c.avoidance_multiplier)
            .clamp(0.0, 100.0);

        let vagueness_penalty =
            ((1.0 - specificity_ratio).max(0.0) * c.vagueness_weight).clamp(0.0, 100.0);

        tracing::debug!(
            pattern = %distribution.pattern_type,
            score = informativeness_score,
            forecast = forecast_relevance_score,
            risk = numeric_avoidance_risk,
            "informativeness composed"
        );

        InformativenessMetrics {
            numeric_inclusion_ratio,
            guidance_numeric_density: scores.forward_looking_density,
            results_numeric_density: scores.backward_looking_density,
            specificity_weighted_nir,
            informativeness_score,
            forecast_relevance_score,
            quantitative_disclosure_level: DisclosureLevel::from_score(
                informativeness_score,
                &c.disclosure_cuts,
            ),
            transparency_tier: TransparencyTier::from_score(
                informativeness_score,
                &c.transparency_cuts,
            ),
            numeric_avoidance_risk,
            vagueness_penalty,
            contextualization_score: scores.contextualization_quality_score.clamp(0.0, 1.0),
            vs_sp500_informativeness: Benchmark::from_score(
                informativeness_score,
                c.benchmark_above,
                c.benchmark_at_floor,
            ),
        }
    }
}

impl Default for InformativenessComposer {
    fn default() -> Self {
        Self::new(InformativenessConfig::default())
    }
}
