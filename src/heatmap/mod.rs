//! ASCII heatmap of density distribution, for console and log output

use crate::config::HeatmapConfig;
use crate::density::SentenceDensityMetrics;
use crate::distribution::DistributionPattern;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Renders a fixed-width text summary of a distribution pattern
pub struct HeatmapRenderer {
    config: HeatmapConfig,
}

impl HeatmapRenderer {
    pub fn new(config: HeatmapConfig) -> Self {
        Self { config }
    }

    /// Bar of exactly `max_width` cells plus brackets
    ///
    /// Filled width scales linearly with density against the configured
    /// ceiling and is clamped to [0, max_width].
    pub fn density_bar(&self, density: f64, max_width: usize) -> String {
        let scaled = (density / self.config.density_ceiling) * max_width as f64;
        let width = if scaled.is_finite() && scaled > 0.0 {
            (scaled as usize).min(max_width)
        } else {
            0
        };

        let mut bar = String::with_capacity(max_width * 3 + 2);
        bar.push('[');
        bar.extend(std::iter::repeat(FILLED).take(width));
        bar.extend(std::iter::repeat(EMPTY).take(max_width - width));
        bar.push(']');
        bar
    }

    pub fn render(
        &self,
        distribution: &DistributionPattern,
        metrics: &SentenceDensityMetrics,
    ) -> String {
        let rule = "=".repeat(self.config.rule_width);
        let position_width = self.config.position_bar_width;
        let mut lines = vec![
            rule.clone(),
            "NUMERIC DENSITY DISTRIBUTION HEATMAP".to_string(),
            rule.clone(),
            String::new(),
            format!(
                "Pattern Type: {} (confidence: {:.1}%)",
                distribution.pattern_type.as_str().to_uppercase(),
                distribution.pattern_confidence * 100.0
            ),
            format!(
                "Sentences: {} | Mean density: {:.1}% | Dense: {:.1}% | Narrative: {:.1}%",
                metrics.total_sentences,
                metrics.mean_numeric_density,
                metrics.proportion_numeric_dense * 100.0,
                metrics.proportion_narrative * 100.0
            ),
            String::new(),
            "Distribution by Position:".to_string(),
        ];

        for (label, density) in [
            ("Beginning (first 20%):", distribution.beginning_density),
            ("Middle (60%):", distribution.middle_density),
            ("End (last 20%):", distribution.end_density),
        ] {
            lines.push(format!(
                "  {:<23}{} {:.1}%",
                label,
                self.density_bar(density, position_width),
                density
            ));
        }
        lines.push(String::new());

        if !distribution.clusters.is_empty() {
            lines.push(format!(
                "High-Density Clusters: {}",
                distribution.clusters.len()
            ));
            for (i, cluster) in distribution
                .clusters
                .iter()
                .take(self.config.max_clusters)
                .enumerate()
            {
                lines.push(format!(
                    "  Cluster {}: Sentences {}-{} (avg density: {:.1}%)",
                    i + 1,
                    cluster.start,
                    cluster.end,
                    cluster.mean_density
                ));
            }
            if distribution.clusters.len() > self.config.max_clusters {
                lines.push(format!(
                    "  ... and {} more clusters",
                    distribution.clusters.len() - self.config.max_clusters
                ));
            }
            lines.push(String::new());
        }

        if distribution.qa_density_differential != 0.0 {
            let leaning = if distribution.qa_density_differential > 0.0 {
                "(answers more numeric)"
            } else {
                "(questions more numeric)"
            };
            lines.push("Q&A Analysis:".to_string());
            lines.push(format!(
                "  Questions: {:.1}%",
                distribution.question_avg_density
            ));
            lines.push(format!("  Answers:   {:.1}%", distribution.answer_avg_density));
            lines.push(format!(
                "  Differential: {:+.1}% {}",
                distribution.qa_density_differential, leaning
            ));
            lines.push(String::new());
        }

        if !distribution.speaker_densities.is_empty() {
            let mut speakers: Vec<(&String, &f64)> =
                distribution.speaker_densities.iter().collect();
            // BTreeMap order breaks ties, so output is stable
            speakers.sort_by(|a, b| b.1.total_cmp(a.1));

            lines.push("Density by Speaker:".to_string());
            for (speaker, density) in speakers.into_iter().take(self.config.max_speakers) {
                lines.push(format!(
                    "  {:<30} {} {:.1}%",
                    speaker,
                    self.density_bar(*density, self.config.speaker_bar_width),
                    density
                ));
            }
            lines.push(String::new());
        }

        lines.push(rule);
        lines.join("\n")
    }
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self::new(HeatmapConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{DensityCluster, PatternType};
    use std::collections::BTreeMap;

    fn distribution() -> DistributionPattern {
        DistributionPattern {
            beginning_density: 10.0,
            middle_density: 4.0,
            end_density: 25.0,
            pattern_type: PatternType::BackLoaded,
            pattern_confidence: 1.0,
            cluster_count: 1,
            clusters: vec![DensityCluster {
                start: 3,
                end: 7,
                mean_density: 15.0,
            }],
            question_avg_density: 2.0,
            answer_avg_density: 6.5,
            qa_density_differential: 4.5,
            speaker_densities: BTreeMap::from([
                ("CEO".to_string(), 1.0),
                ("CFO".to_string(), 12.0),
            ]),
            density_variance_ratio: 0.8,
            coefficient_of_variation: 0.8,
        }
    }

    #[test]
    fn test_density_bar_scaling() {
        let renderer = HeatmapRenderer::default();

        let half = renderer.density_bar(10.0, 50);
        assert_eq!(half.chars().filter(|c| *c == FILLED).count(), 25);
        assert_eq!(half.chars().filter(|c| *c == EMPTY).count(), 25);
        assert!(half.starts_with('[') && half.ends_with(']'));
    }

    #[test]
    fn test_density_bar_clamped() {
        let renderer = HeatmapRenderer::default();

        let full = renderer.density_bar(80.0, 30);
        assert_eq!(full.chars().filter(|c| *c == FILLED).count(), 30);

        let empty = renderer.density_bar(-5.0, 30);
        assert_eq!(empty.chars().filter(|c| *c == EMPTY).count(), 30);
        assert_eq!(empty.chars().count(), 32);
    }

    #[test]
    fn test_render_sections() {
        let output = HeatmapRenderer::default()
            .render(&distribution(), &SentenceDensityMetrics::default());

        assert!(output.starts_with(&"=".repeat(60)));
        assert!(output.contains("Pattern Type: BACK-LOADED (confidence: 100.0%)"));
        assert!(output.contains("25.0%"));
        assert!(output.contains("Cluster 1: Sentences 3-7 (avg density: 15.0%)"));
        assert!(output.contains("Differential: +4.5% (answers more numeric)"));
        assert!(output.contains("Density by Speaker:"));

        let cfo = output.find("CFO").unwrap();
        let ceo = output.find("CEO").unwrap();
        assert!(cfo < ceo);
    }

    #[test]
    fn test_render_cluster_overflow() {
        let mut dist = distribution();
        dist.clusters = (0..7)
            .map(|i| DensityCluster {
                start: i * 10,
                end: i * 10 + 4,
                mean_density: 14.0,
            })
            .collect();
        dist.cluster_count = 7;

        let output = HeatmapRenderer::default().render(&dist, &SentenceDensityMetrics::default());
        assert!(output.contains("Cluster 5:"));
        assert!(!output.contains("Cluster 6:"));
        assert!(output.contains("... and 2 more clusters"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = HeatmapRenderer::default();
        let metrics = SentenceDensityMetrics::default();
        assert_eq!(
            renderer.render(&distribution(), &metrics),
            renderer.render(&distribution(), &metrics)
        );
    }
}
