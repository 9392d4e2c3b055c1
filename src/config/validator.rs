use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{DensityError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, collecting every violation
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_finite(config, &mut errors);
        Self::validate_density(config, &mut errors);
        Self::validate_distribution(config, &mut errors);
        Self::validate_clusters(config, &mut errors);
        Self::validate_informativeness(config, &mut errors);
        Self::validate_heatmap(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DensityError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_finite(config: &Config, errors: &mut Vec<ValidationError>) {
        let d = &config.density;
        let dist = &config.distribution;
        let info = &config.informativeness;

        let mut fields = vec![
            ("density.dense_threshold", d.dense_threshold),
            ("density.moderate_threshold", d.moderate_threshold),
            ("density.sparse_threshold", d.sparse_threshold),
            ("distribution.beginning_fraction", dist.beginning_fraction),
            ("distribution.end_fraction", dist.end_fraction),
            ("distribution.significant_difference", dist.significant_difference),
            ("distribution.uniform_cv", dist.uniform_cv),
            ("distribution.clustered_cv", dist.clustered_cv),
            ("distribution.uniform_confidence", dist.uniform_confidence),
            ("distribution.clustered_confidence", dist.clustered_confidence),
            ("distribution.scattered_confidence", dist.scattered_confidence),
            ("distribution.confidence_scale", dist.confidence_scale),
            ("clusters.density_threshold", config.clusters.density_threshold),
            ("informativeness.density_weight", info.density_weight),
            ("informativeness.density_ceiling", info.density_ceiling),
            ("informativeness.specificity_weight", info.specificity_weight),
            ("informativeness.specificity_scale_max", info.specificity_scale_max),
            ("informativeness.guidance_weight", info.guidance_weight),
            ("informativeness.guidance_ceiling", info.guidance_ceiling),
            ("informativeness.context_weight", info.context_weight),
            (
                "informativeness.forecast_guidance_multiplier",
                info.forecast_guidance_multiplier,
            ),
            ("informativeness.forecast_ratio_divisor", info.forecast_ratio_divisor),
            ("informativeness.forecast_ratio_weight", info.forecast_ratio_weight),
            ("informativeness.avoidance_baseline", info.avoidance_baseline),
            ("informativeness.avoidance_multiplier", info.avoidance_multiplier),
            ("informativeness.vagueness_weight", info.vagueness_weight),
            ("informativeness.benchmark_above", info.benchmark_above),
            ("informativeness.benchmark_at_floor", info.benchmark_at_floor),
            ("heatmap.density_ceiling", config.heatmap.density_ceiling),
        ];
        fields.extend(
            info.disclosure_cuts
                .iter()
                .map(|v| ("informativeness.disclosure_cuts", *v)),
        );
        fields.extend(
            info.transparency_cuts
                .iter()
                .map(|v| ("informativeness.transparency_cuts", *v)),
        );

        for (path, value) in fields {
            if !value.is_finite() {
                errors.push(ValidationError::new(
                    path,
                    format!("Value must be a finite number, got {}", value),
                ));
            }
        }
    }

    fn validate_density(config: &Config, errors: &mut Vec<ValidationError>) {
        let density = &config.density;

        if density.sparse_threshold < 0.0 {
            errors.push(ValidationError::new(
                "density.sparse_threshold",
                "Sparse threshold cannot be negative",
            ));
        }

        // Tiers are checked top-down, so they must be strictly ordered
        if !(density.sparse_threshold < density.moderate_threshold
            && density.moderate_threshold < density.dense_threshold)
        {
            errors.push(ValidationError::new(
                "density",
                format!(
                    "Thresholds must satisfy sparse < moderate < dense, got {} / {} / {}",
                    density.sparse_threshold, density.moderate_threshold, density.dense_threshold
                ),
            ));
        }

        if density.top_sentences == 0 {
            errors.push(ValidationError::new(
                "density.top_sentences",
                "Top sentence limit must be greater than 0",
            ));
        }
    }

    fn validate_distribution(config: &Config, errors: &mut Vec<ValidationError>) {
        let dist = &config.distribution;

        if !(0.0 < dist.beginning_fraction
            && dist.beginning_fraction < dist.end_fraction
            && dist.end_fraction < 1.0)
        {
            errors.push(ValidationError::new(
                "distribution",
                format!(
                    "Fractions must satisfy 0 < beginning < end < 1, got {} / {}",
                    dist.beginning_fraction, dist.end_fraction
                ),
            ));
        }

        if dist.uniform_cv >= dist.clustered_cv {
            errors.push(ValidationError::new(
                "distribution.uniform_cv",
                "Uniform CV must be below clustered CV",
            ));
        }

        let confidences = [
            ("distribution.uniform_confidence", dist.uniform_confidence),
            ("distribution.clustered_confidence", dist.clustered_confidence),
            ("distribution.scattered_confidence", dist.scattered_confidence),
        ];
        for (path, value) in confidences {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ValidationError::new(
                    path,
                    format!("Confidence must be between 0.0 and 1.0, got {}", value),
                ));
            }
        }

        if dist.significant_difference < 0.0 {
            errors.push(ValidationError::new(
                "distribution.significant_difference",
                "Significant difference cannot be negative",
            ));
        }

        if dist.confidence_scale <= 0.0 {
            errors.push(ValidationError::new(
                "distribution.confidence_scale",
                "Confidence scale must be greater than 0",
            ));
        }

        if dist.qa_section_keys.is_empty() {
            errors.push(ValidationError::new(
                "distribution.qa_section_keys",
                "At least one Q&A section key is required",
            ));
        }
    }

    fn validate_clusters(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.clusters.window_size == 0 {
            errors.push(ValidationError::new(
                "clusters.window_size",
                "Window size must be greater than 0",
            ));
        }
    }

    fn validate_informativeness(config: &Config, errors: &mut Vec<ValidationError>) {
        let info = &config.informativeness;

        let divisors = [
            ("informativeness.density_ceiling", info.density_ceiling),
            (
                "informativeness.specificity_scale_max",
                info.specificity_scale_max,
            ),
            ("informativeness.guidance_ceiling", info.guidance_ceiling),
            (
                "informativeness.forecast_ratio_divisor",
                info.forecast_ratio_divisor,
            ),
        ];
        for (path, value) in divisors {
            if value <= 0.0 {
                errors.push(ValidationError::new(
                    path,
                    format!("Divisor must be greater than 0, got {}", value),
                ));
            }
        }

        let weights = [
            ("informativeness.density_weight", info.density_weight),
            ("informativeness.specificity_weight", info.specificity_weight),
            ("informativeness.guidance_weight", info.guidance_weight),
            ("informativeness.context_weight", info.context_weight),
            (
                "informativeness.forecast_guidance_multiplier",
                info.forecast_guidance_multiplier,
            ),
            ("informativeness.forecast_ratio_weight", info.forecast_ratio_weight),
            ("informativeness.avoidance_multiplier", info.avoidance_multiplier),
            ("informativeness.vagueness_weight", info.vagueness_weight),
        ];
        for (path, value) in weights {
            if value < 0.0 {
                errors.push(ValidationError::new(
                    path,
                    format!("Weight cannot be negative, got {}", value),
                ));
            }
        }

        // Penalty is reported on a 0-100 scale
        if info.vagueness_weight > 100.0 {
            errors.push(ValidationError::new(
                "informativeness.vagueness_weight",
                format!("Vagueness weight cannot exceed 100, got {}", info.vagueness_weight),
            ));
        }

        if info.benchmark_at_floor > info.benchmark_above {
            errors.push(ValidationError::new(
                "informativeness.benchmark_at_floor",
                "Benchmark 'at' floor cannot exceed the 'above' threshold",
            ));
        }

        for (path, cuts) in [
            ("informativeness.disclosure_cuts", &info.disclosure_cuts),
            ("informativeness.transparency_cuts", &info.transparency_cuts),
        ] {
            if cuts.windows(2).any(|pair| pair[0] <= pair[1]) {
                errors.push(ValidationError::new(
                    path,
                    format!("Cut points must be strictly descending, got {:?}", cuts),
                ));
            }
        }
    }

    fn validate_heatmap(config: &Config, errors: &mut Vec<ValidationError>) {
        let heatmap = &config.heatmap;

        if heatmap.position_bar_width == 0 || heatmap.speaker_bar_width == 0 {
            errors.push(ValidationError::new(
                "heatmap",
                "Bar widths must be greater than 0",
            ));
        }

        if heatmap.density_ceiling <= 0.0 {
            errors.push(ValidationError::new(
                "heatmap.density_ceiling",
                "Density ceiling must be greater than 0",
            ));
        }
    }
}
