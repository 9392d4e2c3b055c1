//! Configuration management for numdensity
//!
//! Every threshold the density engine uses lives here. The engine reads these
//! values from an immutable `Config` handed to it, never from globals, so a
//! test or a caller can swap in a modified copy without touching shared state.

use crate::error::{DensityError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Schema version written by `Config::default()` and accepted by the validator
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub density: DensityConfig,
    pub distribution: DistributionConfig,
    pub clusters: ClusterConfig,
    pub informativeness: InformativenessConfig,
    pub heatmap: HeatmapConfig,
}

/// Metadata about the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Sentence tier thresholds, as percent of word tokens that are numeric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityConfig {
    pub dense_threshold: f64,
    pub moderate_threshold: f64,
    pub sparse_threshold: f64,
    /// How many (sentence, density) pairs to keep in `top_dense_sentences`
    pub top_sentences: usize,
}

/// Positional split and shape classification constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Fraction of the document counted as its beginning
    pub beginning_fraction: f64,
    /// Fraction at which the end segment starts
    pub end_fraction: f64,
    /// Percentage-point gap that counts as a real positional difference
    pub significant_difference: f64,
    pub uniform_cv: f64,
    pub clustered_cv: f64,
    pub uniform_confidence: f64,
    pub clustered_confidence: f64,
    pub scattered_confidence: f64,
    /// Divisor turning a positional gap into a confidence
    pub confidence_scale: f64,
    pub qa_section_keys: Vec<String>,
}

/// Sliding-window cluster detection constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub window_size: usize,
    pub density_threshold: f64,
}

/// Weights and cut points for the composite informativeness score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformativenessConfig {
    pub density_weight: f64,
    pub density_ceiling: f64,
    pub specificity_weight: f64,
    pub specificity_scale_max: f64,
    pub guidance_weight: f64,
    pub guidance_ceiling: f64,
    pub context_weight: f64,
    pub forecast_guidance_multiplier: f64,
    pub forecast_ratio_divisor: f64,
    pub forecast_ratio_weight: f64,
    /// Mean density below which numeric avoidance risk starts accruing
    pub avoidance_baseline: f64,
    pub avoidance_multiplier: f64,
    pub vagueness_weight: f64,
    pub benchmark_above: f64,
    pub benchmark_at_floor: f64,
    /// very_high, high, medium, low cut points
    pub disclosure_cuts: [f64; 4],
    /// top_quartile, above_average, average, below_average cut points
    pub transparency_cuts: [f64; 4],
}

/// ASCII heatmap layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    pub rule_width: usize,
    pub position_bar_width: usize,
    pub speaker_bar_width: usize,
    /// Density that fills a bar completely
    pub density_ceiling: f64,
    pub max_clusters: usize,
    pub max_speakers: usize,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DensityError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DensityError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| DensityError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: NUMDENSITY_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    /// Apply overrides from an explicit `(key, value)` source
    pub fn apply_overrides(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix("NUMDENSITY_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "DENSITY__DENSE_THRESHOLD" => {
                self.density.dense_threshold = parse_value(path, value)?;
            }
            "DENSITY__MODERATE_THRESHOLD" => {
                self.density.moderate_threshold = parse_value(path, value)?;
            }
            "DENSITY__SPARSE_THRESHOLD" => {
                self.density.sparse_threshold = parse_value(path, value)?;
            }
            "CLUSTERS__WINDOW_SIZE" => {
                self.clusters.window_size = parse_value(path, value)?;
            }
            "CLUSTERS__DENSITY_THRESHOLD" => {
                self.clusters.density_threshold = parse_value(path, value)?;
            }
            "INFORMATIVENESS__AVOIDANCE_BASELINE" => {
                self.informativeness.avoidance_baseline = parse_value(path, value)?;
            }
            "HEATMAP__POSITION_BAR_WIDTH" => {
                self.heatmap.position_bar_width = parse_value(path, value)?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DensityError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("numdensity").join("config.toml"))
    }
}

fn parse_value<T: std::str::FromStr>(path: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DensityError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}'", value),
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            density: DensityConfig::default(),
            distribution: DistributionConfig::default(),
            clusters: ClusterConfig::default(),
            informativeness: InformativenessConfig::default(),
            heatmap: HeatmapConfig::default(),
        }
    }
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            dense_threshold: 10.0,
            moderate_threshold: 5.0,
            sparse_threshold: 1.0,
            top_sentences: 10,
        }
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            beginning_fraction: 0.2,
            end_fraction: 0.8,
            significant_difference: 3.0,
            uniform_cv: 0.3,
            clustered_cv: 0.7,
            uniform_confidence: 0.9,
            clustered_confidence: 0.8,
            scattered_confidence: 0.6,
            confidence_scale: 10.0,
            qa_section_keys: vec!["Q&A".to_string(), "Questions and Answers".to_string()],
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            density_threshold: 12.0,
        }
    }
}

impl Default for InformativenessConfig {
    fn default() -> Self {
        Self {
            density_weight: 30.0,
            density_ceiling: 10.0,
            specificity_weight: 25.0,
            specificity_scale_max: 2.0,
            guidance_weight: 25.0,
            guidance_ceiling: 5.0,
            context_weight: 20.0,
            forecast_guidance_multiplier: 40.0,
            forecast_ratio_divisor: 3.0,
            forecast_ratio_weight: 20.0,
            avoidance_baseline: 3.5,
            avoidance_multiplier: 20.0,
            vagueness_weight: 50.0,
            benchmark_above: 50.0,
            benchmark_at_floor: 45.0,
            disclosure_cuts: [75.0, 60.0, 40.0, 25.0],
            transparency_cuts: [70.0, 55.0, 40.0, 25.0],
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            rule_width: 60,
            position_bar_width: 50,
            speaker_bar_width: 30,
            density_ceiling: 20.0,
            max_clusters: 5,
            max_speakers: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_thresholds() {
        let config = Config::default();
        assert_eq!(config.density.dense_threshold, 10.0);
        assert_eq!(config.density.moderate_threshold, 5.0);
        assert_eq!(config.density.sparse_threshold, 1.0);
        assert_eq!(config.clusters.window_size, 5);
        assert_eq!(config.clusters.density_threshold, 12.0);
        assert_eq!(config.informativeness.avoidance_baseline, 3.5);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.clusters.window_size = 7;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.clusters.window_size, 7);
        assert_eq!(loaded.density, config.density);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(DensityError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = Config::default();
        config.apply_overrides(vec![
            (
                "NUMDENSITY_DENSITY__DENSE_THRESHOLD".to_string(),
                "12.5".to_string(),
            ),
            ("NUMDENSITY_CLUSTERS__WINDOW_SIZE".to_string(), "3".to_string()),
            ("UNRELATED_VAR".to_string(), "x".to_string()),
        ]);
        assert_eq!(config.density.dense_threshold, 12.5);
        assert_eq!(config.clusters.window_size, 3);
    }

    #[test]
    fn test_unparsable_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(vec![(
            "NUMDENSITY_CLUSTERS__WINDOW_SIZE".to_string(),
            "five".to_string(),
        )]);
        assert_eq!(config.clusters.window_size, 5);
    }
}
