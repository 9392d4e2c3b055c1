use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use numdensity::cli::{Cli, Commands, ConfigAction};
use numdensity::config::{Config, ConfigValidator, HeatmapConfig};
use numdensity::error::{DensityError, Result};
use numdensity::informativeness::NumericalScores;
use numdensity::pipeline::{DensityPipeline, DensityReport, TranscriptInput};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            input,
            text,
            scores,
            format,
            output,
        } => {
            cmd_analyze(cli.config, &input, text, scores, &format, output)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose {
        "numdensity=debug"
    } else {
        "numdensity=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_analyze(
    config_path: Option<PathBuf>,
    input: &Path,
    raw_text: bool,
    scores_path: Option<PathBuf>,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let layout = config.heatmap.clone();
    let pipeline = DensityPipeline::with_regex(config)?;

    let content = read_file(input, "Failed to read transcript")?;
    let scores = scores_path
        .map(|path| -> Result<NumericalScores> {
            let raw = read_file(&path, "Failed to read scores")?;
            serde_json::from_str(&raw).map_err(|e| DensityError::Json {
                source: e,
                context: format!("Invalid numerical scores in {:?}", path),
            })
        })
        .transpose()?;

    let report = if raw_text {
        pipeline.analyze_text(
            &content,
            BTreeMap::new(),
            BTreeMap::new(),
            scores.unwrap_or_default(),
        )
    } else {
        let mut transcript: TranscriptInput =
            serde_json::from_str(&content).map_err(|e| DensityError::Json {
                source: e,
                context: format!("Invalid transcript input in {:?}", input),
            })?;
        if let Some(scores) = scores {
            transcript.numerical_scores = scores;
        }
        if transcript.sentences.is_empty() {
            tracing::warn!("Transcript contains no sentences");
        }
        pipeline.analyze(&transcript)
    };

    let rendered = render(&report, &layout, format)?;

    match output {
        Some(path) => {
            std::fs::write(&path, rendered).map_err(|e| DensityError::Io {
                source: e,
                context: format!("Failed to write output: {:?}", path),
            })?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn render(report: &DensityReport, layout: &HeatmapConfig, format: &str) -> Result<String> {
    match format {
        "json" => serde_json::to_string_pretty(report).map_err(|e| DensityError::Json {
            source: e,
            context: "Failed to serialize report".to_string(),
        }),
        "heatmap" => Ok(report.render_heatmap(layout)),
        "summary" => Ok(report.summary()),
        other => Err(DensityError::Input(format!("Unknown output format: {}", other))),
    }
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| DensityError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Explicit path must exist; the default location falls back to built-in defaults
fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = config_path {
        return Config::load(&path);
    }

    let path = Config::default_path()?;
    if path.exists() {
        return Config::load(&path);
    }

    tracing::debug!(
        "Config file not found at {}, using defaults. Run 'numdensity config init' to create one.",
        path.display()
    );
    let mut config = Config::default();
    config.apply_env_overrides();
    ConfigValidator::validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path, context: &str) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("{}: {}", context, path.display()))?;
    Ok(content)
}
