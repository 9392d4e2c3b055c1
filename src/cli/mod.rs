//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "numdensity",
    version,
    author = "neur0map",
    about = "Numeric density and informativeness analysis for earnings call transcripts",
    long_about = "numdensity classifies every sentence of a transcript by numeric density, characterizes \
                  where the quantitative content sits, and scores how informative the disclosure is."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/numdensity/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a transcript
    Analyze {
        /// Transcript input: JSON document, or raw text with --text
        input: PathBuf,

        /// Treat the input as raw transcript text instead of JSON
        #[arg(long)]
        text: bool,

        /// JSON file with numerical transparency scores (overrides any in the input)
        #[arg(short, long, value_name = "FILE")]
        scores: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_parser = ["json", "heatmap", "summary"], default_value = "json")]
        format: String,

        /// Write output to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
