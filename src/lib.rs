//! numdensity - Numeric density and informativeness analysis for financial call transcripts
//!
//! Measures how much of a transcript is quantitative, where that quantitative
//! content sits, and how informative it is once combined with upstream
//! numerical-transparency scores.

pub mod cli;
pub mod config;
pub mod density;
pub mod distribution;
pub mod error;
pub mod heatmap;
pub mod informativeness;
pub mod pipeline;
pub mod tokenize;

pub use error::{DensityError, Result};
pub use pipeline::{DensityPipeline, DensityReport, SentenceInput, TranscriptInput};
