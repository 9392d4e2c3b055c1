// End-to-end tests of the density pipeline on transcript-shaped input
use std::collections::BTreeMap;

use numdensity::config::{Config, HeatmapConfig};
use numdensity::distribution::PatternType;
use numdensity::informativeness::{Benchmark, DisclosureLevel, NumericalScores};
use numdensity::pipeline::{DensityPipeline, SentenceInput, TranscriptInput};
use numdensity::tokenize::SentenceTokens;

fn pipeline() -> DensityPipeline {
    DensityPipeline::with_regex(Config::default()).unwrap()
}

fn counted(densities: &[i64]) -> Vec<SentenceInput> {
    // 100 words per sentence so the numeric count is the density percentage
    densities
        .iter()
        .enumerate()
        .map(|(i, d)| SentenceTokens::new(format!("Sentence {i}."), *d, 100).into())
        .collect()
}

#[test]
fn test_earnings_call_scenario() {
    let input = TranscriptInput {
        sentences: vec![
            SentenceTokens::new("Revenue was $1.5 billion.", 2, 5).into(),
            SentenceTokens::new("We are happy with our team.", 0, 6).into(),
            SentenceTokens::new("EPS was $2.50, up from $2.10.", 2, 6).into(),
            SentenceTokens::new("Our culture remains strong.", 0, 4).into(),
        ],
        ..Default::default()
    };

    let report = pipeline().analyze(&input);
    let metrics = &report.sentence_metrics;

    assert_eq!(metrics.numeric_dense_sentences, 2);
    assert_eq!(metrics.narrative_sentences, 2);
    assert_eq!(metrics.density_by_position[0], 40.0);
    assert!((metrics.density_by_position[2] - 33.3).abs() < 0.1);
    assert!((metrics.mean_numeric_density - 18.3).abs() < 0.1);
    assert_eq!(metrics.top_dense_sentences[0].sentence, "Revenue was $1.5 billion.");
}

#[test]
fn test_empty_transcript_is_all_zero() {
    let report = pipeline().analyze(&TranscriptInput::default());
    let metrics = &report.sentence_metrics;

    assert_eq!(metrics.total_sentences, 0);
    assert_eq!(metrics.numeric_dense_sentences, 0);
    assert_eq!(metrics.narrative_sentences, 0);
    assert_eq!(metrics.mean_numeric_density, 0.0);
    assert_eq!(metrics.p75_density, 0.0);
    assert_eq!(metrics.proportion_narrative, 0.0);
    assert!(metrics.top_dense_sentences.is_empty());
    assert!(report.distribution.clusters.is_empty());
}

#[test]
fn test_floor_scores_scenario() {
    let input = TranscriptInput {
        sentences: counted(&[0, 0, 0, 0]),
        numerical_scores: NumericalScores::default(),
        ..Default::default()
    };

    let informativeness = pipeline().analyze(&input).informativeness;

    // Only the specificity floor contributes: 0.3 / 2.0 * 25
    assert!((informativeness.informativeness_score - 3.75).abs() < 1e-9);
    assert_eq!(informativeness.numeric_avoidance_risk, 70.0);
    assert_eq!(
        informativeness.quantitative_disclosure_level,
        DisclosureLevel::VeryLow
    );
    assert_eq!(informativeness.vs_sp500_informativeness, Benchmark::Below);
}

#[test]
fn test_bordered_dense_run_forms_one_cluster() {
    let input = TranscriptInput {
        sentences: counted(&[0, 0, 0, 15, 15, 15, 15, 15, 0, 0, 0]),
        ..Default::default()
    };

    let distribution = pipeline().analyze(&input).distribution;

    assert_eq!(distribution.cluster_count, 1);
    assert_eq!(distribution.clusters[0].start, 3);
    assert_eq!(distribution.clusters[0].end, 7);
    assert_eq!(distribution.clusters[0].mean_density, 15.0);
}

#[test]
fn test_constant_density_is_uniform() {
    let input = TranscriptInput {
        sentences: counted(&[6; 20]),
        ..Default::default()
    };

    let distribution = pipeline().analyze(&input).distribution;

    assert_eq!(distribution.coefficient_of_variation, 0.0);
    assert_eq!(distribution.pattern_type, PatternType::Uniform);
    assert_eq!(distribution.pattern_confidence, 0.9);
}

#[test]
fn test_front_loaded_prepared_remarks() {
    let mut densities = vec![20; 4];
    densities.extend(vec![1; 16]);
    let input = TranscriptInput {
        sentences: counted(&densities),
        ..Default::default()
    };

    let distribution = pipeline().analyze(&input).distribution;
    assert_eq!(distribution.pattern_type, PatternType::FrontLoaded);
    assert!(distribution.beginning_density > distribution.middle_density);
}

#[test]
fn test_sections_and_speakers() {
    let mut sections = BTreeMap::new();
    sections.insert(
        "Q&A".to_string(),
        "How did margins trend? Gross margin was 42% this quarter.".to_string(),
    );
    let mut speakers = BTreeMap::new();
    speakers.insert("CFO".to_string(), "Revenue was $4 billion.".to_string());
    speakers.insert("CEO".to_string(), "We are proud of the team.".to_string());

    let report = pipeline().analyze_text(
        "Revenue was $4 billion. We are proud of the team.",
        sections,
        speakers,
        NumericalScores::default(),
    );
    let distribution = &report.distribution;

    assert_eq!(distribution.question_avg_density, 0.0);
    assert!(distribution.answer_avg_density > 0.0);
    assert!(distribution.qa_density_differential > 0.0);
    assert_eq!(distribution.speaker_densities["CFO"], 25.0);
    assert_eq!(distribution.speaker_densities["CEO"], 0.0);

    let heatmap = report.render_heatmap(&HeatmapConfig::default());
    assert!(heatmap.contains("(answers more numeric)"));
    assert!(heatmap.find("CFO").unwrap() < heatmap.find("CEO").unwrap());
}

#[test]
fn test_negative_counts_do_not_abort() {
    let input = TranscriptInput {
        sentences: vec![
            SentenceTokens::new("Broken upstream count.", -3, 3).into(),
            SentenceTokens::new("Margins were 12%.", 1, 3).into(),
        ],
        ..Default::default()
    };

    let metrics = pipeline().analyze(&input).sentence_metrics;
    assert_eq!(metrics.density_by_position[0], 0.0);
    assert_eq!(metrics.narrative_sentences, 1);
    assert_eq!(metrics.numeric_dense_sentences, 1);
}

#[test]
fn test_repeated_runs_are_identical() {
    let json = r#"{
        "sentences": [
            "Revenue grew 8% to $4 billion.",
            "We opened 3 new plants.",
            "Thank you for joining us.",
            {"text": "Guidance is $5 to $6 per share.", "numeric_tokens": 2, "word_tokens": 7}
        ],
        "sections": {"Q&A": "What about capex? Capex was $900 million."},
        "speakers": {"CFO": "Capex was $900 million."},
        "numerical_scores": {
            "forward_looking_density": 2.5,
            "backward_looking_density": 4.0,
            "forward_to_backward_ratio": 0.6,
            "numerical_specificity_index": 1.2,
            "contextualization_quality_score": 0.7
        }
    }"#;
    let input: TranscriptInput = serde_json::from_str(json).unwrap();

    let first = pipeline().analyze(&input);
    let second = pipeline().analyze(&input);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    let layout = HeatmapConfig::default();
    assert_eq!(first.render_heatmap(&layout), second.render_heatmap(&layout));
}

#[test]
fn test_custom_thresholds_change_tiers() {
    let mut config = Config::default();
    config.density.dense_threshold = 50.0;
    config.density.moderate_threshold = 30.0;
    let pipeline = DensityPipeline::with_regex(config).unwrap();

    let input = TranscriptInput {
        sentences: vec![SentenceTokens::new("Revenue was $1.5 billion.", 2, 5).into()],
        ..Default::default()
    };

    let metrics = pipeline.analyze(&input).sentence_metrics;
    assert_eq!(metrics.numeric_dense_sentences, 0);
    assert_eq!(metrics.numeric_moderate_sentences, 1);
}
