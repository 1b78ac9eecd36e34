//! Simulate command implementation
//!
//! Generates calibrated responses in parallel and compares the observed
//! Cronbach's Alpha with the target.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use survey_core::types::ItemKey;
use survey_psychometric::batch::generate_responses;
use survey_psychometric::reliability::{cronbach_alpha, ResponseMatrix};
use survey_psychometric::{build_psychometric_plan, PsychometricPlan};
use tracing::info;

use super::column_label;
use crate::config::QuestionnaireConfig;
use crate::{CliError, Result};

/// Per-item tally of chosen options.
#[derive(Debug, Serialize)]
pub struct ItemSummary {
    pub item: String,
    pub reverse: bool,
    pub option_counts: Vec<usize>,
}

/// JSON report of a simulation run.
#[derive(Debug, Serialize)]
pub struct SimulationReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub respondents: usize,
    pub target_alpha: f64,
    /// Alpha after reverse-scored items are scored back
    pub observed_alpha: Option<f64>,
    /// Alpha of the answer indices as generated
    pub raw_alpha: Option<f64>,
    pub mean_inter_item_correlation: Option<f64>,
    pub items: Vec<ItemSummary>,
    pub responses: &'a [Vec<usize>],
}

/// Alpha with reverse-scored columns mapped back onto the forward scale.
pub fn scored_alpha(
    plan: &PsychometricPlan,
    matrix: &ResponseMatrix,
    reverse: &BTreeSet<ItemKey>,
) -> Option<f64> {
    let top: Vec<Option<usize>> = matrix
        .columns()
        .iter()
        .map(|key| {
            if reverse.contains(key) {
                plan.item(*key).map(|item| item.option_count() - 1)
            } else {
                None
            }
        })
        .collect();

    let scores: Vec<Vec<f64>> = matrix
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&top)
                .map(|(&answer, top)| match top {
                    Some(top) => top.saturating_sub(answer) as f64,
                    None => answer as f64,
                })
                .collect()
        })
        .collect();
    cronbach_alpha(&scores)
}

fn item_summaries(matrix: &ResponseMatrix, reverse: &BTreeSet<ItemKey>) -> Vec<ItemSummary> {
    matrix
        .columns()
        .iter()
        .map(|&key| ItemSummary {
            item: column_label(key),
            reverse: reverse.contains(&key),
            option_counts: matrix.option_counts(key).unwrap_or_default(),
        })
        .collect()
}

fn write_csv<W: Write>(writer: W, matrix: &ResponseMatrix) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(matrix.columns().iter().map(|&key| column_label(key)))?;
    for row in matrix.rows() {
        csv.write_record(row.iter().map(|answer| answer.to_string()))?;
    }
    csv.flush()?;
    Ok(())
}

fn format_alpha(alpha: Option<f64>) -> String {
    alpha.map_or_else(|| "n/a".to_string(), |a| format!("{:.4}", a))
}

fn write_table<W: Write>(
    mut writer: W,
    report: &SimulationReport<'_>,
    matrix: &ResponseMatrix,
) -> Result<()> {
    writeln!(writer, "Respondents    : {}", report.respondents)?;
    writeln!(writer, "Seed           : {}", report.seed)?;
    writeln!(writer, "Target alpha   : {:.4}", report.target_alpha)?;
    writeln!(writer, "Observed alpha : {}", format_alpha(report.observed_alpha))?;
    writeln!(writer, "Raw alpha      : {}", format_alpha(report.raw_alpha))?;
    writeln!(
        writer,
        "Mean inter-item r : {}",
        format_alpha(report.mean_inter_item_correlation)
    )?;
    writeln!(writer)?;
    writeln!(writer, "{:<8} {:<4} Option share (%)", "Item", "Rev")?;
    for (summary, &key) in report.items.iter().zip(matrix.columns()) {
        let shares: Vec<String> = (0..summary.option_counts.len())
            .map(|option| format!("{:5.1}", matrix.option_percentage(key, option).unwrap_or(0.0)))
            .collect();
        writeln!(
            writer,
            "{:<8} {:<4} {}",
            summary.item,
            if summary.reverse { "yes" } else { "" },
            shares.join(" ")
        )?;
    }
    Ok(())
}

/// Run the simulate command
pub fn run(config: &QuestionnaireConfig, output: Option<&Path>, format: &str) -> Result<()> {
    if !matches!(format, "table" | "csv" | "json") {
        return Err(CliError::InvalidArgument(format!(
            "Unknown format: {}. Supported: table, csv, json",
            format
        )));
    }

    info!("Starting simulation...");
    info!("  Respondents: {}", config.respondents);
    info!("  Seed: {}", config.seed);
    info!("  Target alpha: {}", config.target_alpha);

    let plan = build_psychometric_plan(config.psychometric_items(), config.target_alpha)?;
    let reverse = config.reverse_keys();
    let matrix = generate_responses(&plan, config.respondents, config.seed, &reverse)?;

    let report = SimulationReport {
        generated_at: Utc::now(),
        seed: config.seed,
        respondents: matrix.respondents(),
        target_alpha: plan.target_alpha(),
        observed_alpha: scored_alpha(&plan, &matrix, &reverse),
        raw_alpha: matrix.alpha(),
        mean_inter_item_correlation: matrix.mean_inter_item_correlation(),
        items: item_summaries(&matrix, &reverse),
        responses: matrix.rows(),
    };
    info!(
        "Observed alpha {} against target {:.4}",
        format_alpha(report.observed_alpha),
        report.target_alpha
    );

    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            info!("  Writing {} output to {}", format, path.display());
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        "csv" => write_csv(&mut writer, &matrix)?,
        "json" => {
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
        _ => write_table(&mut writer, &report, &matrix)?,
    }
    writer.flush()?;

    info!("Simulation complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::types::{Bias, ItemType};
    use survey_psychometric::QuestionConfig;

    fn config(reverse: bool) -> QuestionnaireConfig {
        let questions = (0..6)
            .map(|q| QuestionConfig {
                question_index: q,
                item_type: ItemType::Scale,
                option_count: 5,
                rows: 0,
                psycho_enabled: true,
                psycho_bias: Bias::Center,
                reverse: reverse && q % 3 == 0,
            })
            .collect();
        QuestionnaireConfig {
            respondents: 3_000,
            questions,
            ..QuestionnaireConfig::default()
        }
    }

    #[test]
    fn test_scored_alpha_undoes_reverse_items() {
        let config = config(true);
        let plan = build_psychometric_plan(config.psychometric_items(), config.target_alpha).unwrap();
        let reverse = config.reverse_keys();
        let matrix = generate_responses(&plan, config.respondents, config.seed, &reverse).unwrap();

        let raw = matrix.alpha().unwrap();
        let scored = scored_alpha(&plan, &matrix, &reverse).unwrap();
        assert!(scored > raw);
        assert!((scored - 0.85).abs() < 0.07, "scored alpha = {}", scored);

        // Without reverse keys both views agree
        assert_eq!(scored_alpha(&plan, &matrix, &BTreeSet::new()), matrix.alpha());
    }

    #[test]
    fn test_csv_output() {
        let mut config = config(false);
        config.respondents = 4;
        let plan = build_psychometric_plan(config.psychometric_items(), config.target_alpha).unwrap();
        let matrix = generate_responses(&plan, config.respondents, 1, &BTreeSet::new()).unwrap();

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &matrix).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "q0,q1,q2,q3,q4,q5");
        assert_eq!(lines[1].split(',').count(), 6);
    }

    #[test]
    fn test_json_report_fields() {
        let mut config = config(true);
        config.respondents = 10;
        let plan = build_psychometric_plan(config.psychometric_items(), config.target_alpha).unwrap();
        let reverse = config.reverse_keys();
        let matrix = generate_responses(&plan, config.respondents, 3, &reverse).unwrap();
        let report = SimulationReport {
            generated_at: Utc::now(),
            seed: 3,
            respondents: matrix.respondents(),
            target_alpha: plan.target_alpha(),
            observed_alpha: scored_alpha(&plan, &matrix, &reverse),
            raw_alpha: matrix.alpha(),
            mean_inter_item_correlation: matrix.mean_inter_item_correlation(),
            items: item_summaries(&matrix, &reverse),
            responses: matrix.rows(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["generated_at"].is_string());
        assert_eq!(json["responses"].as_array().unwrap().len(), 10);
        assert_eq!(json["items"][0]["reverse"], true);
        assert_eq!(json["items"][1]["reverse"], false);
        let tally: u64 = json["items"][2]["option_counts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(tally, 10);

        let mut table = Vec::new();
        write_table(&mut table, &report, &matrix).unwrap();
        assert!(String::from_utf8(table).unwrap().contains("Target alpha   : 0.8500"));
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            run(&config(false), None, "parquet"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_writes_output_file() {
        let mut config = config(false);
        config.respondents = 5;
        let path = std::env::temp_dir().join(format!("survey-simulate-{}.csv", std::process::id()));
        run(&config, Some(&path), "csv").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(content.lines().count(), 6);
    }
}
