//! Plan command implementation
//!
//! Builds the psychometric plan from the configured questions and prints
//! its parameters.

use serde::Serialize;
use survey_core::types::{Bias, ItemType};
use survey_psychometric::{build_psychometric_plan, PsychometricPlan};
use tracing::info;

use super::column_label;
use crate::config::QuestionnaireConfig;
use crate::{CliError, Result};

/// Serialisable view of a plan.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub target_alpha: f64,
    pub implied_alpha: f64,
    pub rho: f64,
    pub sigma_e: f64,
    pub items: Vec<PlanItemReport>,
}

/// One plan item with its cut points and model-implied category shares.
#[derive(Debug, Serialize)]
pub struct PlanItemReport {
    pub item: String,
    pub item_type: ItemType,
    pub option_count: usize,
    pub bias: Bias,
    pub thresholds: Vec<f64>,
    pub expected_proportions: Vec<f64>,
}

impl PlanReport {
    pub fn from_plan(plan: &PsychometricPlan) -> Self {
        let items = plan
            .items()
            .iter()
            .map(|planned| PlanItemReport {
                item: column_label(planned.key()),
                item_type: planned.item().item_type,
                option_count: planned.option_count(),
                bias: planned.item().bias,
                thresholds: planned.thresholds().to_vec(),
                expected_proportions: planned.expected_proportions(plan.sigma_e()),
            })
            .collect();

        Self {
            target_alpha: plan.target_alpha(),
            implied_alpha: plan.implied_alpha(),
            rho: plan.rho(),
            sigma_e: plan.sigma_e(),
            items,
        }
    }
}

fn format_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.4}", v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_table(report: &PlanReport) {
    println!("Target alpha : {:.4}", report.target_alpha);
    println!("rho          : {:.6}", report.rho);
    println!("sigma_e      : {:.6}", report.sigma_e);
    println!();
    println!("{:<8} {:<9} {:>7} {:<7} Thresholds", "Item", "Type", "Options", "Bias");
    for item in &report.items {
        println!(
            "{:<8} {:<9} {:>7} {:<7} [{}]",
            item.item,
            item.item_type.as_str(),
            item.option_count,
            item.bias.as_str(),
            format_list(&item.thresholds)
        );
        println!("{:<34} p = [{}]", "", format_list(&item.expected_proportions));
    }
}

/// Run the plan command
pub fn run(config: &QuestionnaireConfig, format: &str) -> Result<()> {
    if !matches!(format, "table" | "json") {
        return Err(CliError::InvalidArgument(format!(
            "Unknown format: {}. Supported: table, json",
            format
        )));
    }

    info!("Building psychometric plan...");
    info!("  Target alpha: {}", config.target_alpha);
    info!("  Questions: {}", config.questions.len());

    let plan = build_psychometric_plan(config.psychometric_items(), config.target_alpha)?;
    let report = PlanReport::from_plan(&plan);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }

    info!("Plan complete");
    Ok(())
}
