//! Check command implementation
//!
//! Validates the resolved configuration and confirms that a plan can be
//! built from it.

use std::path::Path;

use survey_psychometric::build_psychometric_plan;
use tracing::{info, warn};

use crate::config::QuestionnaireConfig;
use crate::{CliError, Result};

/// Outcome of a successful check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub questions: usize,
    pub items: usize,
    pub reverse_items: usize,
    pub rho: f64,
    pub sigma_e: f64,
}

/// Validates `config` and builds its plan.
pub fn check_config(config: &QuestionnaireConfig) -> Result<CheckSummary> {
    config.validate()?;
    let plan = build_psychometric_plan(config.psychometric_items(), config.target_alpha)?;
    Ok(CheckSummary {
        questions: config.questions.len(),
        items: plan.len(),
        reverse_items: config.reverse_keys().len(),
        rho: plan.rho(),
        sigma_e: plan.sigma_e(),
    })
}

/// Run the check command
pub fn run(config: &QuestionnaireConfig, config_path: &Path, verbose: bool) -> Result<()> {
    info!("Checking configuration...");

    if config_path.exists() {
        info!("  Config file: {}", config_path.display());
    } else {
        warn!(
            "  Config file {} not found, using defaults and environment",
            config_path.display()
        );
    }

    let summary = check_config(config)?;

    println!("Configuration OK");
    println!("  Questions          : {}", summary.questions);
    println!("  Reliability items  : {}", summary.items);
    println!("  Reverse-scored     : {}", summary.reverse_items);
    println!("  Target alpha       : {:.4}", config.target_alpha);
    println!("  rho / sigma_e      : {:.6} / {:.6}", summary.rho, summary.sigma_e);

    if verbose {
        let resolved = toml::to_string_pretty(config)
            .map_err(|e| CliError::Serialisation(e.to_string()))?;
        println!("\n# Resolved configuration\n{}", resolved);
    }

    info!("Check complete");
    Ok(())
}
