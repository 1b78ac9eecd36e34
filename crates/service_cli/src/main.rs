//! Survey CLI - Calibrated Answer Generation
//!
//! Operational entry point for the survey workspace.
//!
//! # Commands
//!
//! - `survey plan` - Build the psychometric plan and show its parameters
//! - `survey simulate` - Generate calibrated responses and score them
//! - `survey check` - Validate the questionnaire configuration
//!
//! # Configuration
//!
//! Settings are read from `survey.toml` (or `--config`), then `SURVEY_*`
//! environment variables, then command-line flags.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{build_config, CliOverrides, LogLevel};

/// Survey answer generation CLI
#[derive(Parser)]
#[command(name = "survey")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "survey.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Target Cronbach's Alpha
    #[arg(short = 'a', long, global = true)]
    target_alpha: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the psychometric plan and print its parameters
    Plan {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Generate calibrated responses and report the observed Alpha
    Simulate {
        /// Number of respondents
        #[arg(short = 'n', long)]
        respondents: Option<usize>,

        /// Master random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Validate the configuration and report the item count
    Check,
}

fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (respondents, seed) = match &cli.command {
        Commands::Simulate {
            respondents, seed, ..
        } => (*respondents, *seed),
        _ => (None, None),
    };
    let overrides = CliOverrides {
        target_alpha: cli.target_alpha,
        respondents,
        seed,
        log_level: cli.log_level.clone(),
    };

    let config = build_config(&cli.config, &overrides)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    init_tracing(if cli.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    });

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Plan { format } => commands::plan::run(&config, &format)?,
        Commands::Simulate { output, format, .. } => {
            commands::simulate::run(&config, output.as_deref(), &format)?
        }
        Commands::Check => commands::check::run(&config, &cli.config, cli.verbose)?,
    }
    Ok(())
}
