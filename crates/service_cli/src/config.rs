//! Questionnaire configuration management
//!
//! Handles loading configuration from a TOML file, `SURVEY_*` environment
//! variables and command-line overrides.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use survey_core::types::ItemKey;
use survey_psychometric::{
    collect_psychometric_items, reverse_item_keys, PsychometricItem, QuestionConfig,
};
use thiserror::Error;

/// Prefix of environment variables read by [`load_config`].
pub const ENV_PREFIX: &str = "SURVEY";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid target alpha: {0}. Must lie strictly between 0 and 1")]
    InvalidTargetAlpha(f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Question {0} is configured more than once")]
    DuplicateQuestion(usize),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Log levels accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Questionnaire and run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireConfig {
    /// Reliability the generated answers should reach
    pub target_alpha: f64,
    /// Respondents generated by `simulate`
    pub respondents: usize,
    /// Master seed of the respondent streams
    pub seed: u64,
    /// Log level used when `RUST_LOG` is unset
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Question settings in questionnaire order
    pub questions: Vec<QuestionConfig>,
}

impl Default for QuestionnaireConfig {
    fn default() -> Self {
        Self {
            target_alpha: 0.85,
            respondents: 1000,
            seed: 42,
            log_level: LogLevel::Info,
            questions: Vec::new(),
        }
    }
}

impl QuestionnaireConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_alpha > 0.0 && self.target_alpha < 1.0) {
            return Err(ConfigError::InvalidTargetAlpha(self.target_alpha));
        }

        let mut seen = BTreeSet::new();
        for question in &self.questions {
            if !seen.insert(question.question_index) {
                return Err(ConfigError::DuplicateQuestion(question.question_index));
            }
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) -> Result<(), ConfigError> {
        if let Some(alpha) = cli.target_alpha {
            self.target_alpha = alpha;
        }
        if let Some(respondents) = cli.respondents {
            self.respondents = respondents;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        Ok(())
    }

    /// Reliability items of the enabled questions
    pub fn psychometric_items(&self) -> Vec<PsychometricItem> {
        collect_psychometric_items(&self.questions)
    }

    /// Keys of the reverse-scored reliability items
    pub fn reverse_keys(&self) -> BTreeSet<ItemKey> {
        reverse_item_keys(&self.questions)
    }
}

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub target_alpha: Option<f64>,
    pub respondents: Option<usize>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
}

/// Layer optional TOML text under the `SURVEY_*` environment variables.
pub fn load_from_str(toml: Option<&str>) -> Result<QuestionnaireConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(content) = toml {
        builder = builder.add_source(File::from_str(content, FileFormat::Toml));
    }
    let settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;
    Ok(settings.try_deserialize()?)
}

/// Load file and environment layers; a missing file is not an error.
pub fn load_config(path: &Path) -> Result<QuestionnaireConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => load_from_str(Some(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => load_from_str(None),
        Err(e) => Err(ConfigError::FileError(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(path: &Path, cli: &CliOverrides) -> Result<QuestionnaireConfig, ConfigError> {
    let mut config = load_config(path)?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::types::{Bias, ItemType};

    const SAMPLE: &str = r#"
target_alpha = 0.8
respondents = 250
log_level = "debug"

[[questions]]
question_index = 0
type = "scale"
option_count = 5
psycho_enabled = true
psycho_bias = "left"

[[questions]]
question_index = 1
type = "matrix"
option_count = 4
rows = 3
psycho_enabled = true
reverse = true

[[questions]]
question_index = 2
type = "single"
option_count = 3
"#;

    #[test]
    fn test_default_config() {
        let config = QuestionnaireConfig::default();
        assert_eq!(config.target_alpha, 0.85);
        assert_eq!(config.respondents, 1000);
        assert_eq!(config.seed, 42);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.questions.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_str() {
        let config = load_from_str(Some(SAMPLE)).unwrap();
        config.validate().unwrap();
        assert_eq!(config.target_alpha, 0.8);
        assert_eq!(config.respondents, 250);
        assert_eq!(config.seed, 42);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.questions.len(), 3);
        assert_eq!(config.questions[0].psycho_bias, Bias::Left);
        assert_eq!(config.questions[1].item_type, ItemType::Matrix);

        // 1 scale item + 3 matrix rows; the single choice question is disabled
        assert_eq!(config.psychometric_items().len(), 4);
        let reverse = config.reverse_keys();
        assert_eq!(reverse.len(), 3);
        assert!(reverse.contains(&ItemKey::matrix_row(1, 2)));
    }

    #[test]
    fn test_invalid_values() {
        let out_of_range = load_from_str(Some("target_alpha = 1.0")).unwrap();
        assert!(matches!(
            out_of_range.validate(),
            Err(ConfigError::InvalidTargetAlpha(_))
        ));
        assert!(matches!(
            load_from_str(Some("log_level = \"loud\"")),
            Err(ConfigError::Source(_))
        ));
        assert!(matches!(
            load_from_str(Some("target_alpha = [")),
            Err(ConfigError::Source(_))
        ));

        let mut config = load_from_str(Some(SAMPLE)).unwrap();
        config.questions[2].question_index = 0;
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateQuestion(0))));
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("verbose".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_merge_with_cli() {
        let mut config = QuestionnaireConfig::default();
        let cli = CliOverrides {
            target_alpha: Some(0.7),
            respondents: Some(10),
            seed: None,
            log_level: Some("warn".to_string()),
        };
        config.merge_with_cli(&cli).unwrap();
        assert_eq!(config.target_alpha, 0.7);
        assert_eq!(config.respondents, 10);
        assert_eq!(config.seed, 42);
        assert_eq!(config.log_level, LogLevel::Warn);

        let bad = CliOverrides {
            log_level: Some("shout".to_string()),
            ..Default::default()
        };
        assert!(config.merge_with_cli(&bad).is_err());
    }

    #[test]
    fn test_build_config_from_file() {
        let path = std::env::temp_dir().join(format!("survey-config-{}.toml", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();

        let cli = CliOverrides {
            seed: Some(7),
            ..Default::default()
        };
        let result = build_config(&path, &cli);
        std::fs::remove_file(&path).ok();

        let config = result.unwrap();
        assert_eq!(config.respondents, 250);
        assert_eq!(config.seed, 7);
        assert_eq!(config.questions.len(), 3);
        assert_eq!(config.questions[1].rows, 3);
    }

    #[test]
    fn test_unreadable_config_path() {
        // A directory exists but cannot be read as a file
        let dir = std::env::temp_dir();
        assert!(matches!(load_config(&dir), Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = load_config(Path::new("does-not-exist/survey.toml")).unwrap();
        assert!(config.questions.is_empty());
    }

    #[test]
    fn test_build_config_rejects_cli_alpha() {
        let path = Path::new("does-not-exist/survey.toml");
        let cli = CliOverrides {
            target_alpha: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            build_config(path, &cli),
            Err(ConfigError::InvalidTargetAlpha(_))
        ));
    }
}
