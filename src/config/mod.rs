pub mod cli;
pub mod toml_config;

use crate::adapters::http::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use crate::core::batch::{DEFAULT_PAUSE_DURATION, DEFAULT_PAUSE_INTERVAL};
use crate::core::prompt::PromptBuilder;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_INPUT_PATH: &str = "data/2024全年表振动噪音-筛选_增强版2.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/处理结果_地铁投诉分析.csv";

const TABLE_EXTENSIONS: &[&str] = &["csv", "tsv"];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "metro-complaints")]
#[command(about = "Extract metro line, location, noise and vibration types from complaint records with a local LLM")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Input complaint table (.csv or .tsv; export .xlsx sheets to CSV first)
    #[arg(long)]
    pub input_path: Option<String>,

    /// Output result table (.csv or .tsv, open the CSV in a spreadsheet for .xlsx)
    #[arg(long)]
    pub output_path: Option<String>,

    /// Model identifier served by LM Studio
    #[arg(long)]
    pub model: Option<String>,

    /// LM Studio OpenAI-compatible base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Pause after this many records (0 disables pacing)
    #[arg(long)]
    pub pause_interval: Option<usize>,

    /// Pause length in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Prompt template file containing a {content} placeholder
    #[arg(long)]
    pub prompt_file: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Hide the progress bar")]
    pub no_progress: bool,
}

/// Fully resolved settings: command line over TOML file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub input_path: String,
    pub output_path: String,
    pub model_identifier: String,
    pub base_url: String,
    pub batch_pause_interval: usize,
    pub batch_pause_duration: Duration,
    pub request_timeout: Duration,
    pub prompt_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_INPUT_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            model_identifier: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            batch_pause_interval: DEFAULT_PAUSE_INTERVAL,
            batch_pause_duration: DEFAULT_PAUSE_DURATION,
            request_timeout: DEFAULT_TIMEOUT,
            prompt_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml(file: &TomlConfig) -> Self {
        let mut config = Self::default();

        if let Some(path) = file.input_path() {
            config.input_path = path.to_string();
        }
        if let Some(path) = file.output_path() {
            config.output_path = path.to_string();
        }
        if let Some(model) = &file.model {
            if let Some(identifier) = &model.identifier {
                config.model_identifier = identifier.clone();
            }
            if let Some(base_url) = &model.base_url {
                config.base_url = base_url.clone();
            }
            if let Some(secs) = model.timeout_seconds {
                config.request_timeout = Duration::from_secs(secs);
            }
        }
        if let Some(pacing) = &file.pacing {
            if let Some(interval) = pacing.interval {
                config.batch_pause_interval = interval;
            }
            if let Some(ms) = pacing.pause_ms {
                config.batch_pause_duration = Duration::from_millis(ms);
            }
        }
        if let Some(prompt) = &file.prompt {
            config.prompt_file = prompt.template_file.clone();
        }

        config
    }

    #[cfg(feature = "cli")]
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let base = match &args.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                Self::from_toml(&TomlConfig::from_file(path)?)
            }
            None => Self::default(),
        };
        Ok(base.with_overrides(args))
    }

    #[cfg(feature = "cli")]
    pub fn with_overrides(mut self, args: &CliArgs) -> Self {
        if let Some(path) = &args.input_path {
            self.input_path = path.clone();
        }
        if let Some(path) = &args.output_path {
            self.output_path = path.clone();
        }
        if let Some(model) = &args.model {
            self.model_identifier = model.clone();
        }
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(interval) = args.pause_interval {
            self.batch_pause_interval = interval;
        }
        if let Some(ms) = args.pause_ms {
            self.batch_pause_duration = Duration::from_millis(ms);
        }
        if let Some(secs) = args.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = &args.prompt_file {
            self.prompt_file = Some(path.clone());
        }
        self
    }

    pub fn prompt_builder(&self) -> Result<PromptBuilder> {
        match &self.prompt_file {
            Some(path) => PromptBuilder::from_file(path),
            None => Ok(PromptBuilder::default()),
        }
    }
}

impl ConfigProvider for AppConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn batch_pause_interval(&self) -> usize {
        self.batch_pause_interval
    }

    fn batch_pause_duration(&self) -> Duration {
        self.batch_pause_duration
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input.path", &self.input_path)?;
        validation::validate_file_extension("input.path", &self.input_path, TABLE_EXTENSIONS)?;
        validation::validate_path("output.path", &self.output_path)?;
        validation::validate_file_extension("output.path", &self.output_path, TABLE_EXTENSIONS)?;

        if self.input_path == self.output_path {
            return Err(EtlError::InvalidConfigValueError {
                field: "output.path".to_string(),
                value: self.output_path.clone(),
                reason: "Output would overwrite the input table".to_string(),
            });
        }

        validation::validate_non_empty_string("model.identifier", &self.model_identifier)?;
        validation::validate_url("model.base_url", &self.base_url)?;
        validation::validate_positive_number(
            "model.timeout_seconds",
            self.request_timeout.as_secs(),
            1,
        )?;

        if let Some(path) = &self.prompt_file {
            validation::validate_path("prompt.template_file", path)?;
        }

        Ok(())
    }
}
