use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "txoutd.toml";
pub const DEFAULT_LOG_FILTER: &str = "txoutd=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Hex,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub log_filter: String,
    pub input_format: InputFormat,
    pub json_output: bool,
    /// Exit with an error on the first malformed record
    pub stop_on_error: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            input_format: InputFormat::Hex,
            json_output: false,
            stop_on_error: true,
        }
    }
}

impl DecoderConfig {
    /// Load from `config_path`, or `txoutd.toml` if it exists, else defaults.
    /// An explicitly given path must exist.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config_file = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        if config_path.is_none() && !Path::new(config_file).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read config {}", config_file))?;
        Self::from_toml(&content).with_context(|| format!("invalid config {}", config_file))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, config_path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        tracing::info!("Wrote config to {}", config_path);
        Ok(())
    }
}
