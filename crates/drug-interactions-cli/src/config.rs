//! Application configuration: file, then environment, then flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use drug_interactions_core::CheckerConfig;
use drug_interactions_llm::InferenceConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub checker: CheckerConfig,
    pub inference: InferenceConfig,
}

impl AppConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Resolve the effective configuration for this invocation.
    pub fn load(cli: &Cli) -> Result<Self> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let mut config = Self {
            checker: base.checker.with_env_overrides(),
            inference: base.inference.with_env_overrides(),
        };

        if let Some(path) = &cli.dataset {
            config.checker.dataset_path = path.clone();
        }
        if let Some(path) = &cli.updated_dataset {
            config.checker.updated_dataset_path = path.clone();
        }

        Ok(config)
    }
}
