//! Checker configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Env var overriding [`CheckerConfig::dataset_path`].
pub const ENV_DATASET: &str = "DRUG_INTERACTIONS_DATASET";
/// Env var overriding [`CheckerConfig::updated_dataset_path`].
pub const ENV_UPDATED_DATASET: &str = "DRUG_INTERACTIONS_UPDATED_DATASET";
/// Env var overriding [`CheckerConfig::default_age`].
pub const ENV_DEFAULT_AGE: &str = "DRUG_INTERACTIONS_DEFAULT_AGE";

/// Age assumed when extraction yields none.
pub const DEFAULT_AGE: u32 = 25;

/// Where the dataset lives and how unspecified ages are filled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckerConfig {
    /// Original dataset, read once at startup and never written
    pub dataset_path: PathBuf,
    /// Destination for added interactions (original rows + additions)
    pub updated_dataset_path: PathBuf,
    /// Age used for prescription checks when none was extracted
    pub default_age: u32,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("drug_interactions.csv"),
            updated_dataset_path: PathBuf::from("drug_interactions_updated.csv"),
            default_age: DEFAULT_AGE,
        }
    }
}

impl CheckerConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATASET) {
            self.dataset_path = path.into();
        }
        if let Some(path) = lookup(ENV_UPDATED_DATASET) {
            self.updated_dataset_path = path.into();
        }
        if let Some(age) = lookup(ENV_DEFAULT_AGE) {
            match age.trim().parse() {
                Ok(age) => self.default_age = age,
                Err(e) => {
                    tracing::warn!(value = %age, error = %e, "Ignoring invalid {}", ENV_DEFAULT_AGE)
                }
            }
        }
        self
    }
}
