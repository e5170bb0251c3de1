//! User-facing operations over one shared store.
//!
//! [`DrugInteractionChecker`] owns the store behind a single mutex. Reads and adds
//! take the same lock, and an add holds it across the sink write so concurrent
//! sessions never interleave appends.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CheckerConfig;
use crate::extract::{Extraction, ExtractionMode, ExtractionStrategy, PatternExtractor};
use crate::models::{AgeSpec, InteractionRecord, InteractionReport};
use crate::resolver::InteractionResolver;
use crate::store::{
    CsvSink, Dataset, DatasetError, DatasetRow, InteractionSink, InteractionStore, NullSink,
    SinkError,
};

/// Checker errors.
#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The interaction was added in memory and stays queryable; only the durable write failed.
    #[error("Interaction added but not saved: {0}")]
    Persistence(#[from] SinkError),

    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<PoisonError<T>> for CheckerError {
    fn from(e: PoisonError<T>) -> Self {
        CheckerError::LockPoisoned(e.to_string())
    }
}

pub type CheckerResult<T> = Result<T, CheckerError>;

/// Input for [`DrugInteractionChecker::add_interaction`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInteraction {
    pub drug1: String,
    pub drug2: String,
    pub interaction: String,
    pub severity: String,
    pub age: u32,
    pub dosage_recommendation: String,
    pub alternative: String,
}

impl NewInteraction {
    /// All text fields except severity must be non-blank.
    fn validate(&self) -> CheckerResult<()> {
        let fields = [
            ("drug1", &self.drug1),
            ("drug2", &self.drug2),
            ("interaction", &self.interaction),
            ("dosage_recommendation", &self.dosage_recommendation),
            ("alternative", &self.alternative),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckerError::InvalidInput(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    fn to_record(&self) -> InteractionRecord {
        InteractionRecord {
            interaction: self.interaction.clone(),
            severity: self.severity.clone(),
            dosage_recommendation: self.dosage_recommendation.clone(),
            alternative: self.alternative.clone(),
            age: AgeSpec::from(self.age),
        }
    }

    fn to_row(&self) -> DatasetRow {
        DatasetRow {
            drug1: self.drug1.trim().to_string(),
            drug2: self.drug2.trim().to_string(),
            interaction: self.interaction.clone(),
            severity: self.severity.clone(),
            dosage_recommendation: self.dosage_recommendation.clone(),
            alternative: self.alternative.clone(),
            age: self.age.to_string(),
        }
    }
}

/// Result of a free-text prescription check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrescriptionOutcome {
    /// Two drugs were extracted and checked.
    Checked {
        report: InteractionReport,
        /// Every drug the strategy found; the first two were checked
        drugs: Vec<String>,
        extracted_by: String,
    },
    /// Fewer than two drugs were found. No check was attempted.
    ExtractionFailed { drugs: Vec<String>, reason: String },
}

/// The interaction checker: store, vocabulary, persistence and extraction strategies.
pub struct DrugInteractionChecker {
    store: Mutex<InteractionStore>,
    vocabulary: Vec<String>,
    sink: Box<dyn InteractionSink>,
    pattern: PatternExtractor,
    model: Option<Box<dyn ExtractionStrategy>>,
    default_age: u32,
}

impl DrugInteractionChecker {
    /// Load the configured dataset and persist additions to the configured CSV.
    ///
    /// A dataset that cannot be loaded is not fatal: the checker comes up empty and
    /// the load error is handed back for the caller to surface as a warning.
    pub fn open(config: &CheckerConfig) -> (Self, Option<DatasetError>) {
        let sink = CsvSink::new(&config.dataset_path, &config.updated_dataset_path);

        let (dataset, load_error) = match Dataset::from_path(&config.dataset_path) {
            Ok(dataset) => (dataset, None),
            Err(e) => {
                tracing::warn!(
                    path = %config.dataset_path.display(),
                    error = %e,
                    "Dataset load failed; starting with an empty store"
                );
                (Dataset::default(), Some(e))
            }
        };

        let checker = Self::from_dataset(dataset)
            .with_sink(sink)
            .with_default_age(config.default_age);
        (checker, load_error)
    }

    /// Build an in-memory checker. Additions are not persisted until a sink is set.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let vocabulary = dataset.vocabulary();
        let pattern = PatternExtractor::new(vocabulary.iter().cloned());
        let store = dataset.into_store();

        tracing::info!(
            drugs = vocabulary.len(),
            pairs = store.len(),
            records = store.record_count(),
            "Interaction checker ready"
        );

        Self {
            store: Mutex::new(store),
            vocabulary,
            sink: Box::new(NullSink),
            pattern,
            model: None,
            default_age: crate::config::DEFAULT_AGE,
        }
    }

    pub fn with_sink(mut self, sink: impl InteractionSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Enable [`ExtractionMode::Model`].
    pub fn with_model_extractor(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.model = Some(Box::new(strategy));
        self
    }

    pub fn with_default_age(mut self, age: u32) -> Self {
        self.default_age = age;
        self
    }

    pub fn default_age(&self) -> u32 {
        self.default_age
    }

    pub fn has_model_extractor(&self) -> bool {
        self.model.is_some()
    }

    fn store(&self) -> CheckerResult<MutexGuard<'_, InteractionStore>> {
        Ok(self.store.lock()?)
    }

    /// Sorted unique drug names from the dataset. Fixed at construction.
    pub fn list_drugs(&self) -> &[String] {
        &self.vocabulary
    }

    /// Check a drug pair for a patient of the given age.
    pub fn check_interaction(&self, drug1: &str, drug2: &str, age: u32) -> CheckerResult<InteractionReport> {
        let store = self.store()?;
        let outcome = InteractionResolver::new(&store).check(drug1, drug2, age);

        Ok(InteractionReport {
            drug1: drug1.to_string(),
            drug2: drug2.to_string(),
            age,
            outcome,
        })
    }

    /// Add an interaction and persist it.
    ///
    /// The in-memory add is not rolled back when persistence fails: the record stays
    /// queryable and the error reports only the failed write.
    pub fn add_interaction(&self, new: NewInteraction) -> CheckerResult<()> {
        new.validate()?;

        let mut store = self.store()?;
        store.add(&new.drug1, &new.drug2, new.to_record());
        tracing::info!(drug1 = %new.drug1.trim(), drug2 = %new.drug2.trim(), age = new.age, "Interaction added");

        if let Err(e) = self.sink.append(&new.to_row()) {
            tracing::warn!(error = %e, "Interaction kept in memory but not persisted");
            return Err(e.into());
        }
        Ok(())
    }

    /// Extract drugs (and maybe an age) from prescription text and check the first two.
    pub fn extract_and_check(&self, text: &str, mode: ExtractionMode) -> CheckerResult<PrescriptionOutcome> {
        let strategy: Option<&dyn ExtractionStrategy> = match mode {
            ExtractionMode::Pattern => Some(&self.pattern),
            ExtractionMode::Model => self.model.as_deref(),
        };

        let Some(strategy) = strategy else {
            tracing::warn!("Model extraction requested but no model strategy is configured");
            return Ok(PrescriptionOutcome::ExtractionFailed {
                drugs: Vec::new(),
                reason: "model extraction is not configured".into(),
            });
        };

        let (extraction, failure) = match strategy.extract(text) {
            Ok(extraction) => (extraction, None),
            Err(e) => {
                tracing::warn!(strategy = strategy.name(), error = %e, "Extraction failed");
                (Extraction::default(), Some(e.to_string()))
            }
        };

        let Some((drug1, drug2)) = extraction.first_pair() else {
            let reason = match failure {
                Some(err) => format!("could not extract at least two drugs ({})", err),
                None => "could not extract at least two drugs".to_string(),
            };
            return Ok(PrescriptionOutcome::ExtractionFailed {
                drugs: extraction.drugs.clone(),
                reason,
            });
        };

        let age = extraction.age.unwrap_or(self.default_age);
        let report = self.check_interaction(drug1, drug2, age)?;

        Ok(PrescriptionOutcome::Checked {
            report,
            drugs: extraction.drugs.clone(),
            extracted_by: strategy.name().to_string(),
        })
    }
}
