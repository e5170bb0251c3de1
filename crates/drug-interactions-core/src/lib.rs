//! Drug Interactions Core Library
//!
//! Looks up known drug-pair interactions from a tabular dataset and reports severity,
//! dosage guidance and an alternative drug, optionally gated by patient age.
//!
//! # Architecture
//!
//! ```text
//!  Prescription text ──► Extraction strategy ──► (drug1, drug2, age?)
//!  (pattern | model)                                    │
//!                                                       ▼
//!  Dataset rows ──► InteractionStore ◄──── InteractionResolver ──► InteractionOutcome
//!                          │                  key + age match
//!                          ▼
//!                    add_interaction ──► InteractionSink (CSV)
//! ```
//!
//! # Selection policy
//!
//! The first record whose age specifier matches the queried age is reported. If none
//! matches, the pair's first record is reported anyway: a known interaction is never
//! hidden because of age. [`InteractionOutcome::Found`] carries `age_matched` so
//! callers can tell the two cases apart.
//!
//! # Modules
//!
//! - [`models`]: Domain types (AgeSpec, InteractionRecord, DrugPairKey, outcomes)
//! - [`store`]: In-memory store, CSV dataset loader, persistence sinks
//! - [`resolver`]: Pair normalization and record selection
//! - [`extract`]: Extraction strategies for prescription text
//! - [`checker`]: The user-facing facade
//! - [`config`]: Dataset paths and defaults

pub mod checker;
pub mod config;
pub mod extract;
pub mod models;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use checker::{CheckerError, DrugInteractionChecker, NewInteraction, PrescriptionOutcome};
pub use config::CheckerConfig;
pub use extract::{
    Extraction, ExtractionError, ExtractionMode, ExtractionResult, ExtractionStrategy,
    PatternExtractor,
};
pub use models::{
    normalize_drug_name, AgeSpec, DrugPairKey, InteractionOutcome, InteractionRecord,
    InteractionReport, Severity,
};
pub use resolver::InteractionResolver;
pub use store::{CsvSink, Dataset, DatasetRow, InteractionSink, InteractionStore, NullSink};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::PathBuf;
use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DrugInteractionsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<CheckerError> for DrugInteractionsError {
    fn from(e: CheckerError) -> Self {
        match e {
            CheckerError::InvalidInput(msg) => DrugInteractionsError::InvalidInput(msg),
            CheckerError::Persistence(_) => DrugInteractionsError::PersistenceError(e.to_string()),
            CheckerError::LockPoisoned(_) => DrugInteractionsError::InternalError(e.to_string()),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Load the dataset at `dataset_path`; additions are saved to `updated_dataset_path`.
///
/// Never fails on a bad dataset: the checker starts empty and
/// [`DrugInteractionsCore::load_warning`] reports why.
#[uniffi::export]
pub fn open_checker(
    dataset_path: String,
    updated_dataset_path: String,
) -> Arc<DrugInteractionsCore> {
    let config = CheckerConfig {
        dataset_path: PathBuf::from(dataset_path),
        updated_dataset_path: PathBuf::from(updated_dataset_path),
        ..CheckerConfig::default()
    };
    let (checker, load_error) = DrugInteractionChecker::open(&config);

    Arc::new(DrugInteractionsCore {
        checker,
        load_warning: load_error.map(|e| e.to_string()),
    })
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe checker wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DrugInteractionsCore {
    checker: DrugInteractionChecker,
    load_warning: Option<String>,
}

#[uniffi::export]
impl DrugInteractionsCore {
    /// Why the dataset could not be loaded, if it could not.
    pub fn load_warning(&self) -> Option<String> {
        self.load_warning.clone()
    }

    /// Sorted unique drug names from the dataset.
    pub fn list_drugs(&self) -> Vec<String> {
        self.checker.list_drugs().to_vec()
    }

    /// Check a drug pair for a patient of the given age.
    pub fn check_interaction(
        &self,
        drug1: String,
        drug2: String,
        age: u32,
    ) -> Result<FfiInteractionReport, DrugInteractionsError> {
        let report = self.checker.check_interaction(&drug1, &drug2, age)?;
        Ok(report.into())
    }

    /// Add an interaction. A persistence error means it is queryable but not saved.
    pub fn add_interaction(&self, item: FfiNewInteraction) -> Result<(), DrugInteractionsError> {
        self.checker.add_interaction(item.into())?;
        Ok(())
    }

    /// Extract two drugs from prescription text (pattern strategy) and check them.
    pub fn extract_and_check(
        &self,
        text: String,
    ) -> Result<FfiPrescriptionOutcome, DrugInteractionsError> {
        let outcome = self.checker.extract_and_check(&text, ExtractionMode::Pattern)?;
        Ok(outcome.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe interaction record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteraction {
    pub interaction: String,
    pub severity: String,
    pub dosage_recommendation: String,
    pub alternative: String,
    pub age: String,
}

impl From<InteractionRecord> for FfiInteraction {
    fn from(record: InteractionRecord) -> Self {
        Self {
            interaction: record.interaction,
            severity: record.severity,
            dosage_recommendation: record.dosage_recommendation,
            alternative: record.alternative,
            age: record.age.to_string(),
        }
    }
}

/// FFI-safe interaction report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteractionReport {
    pub drug1: String,
    pub drug2: String,
    pub age: u32,
    pub interaction: Option<FfiInteraction>,
    pub age_matched: bool,
    /// Rendered message for display
    pub message: String,
}

impl From<InteractionReport> for FfiInteractionReport {
    fn from(report: InteractionReport) -> Self {
        let message = report.to_string();
        let (interaction, age_matched) = match report.outcome {
            InteractionOutcome::NoInteraction => (None, false),
            InteractionOutcome::Found { record, age_matched } => (Some(record.into()), age_matched),
        };

        Self {
            drug1: report.drug1,
            drug2: report.drug2,
            age: report.age,
            interaction,
            age_matched,
            message,
        }
    }
}

/// FFI-safe new interaction.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewInteraction {
    pub drug1: String,
    pub drug2: String,
    pub interaction: String,
    pub severity: String,
    pub age: u32,
    pub dosage_recommendation: String,
    pub alternative: String,
}

impl From<FfiNewInteraction> for NewInteraction {
    fn from(item: FfiNewInteraction) -> Self {
        NewInteraction {
            drug1: item.drug1,
            drug2: item.drug2,
            interaction: item.interaction,
            severity: item.severity,
            age: item.age,
            dosage_recommendation: item.dosage_recommendation,
            alternative: item.alternative,
        }
    }
}

/// FFI-safe prescription check result.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiPrescriptionOutcome {
    Checked {
        report: FfiInteractionReport,
        drugs: Vec<String>,
        extracted_by: String,
    },
    ExtractionFailed {
        drugs: Vec<String>,
        reason: String,
    },
}

impl From<PrescriptionOutcome> for FfiPrescriptionOutcome {
    fn from(outcome: PrescriptionOutcome) -> Self {
        match outcome {
            PrescriptionOutcome::Checked {
                report,
                drugs,
                extracted_by,
            } => FfiPrescriptionOutcome::Checked {
                report: report.into(),
                drugs,
                extracted_by,
            },
            PrescriptionOutcome::ExtractionFailed { drugs, reason } => {
                FfiPrescriptionOutcome::ExtractionFailed { drugs, reason }
            }
        }
    }
}
