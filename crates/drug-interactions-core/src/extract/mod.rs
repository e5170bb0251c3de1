//! Prescription text extraction.
//!
//! Two interchangeable strategies turn free text into a candidate drug list and an
//! optional patient age:
//!
//! - [`PatternExtractor`]: dosage-notation regex plus a vocabulary fallback. Always available.
//! - A model-backed strategy supplied by the caller (see the `drug-interactions-llm` crate).
//!
//! Both feed the same rule downstream: fewer than two drugs means no check.

mod pattern;

pub use pattern::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("No JSON object found in model response")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Model inference error: {0}")]
    Inference(String),

    #[error("Extraction strategy unavailable: {0}")]
    Unavailable(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Drugs (in order of appearance) and age found in a piece of text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Extraction {
    pub drugs: Vec<String>,
    pub age: Option<u32>,
}

impl Extraction {
    pub fn new(drugs: Vec<String>, age: Option<u32>) -> Self {
        Self { drugs, age }
    }

    /// The first two drugs, if at least two were found.
    pub fn first_pair(&self) -> Option<(&str, &str)> {
        match self.drugs.as_slice() {
            [first, second, ..] => Some((first, second)),
            _ => None,
        }
    }
}

/// A method for turning free text into an [`Extraction`].
pub trait ExtractionStrategy: Send + Sync {
    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    fn extract(&self, text: &str) -> ExtractionResult<Extraction>;
}

/// Which strategy a caller wants for a given request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    #[default]
    Pattern,
    Model,
}

/// Append `items` to `target`, skipping exact duplicates while keeping first-seen order.
pub(crate) fn push_unique<I>(target: &mut Vec<String>, items: I)
where
    I: IntoIterator<Item = String>,
{
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}
