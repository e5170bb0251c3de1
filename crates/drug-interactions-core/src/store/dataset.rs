//! Tabular dataset loading.
//!
//! The dataset is a CSV file with the columns
//! `drug1, drug2, interaction, severity, dosage_recommendation, alternative, age`.
//! Header names are matched case-insensitively after trimming. Only the first three
//! columns are required; the rest default to empty.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::InteractionStore;
use crate::models::{AgeSpec, DrugPairKey, InteractionRecord};

/// Columns that must be present in the header.
pub const REQUIRED_COLUMNS: &[&str] = &["drug1", "drug2", "interaction"];

/// Dataset loading errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// One dataset row, exactly as stored in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DatasetRow {
    #[serde(default)]
    pub drug1: String,
    #[serde(default)]
    pub drug2: String,
    #[serde(default)]
    pub interaction: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub dosage_recommendation: String,
    #[serde(default)]
    pub alternative: String,
    #[serde(default)]
    pub age: String,
}

impl DatasetRow {
    /// Key this row is stored under.
    pub fn key(&self) -> DrugPairKey {
        DrugPairKey::new(&self.drug1, &self.drug2)
    }

    /// Convert into a store record, parsing the age cell.
    pub fn into_record(self) -> InteractionRecord {
        InteractionRecord {
            age: AgeSpec::parse(&self.age),
            interaction: self.interaction,
            severity: self.severity,
            dosage_recommendation: self.dosage_recommendation,
            alternative: self.alternative,
        }
    }
}

/// A loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<DatasetRow>,
    /// Rows dropped because they could not be decoded
    pub skipped: usize,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), rows = dataset.rows.len(), "Dataset loaded");
        Ok(dataset)
    }

    /// Load a dataset from any CSV source.
    ///
    /// Rows that fail to decode are skipped with a warning; a header without one of
    /// the [`REQUIRED_COLUMNS`] fails the whole load.
    pub fn from_reader<R: io::Read>(reader: R) -> DatasetResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: csv::StringRecord = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                return Err(DatasetError::MissingColumn((*column).to_string()));
            }
        }

        let mut rows = Vec::new();
        let mut skipped = 0;
        for (index, result) in reader.records().enumerate() {
            match result.and_then(|record| record.deserialize::<DatasetRow>(Some(&headers))) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    skipped += 1;
                    // +2: one-based, after the header line
                    tracing::warn!(line = index + 2, error = %e, "Skipping unreadable dataset row");
                }
            }
        }

        Ok(Self { rows, skipped })
    }

    /// Write rows to a CSV file with the canonical header, replacing its contents.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> DatasetResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Sorted, deduplicated drug names from both drug columns, as written.
    pub fn vocabulary(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| [&row.drug1, &row.drug2])
            .filter(|name| !name.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Build the interaction store from these rows.
    pub fn into_store(self) -> InteractionStore {
        InteractionStore::build(self.rows)
    }
}
