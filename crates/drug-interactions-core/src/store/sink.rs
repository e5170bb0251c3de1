//! Persistence for interactions added at runtime.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Dataset, DatasetError, DatasetRow};

/// Persistence errors.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to read existing rows from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },

    #[error("Refusing to rewrite {path}: {skipped} unreadable rows would be lost")]
    Unreadable { path: PathBuf, skipped: usize },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },
}

pub type SinkResult<T> = Result<T, SinkError>;

/// Durable destination for newly added interaction rows.
pub trait InteractionSink: Send + Sync {
    fn append(&self, row: &DatasetRow) -> SinkResult<()>;
}

/// Sink that accepts every row and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl InteractionSink for NullSink {
    fn append(&self, _row: &DatasetRow) -> SinkResult<()> {
        Ok(())
    }
}

/// Append-only CSV sink.
///
/// The original dataset is never modified. The first append copies its rows into
/// `updated_path` together with the new row; later appends extend `updated_path`.
/// With neither file present the updated file starts with just the new row.
/// The table is written to a sibling temp file and renamed into place, and an
/// append is refused when the current table has rows that could not be read.
#[derive(Debug, Clone)]
pub struct CsvSink {
    base_path: PathBuf,
    updated_path: PathBuf,
}

impl CsvSink {
    pub fn new(base_path: impl Into<PathBuf>, updated_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            updated_path: updated_path.into(),
        }
    }

    pub fn updated_path(&self) -> &Path {
        &self.updated_path
    }

    /// The table the next row is appended to.
    fn existing_rows(&self) -> SinkResult<Dataset> {
        let source = if self.updated_path.exists() {
            &self.updated_path
        } else if self.base_path.exists() {
            &self.base_path
        } else {
            return Ok(Dataset::default());
        };

        let dataset = Dataset::from_path(source).map_err(|source_err| SinkError::Read {
            path: source.clone(),
            source: source_err,
        })?;

        if dataset.skipped > 0 {
            return Err(SinkError::Unreadable {
                path: source.clone(),
                skipped: dataset.skipped,
            });
        }
        Ok(dataset)
    }

    /// Write the table next to `updated_path`, then move it over the old file.
    fn replace_updated(&self, dataset: &Dataset) -> SinkResult<()> {
        let mut staging = self.updated_path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        let written = dataset
            .write_to_path(&staging)
            .and_then(|()| fs::rename(&staging, &self.updated_path).map_err(DatasetError::from));

        written.map_err(|source| {
            let _ = fs::remove_file(&staging);
            SinkError::Write {
                path: self.updated_path.clone(),
                source,
            }
        })
    }
}

impl InteractionSink for CsvSink {
    fn append(&self, row: &DatasetRow) -> SinkResult<()> {
        let mut dataset = self.existing_rows()?;
        dataset.rows.push(row.clone());

        self.replace_updated(&dataset)?;

        tracing::info!(
            path = %self.updated_path.display(),
            rows = dataset.rows.len(),
            "Interaction persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn new_row(drug1: &str, drug2: &str) -> DatasetRow {
        DatasetRow {
            drug1: drug1.into(),
            drug2: drug2.into(),
            interaction: "None known".into(),
            severity: "Mild".into(),
            dosage_recommendation: "Standard dose".into(),
            alternative: "None".into(),
            age: "50".into(),
        }
    }

    #[test]
    fn test_first_append_copies_base() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.csv");
        let updated = dir.path().join("updated.csv");
        fs::write(&base, "drug1,drug2,interaction\nWarfarin,Aspirin,Bleeding\n").unwrap();

        let sink = CsvSink::new(&base, &updated);
        sink.append(&new_row("Metformin", "Lisinopril")).unwrap();

        let saved = Dataset::from_path(&updated).unwrap();
        assert_eq!(saved.rows.len(), 2);
        assert_eq!(saved.rows[0].drug1, "Warfarin");
        assert_eq!(saved.rows[1], new_row("Metformin", "Lisinopril"));

        // Base stays untouched
        let base_rows = Dataset::from_path(&base).unwrap();
        assert_eq!(base_rows.rows.len(), 1);
    }

    #[test]
    fn test_later_appends_extend_updated_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.csv");
        let updated = dir.path().join("updated.csv");
        fs::write(&base, "drug1,drug2,interaction\nWarfarin,Aspirin,Bleeding\n").unwrap();

        let sink = CsvSink::new(&base, &updated);
        sink.append(&new_row("Metformin", "Lisinopril")).unwrap();
        sink.append(&new_row("Metformin", "Lisinopril")).unwrap();

        let saved = Dataset::from_path(&updated).unwrap();
        assert_eq!(saved.rows.len(), 3);
    }

    #[test]
    fn test_missing_base_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("missing.csv"), dir.path().join("updated.csv"));

        sink.append(&new_row("A", "B")).unwrap();
        let saved = Dataset::from_path(sink.updated_path()).unwrap();
        assert_eq!(saved.rows, vec![new_row("A", "B")]);
    }

    #[test]
    fn test_unreadable_base_fails() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.csv");
        fs::write(&base, "name,other
Warfarin,Aspirin
").unwrap();
        let sink = CsvSink::new(&base, dir.path().join("updated.csv"));

        let err = sink.append(&new_row("A", "B")).unwrap_err();
        assert!(matches!(err, SinkError::Read { .. }));
        assert!(!sink.updated_path().exists());
    }

    #[test]
    fn test_updated_file_with_unreadable_rows_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.csv");
        let updated = dir.path().join("updated.csv");
        fs::write(&base, "drug1,drug2,interaction\nWarfarin,Aspirin,Bleeding\n").unwrap();

        let mut bytes = b"drug1,drug2,interaction\nWarfarin,Aspirin,Bleeding\n".to_vec();
        bytes.extend_from_slice(b"Bad\xff,Row,Text\n");
        fs::write(&updated, &bytes).unwrap();

        let sink = CsvSink::new(&base, &updated);
        let err = sink.append(&new_row("Metformin", "Lisinopril")).unwrap_err();
        assert!(matches!(err, SinkError::Unreadable { skipped: 1, .. }));
        assert_eq!(fs::read(&updated).unwrap(), bytes);
    }

    #[test]
    fn test_failed_write_leaves_updated_file_intact() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.csv");
        let updated = dir.path().join("updated.csv");
        fs::write(&base, "drug1,drug2,interaction\nWarfarin,Aspirin,Bleeding\n").unwrap();

        let sink = CsvSink::new(&base, &updated);
        sink.append(&new_row("Metformin", "Lisinopril")).unwrap();
        let before = fs::read(&updated).unwrap();

        // A directory where the staging file should go makes the write fail
        fs::create_dir(dir.path().join("updated.csv.tmp")).unwrap();
        let err = sink.append(&new_row("Digoxin", "Amiodarone")).unwrap_err();
        assert!(matches!(err, SinkError::Write { .. }));
        assert_eq!(fs::read(&updated).unwrap(), before);
    }

    #[test]
    fn test_null_sink_accepts() {
        assert!(NullSink.append(&new_row("A", "B")).is_ok());
    }
}
