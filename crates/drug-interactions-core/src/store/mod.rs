//! In-memory interaction store.
//!
//! Built once from the dataset, then extended at runtime through [`InteractionStore::add`].
//! The store never persists anything itself; durable writes go through an
//! [`InteractionSink`] owned by the caller.

mod dataset;
mod sink;

pub use dataset::*;
pub use sink::*;

use std::collections::HashMap;

use crate::models::{DrugPairKey, InteractionRecord};

/// Mapping from an unordered drug pair to its records, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InteractionStore {
    interactions: HashMap<DrugPairKey, Vec<InteractionRecord>>,
}

impl InteractionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from dataset rows.
    ///
    /// Rows with a blank drug cell are not dropped: they land under a key with an
    /// empty component, which no real query will hit.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = DatasetRow>,
    {
        let mut store = Self::new();
        for row in rows {
            let key = row.key();
            store.insert(key, row.into_record());
        }
        tracing::debug!(
            pairs = store.len(),
            records = store.record_count(),
            "Interaction store built"
        );
        store
    }

    /// All records for a pair, in insertion order.
    pub fn lookup(&self, key: &DrugPairKey) -> Option<&[InteractionRecord]> {
        self.interactions.get(key).map(Vec::as_slice)
    }

    /// Append a record for a pair. Never overwrites or deduplicates.
    pub fn add(&mut self, drug1: &str, drug2: &str, record: InteractionRecord) {
        self.insert(DrugPairKey::new(drug1, drug2), record);
    }

    fn insert(&mut self, key: DrugPairKey, record: InteractionRecord) {
        self.interactions.entry(key).or_default().push(record);
    }

    /// Number of distinct drug pairs.
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Total number of records across all pairs.
    pub fn record_count(&self) -> usize {
        self.interactions.values().map(Vec::len).sum()
    }
}
