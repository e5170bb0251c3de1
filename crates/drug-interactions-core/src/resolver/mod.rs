//! Interaction resolver.
//!
//! Pipeline: normalize both names → build the pair key → look up the store →
//! select a record by age.

pub use crate::models::normalize_drug_name;

use crate::models::{DrugPairKey, InteractionOutcome, InteractionRecord};
use crate::store::InteractionStore;

/// Resolves drug pairs against a borrowed store.
pub struct InteractionResolver<'a> {
    store: &'a InteractionStore,
}

impl<'a> InteractionResolver<'a> {
    /// Create a new resolver.
    pub fn new(store: &'a InteractionStore) -> Self {
        Self { store }
    }

    /// Check a drug pair for a patient of the given age.
    pub fn check(&self, drug1: &str, drug2: &str, age: u32) -> InteractionOutcome {
        let key = DrugPairKey::new(drug1, drug2);

        let Some(records) = self.store.lookup(&key) else {
            tracing::debug!(first = key.first(), second = key.second(), "No interaction on record");
            return InteractionOutcome::NoInteraction;
        };

        match select_record(records, age) {
            Some((record, age_matched)) => {
                tracing::debug!(
                    first = key.first(),
                    second = key.second(),
                    age,
                    age_matched,
                    candidates = records.len(),
                    "Interaction found"
                );
                InteractionOutcome::Found {
                    record: record.clone(),
                    age_matched,
                }
            }
            None => InteractionOutcome::NoInteraction,
        }
    }
}

/// Pick the record to report for `age`.
///
/// The first record whose age specifier matches wins. When none match, the first
/// record is returned anyway with `age_matched == false`, so an age mismatch never
/// hides a known interaction.
pub fn select_record(records: &[InteractionRecord], age: u32) -> Option<(&InteractionRecord, bool)> {
    records
        .iter()
        .find(|record| record.age.matches(age))
        .map(|record| (record, true))
        .or_else(|| records.first().map(|record| (record, false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgeSpec;

    fn record(interaction: &str, age: AgeSpec) -> InteractionRecord {
        InteractionRecord::new(interaction, age)
    }

    fn store_with(records: Vec<InteractionRecord>) -> InteractionStore {
        let mut store = InteractionStore::new();
        for r in records {
            store.add("Warfarin", "Aspirin", r);
        }
        store
    }

    #[test]
    fn test_absent_pair_is_no_interaction() {
        let store = store_with(vec![record("Bleeding", AgeSpec::Exact(40))]);
        let resolver = InteractionResolver::new(&store);

        for age in [0, 40, 120] {
            assert_eq!(resolver.check("Warfarin", "Ibuprofen", age), InteractionOutcome::NoInteraction);
        }
    }

    #[test]
    fn test_first_matching_record_wins() {
        let store = store_with(vec![
            record("Child dosing", AgeSpec::Range { start: 0, end: 17 }),
            record("Adult dosing", AgeSpec::Range { start: 18, end: 65 }),
            record("Adult dosing, duplicate", AgeSpec::Range { start: 18, end: 65 }),
        ]);
        let resolver = InteractionResolver::new(&store);

        let outcome = resolver.check("aspirin", "warfarin", 40);
        assert_eq!(outcome.record().unwrap().interaction, "Adult dosing");
        assert!(matches!(outcome, InteractionOutcome::Found { age_matched: true, .. }));
    }

    #[test]
    fn test_unmatched_age_falls_back_to_first() {
        let store = store_with(vec![
            record("Adult dosing", AgeSpec::Range { start: 18, end: 65 }),
            record("Senior dosing", AgeSpec::Range { start: 66, end: 90 }),
        ]);
        let resolver = InteractionResolver::new(&store);

        let outcome = resolver.check("Aspirin", "Warfarin", 100);
        assert_eq!(outcome.record().unwrap().interaction, "Adult dosing");
        assert!(matches!(outcome, InteractionOutcome::Found { age_matched: false, .. }));
    }

    #[test]
    fn test_invalid_age_still_reported() {
        let store = store_with(vec![record("Bleeding", AgeSpec::parse("adults"))]);
        let resolver = InteractionResolver::new(&store);

        assert!(resolver.check("Warfarin", "Aspirin", 30).is_found());
    }

    #[test]
    fn test_select_record_empty() {
        assert!(select_record(&[], 30).is_none());
    }
}
