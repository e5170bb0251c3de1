//! Order-independent drug pair keys.

use serde::{Deserialize, Serialize};

/// Canonical form of a drug name used for every key: trimmed, lower-cased.
pub fn normalize_drug_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Unordered pair of normalized drug names, stored sorted so (A, B) == (B, A).
///
/// The fields are private: the only way to build a key is [`DrugPairKey::new`],
/// which always normalizes. Deserialization goes through it as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct DrugPairKey {
    first: String,
    second: String,
}

impl DrugPairKey {
    pub fn new(drug1: &str, drug2: &str) -> Self {
        let a = normalize_drug_name(drug1);
        let b = normalize_drug_name(drug2);
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl From<(String, String)> for DrugPairKey {
    fn from((drug1, drug2): (String, String)) -> Self {
        Self::new(&drug1, &drug2)
    }
}

impl From<DrugPairKey> for (String, String) {
    fn from(key: DrugPairKey) -> Self {
        (key.first, key.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drug_name() {
        assert_eq!(normalize_drug_name("  Warfarin "), "warfarin");
        assert_eq!(normalize_drug_name("ASPIRIN"), "aspirin");
        assert_eq!(normalize_drug_name(""), "");
    }

    #[test]
    fn test_key_is_order_independent() {
        let ab = DrugPairKey::new("Warfarin", "Aspirin");
        let ba = DrugPairKey::new(" aspirin", "WARFARIN ");
        assert_eq!(ab, ba);
        assert_eq!(ab.first(), "aspirin");
        assert_eq!(ab.second(), "warfarin");
    }

    #[test]
    fn test_empty_component_is_kept() {
        let key = DrugPairKey::new("", "Aspirin");
        assert_eq!(key.first(), "");
        assert_eq!(key.second(), "aspirin");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let key: DrugPairKey = serde_json::from_str(r#"[" Warfarin", "ASPIRIN"]"#).unwrap();
        assert_eq!(key, DrugPairKey::new("Aspirin", "Warfarin"));

        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"["aspirin","warfarin"]"#);
    }

    #[test]
    fn test_deserialized_key_finds_stored_pair() {
        use crate::models::{AgeSpec, InteractionRecord};
        use crate::store::InteractionStore;

        let mut store = InteractionStore::new();
        store.add("Warfarin", "Aspirin", InteractionRecord::new("Bleeding", AgeSpec::Exact(40)));

        let key: DrugPairKey = serde_json::from_str(r#"[" Warfarin", "ASPIRIN"]"#).unwrap();
        assert!(store.lookup(&key).is_some());
    }
}
