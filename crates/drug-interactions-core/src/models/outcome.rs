//! Results returned to the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::InteractionRecord;

/// Result of resolving one drug pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// The pair has no stored record. Absence means "safe", not "unknown".
    NoInteraction,
    /// The pair has at least one record.
    Found {
        record: InteractionRecord,
        /// False when no record's age specifier matched and the first record
        /// was returned anyway.
        age_matched: bool,
    },
}

impl InteractionOutcome {
    pub fn record(&self) -> Option<&InteractionRecord> {
        match self {
            InteractionOutcome::NoInteraction => None,
            InteractionOutcome::Found { record, .. } => Some(record),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, InteractionOutcome::Found { .. })
    }
}

/// An outcome together with the query that produced it, for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionReport {
    /// First drug as entered by the user
    pub drug1: String,
    /// Second drug as entered by the user
    pub drug2: String,
    /// Queried age, echoed back in the dosage line
    pub age: u32,
    pub outcome: InteractionOutcome,
}

impl fmt::Display for InteractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            InteractionOutcome::NoInteraction => write!(f, "No harmful interaction found."),
            InteractionOutcome::Found { record, .. } => {
                writeln!(f, "Interaction found:")?;
                writeln!(f, "  {} + {} -> {}", self.drug1, self.drug2, record.interaction)?;
                writeln!(f, "  Severity: {}", record.severity)?;
                writeln!(
                    f,
                    "  Dosage recommendation (age {}): {}",
                    self.age, record.dosage_recommendation
                )?;
                write!(f, "  Alternative: {}", record.alternative)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgeSpec;

    fn report(outcome: InteractionOutcome) -> InteractionReport {
        InteractionReport {
            drug1: "Warfarin".into(),
            drug2: "Aspirin".into(),
            age: 70,
            outcome,
        }
    }

    #[test]
    fn test_no_interaction_message() {
        let text = report(InteractionOutcome::NoInteraction).to_string();
        assert_eq!(text, "No harmful interaction found.");
    }

    #[test]
    fn test_found_message_echoes_query() {
        let record = InteractionRecord {
            interaction: "Increased bleeding risk".into(),
            severity: "Severe".into(),
            dosage_recommendation: "Avoid combination".into(),
            alternative: "Acetaminophen".into(),
            age: AgeSpec::Range { start: 18, end: 65 },
        };
        let text = report(InteractionOutcome::Found { record, age_matched: false }).to_string();

        assert!(text.contains("Warfarin + Aspirin -> Increased bleeding risk"));
        assert!(text.contains("Severity: Severe"));
        assert!(text.contains("(age 70): Avoid combination"));
        assert!(text.contains("Alternative: Acetaminophen"));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(InteractionOutcome::NoInteraction).unwrap();
        assert_eq!(json["status"], "no_interaction");
    }
}
