//! Interaction records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AgeSpec;

/// One stored fact about combining two specific drugs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    /// Description of what happens when the drugs are combined
    pub interaction: String,
    /// Severity label, free text in practice (usually Mild/Moderate/Severe)
    pub severity: String,
    /// Dosage guidance for the matched age
    pub dosage_recommendation: String,
    /// Suggested alternative drug
    pub alternative: String,
    /// Ages this record applies to
    pub age: AgeSpec,
}

impl InteractionRecord {
    /// Create a record with only the interaction text set.
    pub fn new(interaction: impl Into<String>, age: AgeSpec) -> Self {
        Self {
            interaction: interaction.into(),
            severity: String::new(),
            dosage_recommendation: String::new(),
            alternative: String::new(),
            age,
        }
    }
}

/// Severity choices offered when adding an interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mild" => Ok(Severity::Mild),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}
