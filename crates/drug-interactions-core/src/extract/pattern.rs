//! Regex-based extraction against dosage notation and the known vocabulary.

use std::sync::LazyLock;

use regex::Regex;

use super::{push_unique, Extraction, ExtractionResult, ExtractionStrategy};

/// A capitalized name directly followed by an optional number and `mg`: "Ibuprofen 200mg".
static DOSAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z0-9-]+)\s*(?:\d+)?\s*mg\b").expect("Invalid dosage regex pattern")
});

/// Pattern strategy. Never extracts an age.
pub struct PatternExtractor {
    /// Vocabulary entries paired with their whole-word, case-insensitive matcher.
    vocabulary: Vec<(String, Regex)>,
}

impl PatternExtractor {
    /// Build an extractor that falls back to `vocabulary`, searched in the given order.
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary = vocabulary
            .into_iter()
            .map(Into::into)
            .filter_map(|name: String| {
                match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&name))) {
                    Ok(re) => Some((name, re)),
                    Err(e) => {
                        tracing::warn!(drug = %name, error = %e, "Skipping vocabulary entry");
                        None
                    }
                }
            })
            .collect();

        Self { vocabulary }
    }

    /// Names written in dosage notation, in order of first appearance.
    pub fn dosage_mentions(text: &str) -> Vec<String> {
        let mut drugs = Vec::new();
        push_unique(
            &mut drugs,
            DOSAGE_PATTERN
                .captures_iter(text)
                .map(|caps| caps[1].to_string()),
        );
        drugs
    }

    /// Vocabulary entries that occur as whole words, in vocabulary order.
    pub fn vocabulary_mentions(&self, text: &str) -> Vec<String> {
        self.vocabulary
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl ExtractionStrategy for PatternExtractor {
    fn name(&self) -> &str {
        "pattern"
    }

    fn extract(&self, text: &str) -> ExtractionResult<Extraction> {
        let mut drugs = Self::dosage_mentions(text);

        if drugs.len() < 2 {
            push_unique(&mut drugs, self.vocabulary_mentions(text));
        }

        Ok(Extraction::new(drugs, None))
    }
}
