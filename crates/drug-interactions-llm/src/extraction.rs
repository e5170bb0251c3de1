//! Model reply parsing and the model-backed extraction strategy.

use drug_interactions_core::{Extraction, ExtractionError, ExtractionResult, ExtractionStrategy};
use serde_json::Value;

use crate::client::LlmClient;
use crate::prompts::make_extraction_prompt;

/// Parse a model reply into an [`Extraction`].
///
/// The reply may wrap the JSON in prose; everything from the first `{` to the last
/// `}` is parsed. `drugs` defaults to empty and keeps only string entries. `age` is
/// kept only when it is a non-negative integer, so `"45"` or `45.5` mean "no age".
pub fn parse_extraction_output(raw: &str) -> ExtractionResult<Extraction> {
    let start = raw.find('{').ok_or(ExtractionError::NoJson)?;
    let end = raw.rfind('}').ok_or(ExtractionError::NoJson)?;
    if end < start {
        return Err(ExtractionError::NoJson);
    }

    let value: Value = serde_json::from_str(&raw[start..=end])?;
    let object = value
        .as_object()
        .ok_or_else(|| ExtractionError::InvalidFormat("expected a JSON object".into()))?;

    let drugs = object
        .get("drugs")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let age = object
        .get("age")
        .and_then(Value::as_u64)
        .and_then(|age| u32::try_from(age).ok());

    Ok(Extraction::new(drugs, age))
}

/// Extraction strategy that delegates to a language model.
///
/// One request per call, no retries: any client or parse error is returned to the
/// checker, which degrades it to "could not extract".
pub struct ModelExtractor<C: LlmClient> {
    client: C,
}

impl<C: LlmClient> ModelExtractor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: LlmClient> ExtractionStrategy for ModelExtractor<C> {
    fn name(&self) -> &str {
        "model"
    }

    fn extract(&self, text: &str) -> ExtractionResult<Extraction> {
        let prompt = make_extraction_prompt(text);
        let raw = self.client.generate(&prompt)?;
        tracing::debug!(model = self.client.model(), chars = raw.len(), "Model reply received");

        let extraction = parse_extraction_output(&raw)?;
        tracing::debug!(
            drugs = extraction.drugs.len(),
            age = ?extraction.age,
            "Model extraction parsed"
        );
        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLlmClient;

    #[test]
    fn test_parse_plain_json() {
        let output = parse_extraction_output(r#"{"drugs": ["Warfarin", "Aspirin"], "age": 67}"#).unwrap();
        assert_eq!(output.drugs, vec!["Warfarin", "Aspirin"]);
        assert_eq!(output.age, Some(67));
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let raw = r#"Here is the result: {"drugs": ["A","B"], "age": 33} — hope this helps"#;
        let output = parse_extraction_output(raw).unwrap();
        assert_eq!(output.drugs, vec!["A", "B"]);
        assert_eq!(output.age, Some(33));
    }

    #[test]
    fn test_parse_multiline_reply() {
        let raw = "```json\n{\n  \"drugs\": [\"Metformin\"],\n  \"age\": null\n}\n```";
        let output = parse_extraction_output(raw).unwrap();
        assert_eq!(output.drugs, vec!["Metformin"]);
        assert_eq!(output.age, None);
    }

    #[test]
    fn test_parse_missing_keys_default() {
        let output = parse_extraction_output("{}").unwrap();
        assert!(output.drugs.is_empty());
        assert_eq!(output.age, None);
    }

    #[test]
    fn test_parse_non_integer_age_dropped() {
        for age in [r#""45""#, "45.5", "-3", "99999999999"] {
            let raw = format!(r#"{{"drugs": ["A", "B"], "age": {}}}"#, age);
            assert_eq!(parse_extraction_output(&raw).unwrap().age, None, "age {}", age);
        }
    }

    #[test]
    fn test_parse_non_string_drugs_dropped() {
        let output = parse_extraction_output(r#"{"drugs": ["A", 5, null, "B"]}"#).unwrap();
        assert_eq!(output.drugs, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_no_json() {
        assert!(matches!(parse_extraction_output("no idea"), Err(ExtractionError::NoJson)));
        assert!(matches!(parse_extraction_output("} backwards {"), Err(ExtractionError::NoJson)));
    }

    #[test]
    fn test_parse_greedy_span_breaks_on_two_objects() {
        // First '{' to last '}' spans both objects, which is not valid JSON
        let raw = r#"{"drugs": ["A"]} and {"drugs": ["B"]}"#;
        assert!(matches!(parse_extraction_output(raw), Err(ExtractionError::Json(_))));
    }

    #[test]
    fn test_model_extractor_sends_prompt() {
        let client = MockLlmClient::new(r#"{"drugs": ["Warfarin", "Aspirin"], "age": 70}"#);
        let extractor = ModelExtractor::new(client);

        let output = extractor.extract("Warfarin and aspirin for a 70 year old").unwrap();
        assert_eq!(output.first_pair(), Some(("Warfarin", "Aspirin")));
        assert_eq!(output.age, Some(70));

        let prompts = extractor.client().prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Warfarin and aspirin for a 70 year old"));
    }

    #[test]
    fn test_model_extractor_propagates_failure() {
        let extractor = ModelExtractor::new(MockLlmClient::failing("connection refused"));
        let err = extractor.extract("anything").unwrap_err();
        assert!(matches!(err, ExtractionError::Inference(ref msg) if msg.contains("connection refused")));
    }

    #[test]
    fn test_model_extractor_unparseable_reply() {
        let extractor = ModelExtractor::new(MockLlmClient::new("I cannot help with that."));
        assert!(extractor.extract("anything").is_err());
    }
}
