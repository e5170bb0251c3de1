//! Prompt for prescription extraction.
//!
//! Written for small instruction-tuned models (Granite 3.3 2B by default), which
//! follow a literal output example better than a schema description.

/// Output shape shown to the model.
pub const OUTPUT_EXAMPLE: &str = r#"{"drugs": ["DrugA", "DrugB"], "age": 45}"#;

/// User prompt for extracting drugs and age from prescription text.
pub fn make_extraction_prompt(prescription: &str) -> String {
    format!(
        r#"
Extract from the following prescription text:
1. List of drug names
2. Patient age if available

Prescription:
{}

Return output ONLY in JSON like:
{}
"#,
        prescription, OUTPUT_EXAMPLE
    )
}
