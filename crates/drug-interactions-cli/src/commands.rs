//! Subcommand handlers.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use drug_interactions_core::{
    CheckerError, DrugInteractionChecker, ExtractionMode, NewInteraction, PrescriptionOutcome,
    Severity,
};
use drug_interactions_llm::{HuggingFaceClient, InferenceConfig, ModelExtractor};
use serde::Serialize;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

pub fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let (checker, load_error) = DrugInteractionChecker::open(&config.checker);
    if let Some(e) = load_error {
        eprintln!(
            "warning: could not load dataset {}: {}",
            config.checker.dataset_path.display(),
            e
        );
    }
    tracing::info!(
        dataset = %config.checker.dataset_path.display(),
        drugs = checker.list_drugs().len(),
        "Checker ready"
    );

    match cli.command {
        Commands::Drugs => list_drugs(&checker, cli.json),
        Commands::Check { drug1, drug2, age } => check(&checker, &drug1, &drug2, age, cli.json),
        Commands::Add {
            drug1,
            drug2,
            interaction,
            severity,
            age,
            dosage,
            alternative,
        } => {
            let new = NewInteraction {
                drug1,
                drug2,
                interaction,
                severity: Severity::from(severity).as_str().to_string(),
                age,
                dosage_recommendation: dosage,
                alternative,
            };
            add(&checker, new, &config)
        }
        Commands::Extract { text, file, model } => {
            let text = read_prescription(text, file.as_deref())?;
            let (checker, mode) = if model {
                (with_model(checker, config.inference), ExtractionMode::Model)
            } else {
                (checker, ExtractionMode::Pattern)
            };
            extract(&checker, &text, mode, cli.json)
        }
    }
}

fn list_drugs(checker: &DrugInteractionChecker, json: bool) -> Result<()> {
    let drugs = checker.list_drugs();
    if json {
        return print_json(&drugs);
    }
    if drugs.is_empty() {
        println!("No drugs loaded.");
    }
    for drug in drugs {
        println!("{}", drug);
    }
    Ok(())
}

fn check(checker: &DrugInteractionChecker, drug1: &str, drug2: &str, age: u32, json: bool) -> Result<()> {
    if drug1.trim().is_empty() || drug2.trim().is_empty() {
        bail!("Please enter both drugs");
    }
    let report = checker.check_interaction(drug1, drug2, age)?;
    if json {
        print_json(&report)
    } else {
        println!("{}", report);
        Ok(())
    }
}

fn add(checker: &DrugInteractionChecker, new: NewInteraction, config: &AppConfig) -> Result<()> {
    let label = format!("{} + {}", new.drug1.trim(), new.drug2.trim());
    match checker.add_interaction(new) {
        Ok(()) => {
            println!(
                "Interaction added: {} (saved to {})",
                label,
                config.checker.updated_dataset_path.display()
            );
            Ok(())
        }
        Err(CheckerError::Persistence(e)) => {
            println!("Interaction added: {}", label);
            Err(e).context("The interaction could not be saved and will be lost on exit")
        }
        Err(e) => Err(e.into()),
    }
}

fn extract(checker: &DrugInteractionChecker, text: &str, mode: ExtractionMode, json: bool) -> Result<()> {
    let outcome = checker.extract_and_check(text, mode)?;
    if json {
        return print_json(&outcome);
    }
    match outcome {
        PrescriptionOutcome::Checked {
            report,
            drugs,
            extracted_by,
        } => {
            println!("Extracted ({}): {}", extracted_by, drugs.join(", "));
            println!("{}", report);
        }
        PrescriptionOutcome::ExtractionFailed { drugs, reason } => {
            if !drugs.is_empty() {
                println!("Extracted: {}", drugs.join(", "));
            }
            println!("Could not check the prescription: {}", reason);
        }
    }
    Ok(())
}

/// Attach the hosted model strategy. Without a token the checker stays pattern-only
/// and model extraction reports a failure instead of aborting.
fn with_model(checker: DrugInteractionChecker, inference: InferenceConfig) -> DrugInteractionChecker {
    match HuggingFaceClient::new(inference) {
        Ok(client) => checker.with_model_extractor(ModelExtractor::new(client)),
        Err(e) => {
            eprintln!("warning: model extraction unavailable: {}", e);
            checker
        }
    }
}

fn read_prescription(text: Option<String>, file: Option<&Path>) -> Result<String> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read prescription from stdin")?;
            buf
        }
    };
    if text.trim().is_empty() {
        bail!("Please enter prescription text");
    }
    Ok(text)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
