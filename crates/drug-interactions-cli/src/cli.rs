//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use drug_interactions_core::Severity;

#[derive(Parser)]
#[command(name = "drug-interactions")]
#[command(version)]
#[command(about = "Check drug-pair interactions from a tabular dataset", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON config file (dataset paths, default age, inference settings)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Interaction dataset (CSV)
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Where added interactions are saved (CSV)
    #[arg(long, global = true)]
    pub updated_dataset: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every drug in the dataset
    Drugs,

    /// Check two drugs for a known interaction
    Check {
        /// First drug
        drug1: String,

        /// Second drug
        drug2: String,

        /// Patient age
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=120))]
        age: u32,
    },

    /// Add a new interaction
    Add {
        #[arg(long)]
        drug1: String,

        #[arg(long)]
        drug2: String,

        /// What happens when the drugs are combined
        #[arg(long)]
        interaction: String,

        #[arg(long, value_enum)]
        severity: SeverityArg,

        /// Age this interaction applies to
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=120))]
        age: u32,

        /// Dosage recommendation
        #[arg(long)]
        dosage: String,

        /// Alternative drug
        #[arg(long)]
        alternative: String,
    },

    /// Extract two drugs from prescription text and check them
    Extract {
        /// Prescription text (reads stdin when neither TEXT nor --file is given)
        text: Option<String>,

        /// Read prescription text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Use the language model instead of pattern matching
        #[arg(long)]
        model: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Mild,
    Moderate,
    Severe,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Mild => Severity::Mild,
            SeverityArg::Moderate => Severity::Moderate,
            SeverityArg::Severe => Severity::Severe,
        }
    }
}
