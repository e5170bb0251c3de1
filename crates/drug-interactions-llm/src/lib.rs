//! Language-model extraction for prescription text.
//!
//! This crate provides the model-delegation [`ExtractionStrategy`] for the checker:
//! a fixed prompt asks a hosted instruction model for `{"drugs": [...], "age": N}`,
//! and the reply is parsed tolerantly (surrounding prose is ignored).
//!
//! [`ExtractionStrategy`]: drug_interactions_core::ExtractionStrategy

pub mod client;
pub mod extraction;
pub mod prompts;

pub use client::*;
pub use extraction::*;
pub use prompts::*;
