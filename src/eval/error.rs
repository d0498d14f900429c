//! Error types for the evaluation pipeline.
//!
//! The variants mirror the per-sample gates: decoding, reconstruction,
//! sanitization, and docking failures are recoverable (the orchestrator
//! tallies them and moves to the next sample), while rules/input problems
//! are run-fatal.

use thiserror::Error;

use crate::chem::SanitizeError;

/// Errors raised by the evaluation pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Atom-type index outside the encoding's domain, or a length mismatch
    /// between positions and type indices. Indicates malformed generator
    /// output rather than an unlucky geometry.
    #[error("atom type decode failed: index {index} out of range for {mode} encoding")]
    Decode { index: usize, mode: &'static str },

    /// Positions and type indices disagree in length.
    #[error("sample has {n_positions} positions but {n_types} type indices")]
    LengthMismatch { n_positions: usize, n_types: usize },

    /// No internally consistent bond/valence assignment exists.
    #[error("reconstruction failed: {0}")]
    Reconstruction(String),

    /// The assembled graph was rejected by sanitization.
    #[error("sanitization rejected the reconstructed graph: {0}")]
    Sanitization(#[from] SanitizeError),

    /// The external docking scorer failed, produced unparseable output, or
    /// exceeded its time budget.
    #[error("docking failed: {0}")]
    Docking(String),

    /// Failed to parse bonding rules TOML.
    #[error("failed to parse bonding rules: {0}")]
    RuleParse(#[from] toml::de::Error),

    /// A bonding-rules table entry could not be interpreted.
    #[error("invalid bonding rules entry '{entry}': {detail}")]
    RuleEntry { entry: String, detail: String },

    /// The evaluation run received no samples.
    #[error("sample set is empty: at least one sample is required")]
    EmptyInput,
}

impl Error {
    pub fn reconstruction(detail: impl Into<String>) -> Self {
        Self::Reconstruction(detail.into())
    }

    pub fn docking(detail: impl Into<String>) -> Self {
        Self::Docking(detail.into())
    }

    pub fn rule_entry(entry: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::RuleEntry {
            entry: entry.into(),
            detail: detail.into(),
        }
    }
}
