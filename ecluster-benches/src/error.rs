//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use ecluster_core::{ExtractionError, OracleError};

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic cloud generation failed.
    #[error("synthetic cloud generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Extraction configuration was rejected.
    #[error("extraction configuration failed: {0}")]
    Extraction(#[from] ExtractionError),
    /// The spatial index could not be built.
    #[error("oracle construction failed: {0}")]
    Oracle(#[from] OracleError),
}
