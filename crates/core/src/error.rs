// Central Error Type for the Harness
//
// Only errors raised outside every probe's isolation boundary end up here.
// Probe failures are data (Outcome), never HarnessError.

use thiserror::Error;

/// Harness-level error type
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using HarnessError
pub type Result<T> = std::result::Result<T, HarnessError>;
