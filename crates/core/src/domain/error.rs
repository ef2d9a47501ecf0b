// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Duplicate probe id: {0}")]
    DuplicateProbe(String),

    #[error("Invalid probe id: {0:?}")]
    InvalidProbeId(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
