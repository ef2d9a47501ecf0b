// Domain Layer - Probe metadata, outcomes and the signal transcript

pub mod error;
pub mod outcome;
pub mod probe;
pub mod run_result;
pub mod signal;

// Re-exports
pub use error::DomainError;
pub use outcome::{Detail, Outcome, ProbeStatus, Report};
pub use probe::{Isolation, ProbeCategory, ProbeId};
pub use run_result::{ExitClass, ProbeVerdict, RunResult, SinkFailure, StatusCounts};
pub use signal::SignalEvent;
