// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod probe;
pub mod signal_sink;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use probe::{Probe, ProbeContext, ProbeError, ProbeResult};
pub use signal_sink::{MemorySink, SignalSink, SinkError};
pub use time_provider::TimeProvider;
