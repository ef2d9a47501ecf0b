// Application Layer - Probe plan, orchestration and failure isolation

pub mod nested;
pub mod orchestrator;
pub mod plan;

// Re-exports
pub use nested::{NestedSteps, StepRecord};
pub use orchestrator::Orchestrator;
pub use plan::ProbePlan;
