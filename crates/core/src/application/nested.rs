// Best-effort nested steps
//
// A probe declared `Isolation::BestEffortNested` runs each sub-step through
// `NestedSteps`: a failing or panicking step is recorded and the next one runs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::panic::AssertUnwindSafe;
use tracing::debug;

use super::orchestrator::{execute_guarded, PanicGuardResult};
use crate::domain::Report;
use crate::port::ProbeError;

/// Record of one sub-step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub ok: bool,
    pub detail: Value,
}

/// Collects sub-step results for a nested probe
#[derive(Debug, Default)]
pub struct NestedSteps {
    steps: Vec<StepRecord>,
}

impl NestedSteps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one sub-step; errors and panics are caught and recorded
    ///
    /// Returns whether the step succeeded.
    pub fn run<F>(&mut self, name: impl Into<String>, step: F) -> bool
    where
        F: FnOnce() -> Result<Value, ProbeError>,
    {
        let name = name.into();
        let (ok, detail) = match execute_guarded(AssertUnwindSafe(step)) {
            PanicGuardResult::Completed(Ok(detail)) => (true, detail),
            PanicGuardResult::Completed(Err(e)) => (false, e.to_detail().as_value().clone()),
            PanicGuardResult::Panicked(msg) => {
                (false, ProbeError::Panicked(msg).to_detail().as_value().clone())
            }
        };
        debug!(step = %name, ok = ok, "Nested step finished");
        self.steps.push(StepRecord { name, ok, detail });
        ok
    }

    pub fn all_ok(&self) -> bool {
        self.steps.iter().all(|s| s.ok)
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Success only if every step succeeded; the detail lists every step
    pub fn into_report(self) -> Report {
        let ok = self.all_ok();
        Report::from_ok(ok, json!({ "steps": self.steps }))
    }
}
