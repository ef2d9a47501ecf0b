// Placeholder for a probe turned off by configuration
use async_trait::async_trait;
use serde_json::json;

use probebench_core::domain::{ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeResult};

/// Keeps a probe's slot in the transcript while reporting `skipped`
pub struct DisabledProbe {
    id: String,
    category: ProbeCategory,
    reason: String,
}

impl DisabledProbe {
    pub fn new(id: impl Into<String>, category: ProbeCategory, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            reason: reason.into(),
        }
    }

    /// Stand-in that mirrors another probe's identity
    pub fn replacing(probe: &dyn Probe, reason: impl Into<String>) -> Self {
        Self::new(probe.id(), probe.category(), reason)
    }
}

#[async_trait]
impl Probe for DisabledProbe {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> ProbeCategory {
        self.category.clone()
    }

    async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
        Ok(Report::skipped(json!({ "reason": self.reason })))
    }
}
