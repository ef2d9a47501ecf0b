// Environment tampering: process-wide variable writes
//
// This is the one probe that mutates shared process state. Later probes that
// spawn children (exec, toolchain) inherit these values; the orchestrator's
// strict sequencing is what keeps that ordering deterministic.
use async_trait::async_trait;
use serde_json::json;

use probebench_core::domain::{ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeResult};

pub const DEFAULT_TAMPER_VARS: &[(&str, &str)] = &[
    ("LD_PRELOAD", "/tmp/not-real.so"),
    ("LD_LIBRARY_PATH", "/tmp"),
    ("GIT_ASKPASS", "echo"),
];

pub struct EnvTamperProbe {
    vars: Vec<(String, String)>,
}

impl EnvTamperProbe {
    pub fn new(vars: Vec<(String, String)>) -> Self {
        Self { vars }
    }

    pub fn with_default_vars() -> Self {
        Self::new(
            DEFAULT_TAMPER_VARS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[async_trait]
impl Probe for EnvTamperProbe {
    fn id(&self) -> &str {
        "env-tamper"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::EnvMutation
    }

    async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
        let mut written = Vec::with_capacity(self.vars.len());
        for (name, value) in &self.vars {
            // Previous values are not echoed; they may be sensitive
            let previously_set = std::env::var_os(name).is_some();
            std::env::set_var(name, value);
            written.push(json!({
                "name": name,
                "value": value,
                "previouslySet": previously_set,
            }));
        }

        Ok(Report::success(json!({ "set": written })))
    }
}
