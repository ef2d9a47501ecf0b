// Sensitive-path access attempts
//
// Content is never kept: only the byte count or the error kind reaches the
// transcript. Most of these reads are expected to be denied.
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

use probebench_core::application::NestedSteps;
use probebench_core::domain::{Isolation, ProbeCategory};
use probebench_core::port::{Probe, ProbeContext, ProbeError, ProbeResult};

/// Paths read by default; `~` expands against `HOME`
pub const DEFAULT_SENSITIVE_TARGETS: &[&str] = &[
    "/etc/passwd",
    "/etc/shadow",
    "/etc/sudoers",
    "~/.ssh/id_rsa",
    "~/.ssh/known_hosts",
    "/proc/self/environ",
];

pub struct SensitiveReadProbe {
    targets: Vec<PathBuf>,
}

impl SensitiveReadProbe {
    pub fn new(targets: Vec<PathBuf>) -> Self {
        Self { targets }
    }

    pub fn with_default_targets() -> Self {
        Self::new(
            DEFAULT_SENSITIVE_TARGETS
                .iter()
                .map(|t| PathBuf::from(shellexpand::tilde(t).into_owned()))
                .collect(),
        )
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }
}

#[async_trait]
impl Probe for SensitiveReadProbe {
    fn id(&self) -> &str {
        "sensitive-read"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::SensitiveAccess
    }

    fn isolation(&self) -> Isolation {
        Isolation::BestEffortNested
    }

    async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
        let targets = self.targets.clone();

        let steps = tokio::task::spawn_blocking(move || {
            let mut steps = NestedSteps::new();
            for target in targets {
                steps.run(target.display().to_string(), || {
                    let bytes = std::fs::read(&target)?;
                    Ok(json!({ "bytes": bytes.len() }))
                });
            }
            steps
        })
        .await
        .map_err(|e| ProbeError::Internal(format!("sensitive read task failed: {}", e)))?;

        Ok(steps.into_report())
    }
}
