// Toolchain invocation probes
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use probebench_core::domain::{ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeResult};

use super::io_failure;
use crate::subprocess::{run_command, CommandSpec};

pub const RUSTC_SOURCE_FILE: &str = "in.rs";
pub const RUSTC_OUTPUT_FILE: &str = "bundle";
const RUSTC_SOURCE: &str = "fn main() { println!(\"probebench hello\"); }\n";

pub const DEFAULT_PACKAGE_INSTALL_SCRIPT: &str = "npx --yes playwright install --with-deps";

/// Compile a one-line program with the local `rustc`, if there is one
pub struct RustcBuildProbe {
    timeout: Option<Duration>,
}

impl RustcBuildProbe {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Probe for RustcBuildProbe {
    fn id(&self) -> &str {
        "rustc-build"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Toolchain
    }

    async fn execute(&self, ctx: &ProbeContext) -> ProbeResult {
        let rustc = match which::which("rustc") {
            Ok(path) => path,
            Err(e) => {
                return Ok(Report::skipped(json!({
                    "reason": "rustc not found on PATH",
                    "message": e.to_string(),
                })))
            }
        };

        let source = ctx.scratch_path(RUSTC_SOURCE_FILE);
        if let Err(e) = tokio::fs::write(&source, RUSTC_SOURCE).await {
            return Ok(io_failure(&source, &e));
        }

        let spec = CommandSpec::new(rustc.display().to_string())
            .args([
                RUSTC_SOURCE_FILE,
                "--edition",
                "2021",
                "-o",
                RUSTC_OUTPUT_FILE,
            ])
            .working_dir(&ctx.scratch_dir)
            .timeout(self.timeout);

        match run_command(&spec).await {
            Ok(output) => Ok(Report::from_ok(output.success, output.to_detail(&spec))),
            Err(e) => Ok(Report::attempted_failed(e.to_detail())),
        }
    }
}

/// Third-party package install through the shell (heavy network + disk)
pub struct PackageInstallProbe {
    script: String,
    timeout: Option<Duration>,
}

impl PackageInstallProbe {
    pub fn new(script: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            script: script.into(),
            timeout,
        }
    }
}

impl Default for PackageInstallProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGE_INSTALL_SCRIPT, None)
    }
}

#[async_trait]
impl Probe for PackageInstallProbe {
    fn id(&self) -> &str {
        "package-install"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Toolchain
    }

    async fn execute(&self, ctx: &ProbeContext) -> ProbeResult {
        let spec = CommandSpec::shell(self.script.clone())
            .working_dir(&ctx.scratch_dir)
            .timeout(self.timeout);

        match run_command(&spec).await {
            Ok(output) => Ok(Report::from_ok(output.success, output.to_detail(&spec))),
            Err(e) => Ok(Report::attempted_failed(e.to_detail())),
        }
    }
}
