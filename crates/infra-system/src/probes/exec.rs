// Shell spawn probe
use async_trait::async_trait;
use std::time::Duration;

use probebench_core::domain::{ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeResult};

use crate::subprocess::{run_command, CommandSpec};

pub const DEFAULT_SHELL_SCRIPT: &str = "echo shell_spawned && id && uname -a";

pub struct ShellSpawnProbe {
    script: String,
    timeout: Option<Duration>,
}

impl ShellSpawnProbe {
    pub fn new(script: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            script: script.into(),
            timeout,
        }
    }
}

impl Default for ShellSpawnProbe {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL_SCRIPT, None)
    }
}

#[async_trait]
impl Probe for ShellSpawnProbe {
    fn id(&self) -> &str {
        "shell-spawn"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Exec
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
