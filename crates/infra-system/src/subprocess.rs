// Subprocess runner shared by the exec and toolchain probes
// reason: tokio for async process management with an optional deadline
use serde_json::json;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

use probebench_core::domain::Detail;
use probebench_core::port::ProbeError;

/// Captured stream length kept in probe details
pub const OUTPUT_MAX_CHARS: usize = 2048;

/// What to run
///
/// The child inherits the full process environment on purpose: variables set
/// by an earlier env-mutation probe must be visible to it.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            timeout: None,
        }
    }

    /// `bash -lc <script>`
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("bash").args(["-lc".to_string(), script.into()])
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of a finished child process
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl CommandOutput {
    pub fn to_detail(&self, spec: &CommandSpec) -> Detail {
        Detail::new(json!({
            "program": spec.program,
            "args": spec.args,
            "exitCode": self.exit_code,
            "stdout": truncate(&self.stdout, OUTPUT_MAX_CHARS),
            "stderr": truncate(&self.stderr, OUTPUT_MAX_CHARS),
        }))
    }
}

/// Cut `text` to at most `max_chars` characters
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("…[truncated]");
    cut
}

/// Spawn the child and wait for it, honoring `spec.timeout`
///
/// # Errors
/// - ProbeError::Operation("spawn") if the program cannot be started
/// - ProbeError::Timeout if the deadline passes (the child is killed)
/// - ProbeError::Io if waiting on the child fails
pub async fn run_command(spec: &CommandSpec) -> Result<CommandOutput, ProbeError> {
    info!(
        program = %spec.program,
        args = ?spec.args,
        timeout_ms = ?spec.timeout.map(|t| t.as_millis()),
        "Starting subprocess"
    );

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.working_dir {
        command.current_dir(dir);
    }

    let started = Instant::now();
    let child = command
        .spawn()
        .map_err(|e| ProbeError::operation("spawn", format!("{}: {}", spec.program, e)))?;

    let output = match spec.timeout {
        Some(limit) => match timeout(limit, child.wait_with_output()).await {
            Ok(waited) => waited?,
            Err(_) => {
                return Err(ProbeError::Timeout(
                    u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                ))
            }
        },
        None => child.wait_with_output().await?,
    };

    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let result = CommandOutput {
        exit_code: output.status.code(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration_ms,
    };

    info!(
        program = %spec.program,
        duration_ms = duration_ms,
        exit_code = ?result.exit_code,
        "Subprocess finished"
    );

    Ok(result)
}
