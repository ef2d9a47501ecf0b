// Harness configuration
// reason: clap derive with env fallbacks, `.env` picked up through dotenvy first
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use probebench_infra_system::probes::crypto::DEFAULT_PBKDF2_ROUNDS;
use probebench_infra_system::probes::network::{
    DEFAULT_DNS_HOST, DEFAULT_EGRESS_URL, DEFAULT_HTTP_TIMEOUT, DEFAULT_METADATA_TIMEOUT,
    DEFAULT_METADATA_URL,
};

/// Log output shape on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "probebench")]
#[command(about = "Runs a fixed sequence of behavior probes and reports what the host allowed", long_about = None)]
#[command(version)]
pub struct HarnessConfig {
    /// Write the signal transcript as JSON lines to this file
    #[arg(long, env = "PROBEBENCH_SIGNAL_FILE")]
    pub signal_file: Option<PathBuf>,

    /// Write the signal transcript as JSON lines to stdout
    #[arg(long, env = "PROBEBENCH_EMIT_STDOUT", conflicts_with = "signal_file")]
    pub emit_stdout: bool,

    /// Probe ids to leave out of the plan (repeatable or comma separated)
    #[arg(long, env = "PROBEBENCH_SKIP", value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Report network probes as skipped instead of touching the network
    #[arg(long, env = "PROBEBENCH_OFFLINE")]
    pub offline: bool,

    /// Actually run the package-install probe
    #[arg(long, env = "PROBEBENCH_ENABLE_PACKAGE_INSTALL")]
    pub enable_package_install: bool,

    #[arg(
        long,
        env = "PROBEBENCH_HTTP_TIMEOUT_MS",
        default_value_t = DEFAULT_HTTP_TIMEOUT.as_millis() as u64
    )]
    pub http_timeout_ms: u64,

    #[arg(
        long,
        env = "PROBEBENCH_METADATA_TIMEOUT_MS",
        default_value_t = DEFAULT_METADATA_TIMEOUT.as_millis() as u64
    )]
    pub metadata_timeout_ms: u64,

    #[arg(long, env = "PROBEBENCH_EGRESS_URL", default_value = DEFAULT_EGRESS_URL)]
    pub egress_url: String,

    #[arg(long, env = "PROBEBENCH_DNS_HOST", default_value = DEFAULT_DNS_HOST)]
    pub dns_host: String,

    #[arg(long, env = "PROBEBENCH_METADATA_URL", default_value = DEFAULT_METADATA_URL)]
    pub metadata_url: String,

    #[arg(
        long,
        env = "PROBEBENCH_PBKDF2_ROUNDS",
        default_value_t = DEFAULT_PBKDF2_ROUNDS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub pbkdf2_rounds: u32,

    /// Per-probe deadline; without it a hung probe stalls the run
    #[arg(long, env = "PROBEBENCH_PROBE_TIMEOUT_MS")]
    pub probe_timeout_ms: Option<u64>,

    #[arg(long, env = "PROBEBENCH_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Also write JSON logs to this file
    #[arg(long, env = "PROBEBENCH_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl HarnessConfig {
    /// Read `.env` (if present), then flags and environment
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse().expand_paths()
    }

    /// `~` in user-supplied paths resolves to the home directory
    fn expand_paths(mut self) -> Self {
        self.signal_file = self.signal_file.map(expand_tilde);
        self.log_file = self.log_file.map(expand_tilde);
        self
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_ms.map(Duration::from_millis)
    }

    pub fn is_skipped(&self, probe_id: &str) -> bool {
        self.skip.iter().any(|s| s.trim() == probe_id)
    }
}

fn expand_tilde(path: PathBuf) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
        None => path,
    }
}
