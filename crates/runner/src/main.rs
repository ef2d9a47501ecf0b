//! Probebench - Main Entry Point

use anyhow::{Context, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use probebench_core::port::id_provider::UuidProvider;
use probebench_core::port::time_provider::SystemTimeProvider;
use probebench_core::port::{MemorySink, SignalSink};
use probebench_core::VERSION;
use probebench_infra_sink::JsonLinesSink;
use probebench_infra_system::HostFingerprint;
use probebench_runner::telemetry::init_logging;
use probebench_runner::{HarnessConfig, RunDriver};

const NANO_ID_LEN: usize = 8;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // 1. Load configuration (.env, flags, environment)
    let config = HarnessConfig::load();

    // 2. Initialize logging; the guard flushes the log file on exit
    let _log_guard = init_logging(config.log_format, config.log_file.as_deref())?;

    let nano_id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NANO_ID_LEN)
        .map(char::from)
        .collect();
    let host = HostFingerprint::collect();

    info!(
        version = VERSION,
        nano_id = %nano_id,
        hostname = ?host.hostname,
        os = ?host.os,
        kernel = ?host.kernel,
        arch = ?host.arch,
        uid = ?host.uid,
        "Probebench v{} starting", VERSION
    );

    // 3. Setup dependencies (DI wiring)
    let sink = build_sink(&config)?;
    let driver = RunDriver::new(
        config,
        sink,
        Arc::new(SystemTimeProvider),
        Arc::new(UuidProvider),
    );

    // 4. Run and map the classification to the process exit status
    let exit_class = driver.execute().await;
    info!(exit_class = %exit_class, "Probebench finished");

    Ok(ExitCode::from(exit_class.exit_code()))
}

fn build_sink(config: &HarnessConfig) -> Result<Arc<dyn SignalSink>> {
    if let Some(path) = &config.signal_file {
        let sink = JsonLinesSink::create(path)
            .with_context(|| format!("cannot open signal file {}", path.display()))?;
        return Ok(Arc::new(sink));
    }
    if config.emit_stdout {
        return Ok(Arc::new(JsonLinesSink::stdout()));
    }
    Ok(Arc::new(MemorySink::new()))
}
