// Orchestrator - sequential probe execution with per-probe failure isolation

pub mod constants;
mod panic_guard;

use constants::*;
pub use panic_guard::{execute_guarded, panic_message, PanicGuardResult};

use crate::application::plan::ProbePlan;
use crate::domain::{Outcome, Report, RunResult, SignalEvent, SinkFailure};
use crate::port::{Probe, ProbeContext, ProbeError, ProbeResult, SignalSink, TimeProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Runs a probe plan to completion, one probe at a time
///
/// Probes run strictly in registration order and never overlap: several of them
/// mutate process-wide state (environment variables) that later probes observe.
/// Each probe is its own fault domain; the sink is a separate one.
pub struct Orchestrator {
    sink: Arc<dyn SignalSink>,
    time_provider: Arc<dyn TimeProvider>,
    probe_timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(sink: Arc<dyn SignalSink>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            sink,
            time_provider,
            probe_timeout: None,
        }
    }

    /// Per-probe deadline. Off by default: without it a hung probe stalls the run.
    ///
    /// On expiry the probe task is aborted and awaited. Work a probe handed to
    /// `spawn_blocking` cannot be interrupted and may still finish on the
    /// blocking pool while the next probe runs.
    pub fn with_probe_timeout(mut self, probe_timeout: Option<Duration>) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// Execute every probe in the plan and tally the outcomes
    ///
    /// Probe failures never surface here; they are recorded as outcomes.
    pub async fn run(&self, plan: ProbePlan, ctx: &ProbeContext) -> RunResult {
        let probes = plan.into_probes();
        let expected = probes.len();
        let mut result = RunResult::new(ctx.run_id.clone(), self.time_provider.now());

        info!(run_id = %ctx.run_id, probes = expected, "Probe run started");

        for (index, probe) in probes.into_iter().enumerate() {
            let event = self.run_probe(index as u64, probe, ctx).await;
            result.record(event.probe_id.clone(), event.outcome.status);

            // Emit before moving on; a sink failure costs a transcript entry, not the run
            if let Err(e) = self.sink.emit(&event) {
                error!(
                    probe_id = %event.probe_id,
                    sequence = event.sequence,
                    error = %e,
                    "Signal sink rejected event"
                );
                result.record_sink_failure(SinkFailure {
                    sequence: event.sequence,
                    probe_id: event.probe_id,
                    message: e.to_string(),
                });
            }
        }

        result.finish(self.time_provider.now());

        info!(
            run_id = %result.run_id,
            success = result.counts.success,
            attempted_failed = result.counts.attempted_failed,
            skipped = result.counts.skipped,
            sink_failures = result.sink_failures.len(),
            "Probe run finished"
        );

        result
    }

    /// Run one probe behind the isolation boundary and build its event
    async fn run_probe(
        &self,
        sequence: u64,
        probe: Arc<dyn Probe>,
        ctx: &ProbeContext,
    ) -> SignalEvent {
        let probe_id = probe.id().to_string();
        let category = probe.category();
        let isolation = probe.isolation();

        info!(
            probe_id = %probe_id,
            category = %category,
            isolation = %isolation,
            "Probe started"
        );

        let timestamp = self.time_provider.now();
        let started = Instant::now();

        let report = match self.execute_isolated(probe, ctx).await {
            Ok(report) => report,
            Err(e) => {
                warn!(
                    probe_id = %probe_id,
                    error_kind = %e.kind(),
                    error = %e,
                    "Probe raised, recording attempted-failed"
                );
                Report::attempted_failed(e.to_detail())
            }
        };

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let outcome = Outcome::from_report(report, duration_ms, timestamp);

        info!(
            probe_id = %probe_id,
            status = %outcome.status,
            duration_ms = duration_ms,
            detail = %outcome.detail.summary(LOG_DETAIL_MAX_CHARS),
            "Probe finished"
        );

        SignalEvent {
            sequence,
            probe_id,
            category,
            isolation,
            outcome,
        }
    }

    /// Execute the probe body in its own task so a panic is contained
    ///
    /// The task is awaited immediately: isolation, not concurrency.
    async fn execute_isolated(&self, probe: Arc<dyn Probe>, ctx: &ProbeContext) -> ProbeResult {
        let ctx = ctx.clone();
        let mut handle = tokio::task::spawn(async move { probe.execute(&ctx).await });

        let joined = match self.probe_timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    // The probe's async side is gone before the next probe starts
                    handle.abort();
                    let _ = handle.await;
                    let limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                    return Err(ProbeError::Timeout(limit_ms));
                }
            },
            None => handle.await,
        };

        match joined {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                let msg = panic_message(join_err.into_panic().as_ref());
                Err(ProbeError::Panicked(msg))
            }
            Err(join_err) => Err(ProbeError::Cancelled(join_err.to_string())),
        }
    }
}
