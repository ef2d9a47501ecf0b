// Run Driver - composes workspace, sink, plan and orchestrator into one run
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use probebench_core::application::orchestrator::panic_message;
use probebench_core::application::{Orchestrator, ProbePlan};
use probebench_core::domain::{ExitClass, RunResult, SignalEvent};
use probebench_core::port::{IdProvider, ProbeContext, SignalSink, TimeProvider};
use probebench_core::{HarnessError, Result};
use probebench_infra_system::ScratchWorkspace;

use crate::config::HarnessConfig;
use crate::registry::build_plan;
use crate::summary;

/// Builds the plan once the run identity is known
pub type PlanFactory = Box<dyn Fn(&HarnessConfig) -> Result<ProbePlan> + Send + Sync>;

/// Everything a finished run produced
#[derive(Debug)]
pub struct DriverReport {
    pub run_id: String,
    pub exit_class: ExitClass,
    /// Absent when the run ended fatally
    pub result: Option<RunResult>,
    /// Events the sink durably accepted, in order
    pub transcript: Vec<SignalEvent>,
    /// Where the scratch workspace lived; removed by the time this is returned
    pub scratch_dir: Option<PathBuf>,
    pub fatal_error: Option<String>,
}

pub struct RunDriver {
    config: HarnessConfig,
    sink: Arc<dyn SignalSink>,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
    scratch_root: Option<PathBuf>,
    plan_factory: PlanFactory,
}

impl RunDriver {
    pub fn new(
        config: HarnessConfig,
        sink: Arc<dyn SignalSink>,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            config,
            sink,
            time_provider,
            id_provider,
            scratch_root: None,
            plan_factory: Box::new(build_plan),
        }
    }

    /// Create scratch workspaces under `root` instead of the system temp dir
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Replace the fixed probe sequence
    pub fn with_plan_factory(
        mut self,
        factory: impl Fn(&HarnessConfig) -> Result<ProbePlan> + Send + Sync + 'static,
    ) -> Self {
        self.plan_factory = Box::new(factory);
        self
    }

    /// Run once, print the summary, return the exit classification
    pub async fn execute(&self) -> ExitClass {
        let report = self.run().await;
        let rendered = summary::render(&report);

        // stdout may already carry the JSON-lines transcript
        if self.config.emit_stdout {
            eprintln!("{}", rendered);
        } else {
            println!("{}", rendered);
        }

        report.exit_class
    }

    /// Run once and collect the report
    ///
    /// The scratch workspace is released before this returns, whatever happened.
    pub async fn run(&self) -> DriverReport {
        let run_id = self.id_provider.generate_id();
        info!(run_id = %run_id, offline = self.config.offline, "Run started");

        let mut workspace = match self.acquire_workspace() {
            Ok(workspace) => workspace,
            Err(e) => return self.fatal(run_id, None, e),
        };
        let scratch_dir = workspace.path().to_path_buf();

        let outcome = self.orchestrate(&run_id, &scratch_dir).await;
        workspace.release();

        match outcome {
            Ok(result) => {
                let exit_class = result.exit_class();
                info!(
                    run_id = %run_id,
                    exit_class = %exit_class,
                    transcript_complete = result.transcript_complete(),
                    "Run complete"
                );
                DriverReport {
                    run_id,
                    exit_class,
                    result: Some(result),
                    transcript: self.sink.drain(),
                    scratch_dir: Some(scratch_dir),
                    fatal_error: None,
                }
            }
            Err(e) => self.fatal(run_id, Some(scratch_dir), e),
        }
    }

    fn acquire_workspace(&self) -> Result<ScratchWorkspace> {
        match &self.scratch_root {
            Some(root) => ScratchWorkspace::acquire_in(root),
            None => ScratchWorkspace::acquire(),
        }
    }

    /// Build the plan and run it in its own task
    ///
    /// A panic outside every probe boundary (orchestrator or sink) surfaces as
    /// `HarnessError::Internal` instead of unwinding through the driver.
    async fn orchestrate(&self, run_id: &str, scratch_dir: &Path) -> Result<RunResult> {
        let plan = (self.plan_factory)(&self.config)?;
        let ctx = ProbeContext::new(run_id, scratch_dir);
        let orchestrator = Orchestrator::new(self.sink.clone(), self.time_provider.clone())
            .with_probe_timeout(self.config.probe_timeout());

        let handle = tokio::spawn(async move { orchestrator.run(plan, &ctx).await });

        match handle.await {
            Ok(result) => Ok(result),
            Err(join_err) if join_err.is_panic() => {
                let msg = panic_message(join_err.into_panic().as_ref());
                Err(HarnessError::Internal(format!(
                    "orchestration panicked: {}",
                    msg
                )))
            }
            Err(join_err) => Err(HarnessError::Internal(format!(
                "orchestration cancelled: {}",
                join_err
            ))),
        }
    }

    fn fatal(&self, run_id: String, scratch_dir: Option<PathBuf>, e: HarnessError) -> DriverReport {
        error!(run_id = %run_id, error = %e, "Run aborted");
        DriverReport {
            run_id,
            exit_class: ExitClass::Fatal,
            result: None,
            transcript: self.sink.drain(),
            scratch_dir,
            fatal_error: Some(e.to_string()),
        }
    }
}
