// Run Result - aggregate over all executed probes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::ProbeStatus;
use super::probe::ProbeId;

/// Counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub success: usize,
    pub attempted_failed: usize,
    pub skipped: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ProbeStatus) {
        match status {
            ProbeStatus::Success => self.success += 1,
            ProbeStatus::AttemptedFailed => self.attempted_failed += 1,
            ProbeStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.attempted_failed + self.skipped
    }
}

/// Execution-side status of one probe, independent of whether its transcript entry was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeVerdict {
    pub probe_id: ProbeId,
    pub status: ProbeStatus,
}

/// A transcript entry the sink failed to accept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkFailure {
    pub sequence: u64,
    pub probe_id: ProbeId,
    pub message: String,
}

/// External exit classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitClass {
    AllSucceeded,
    SomeAttemptedFailed,
    Fatal,
}

impl ExitClass {
    /// Process exit status: the harness ran to completion unless `Fatal`
    pub fn exit_code(self) -> u8 {
        match self {
            ExitClass::AllSucceeded | ExitClass::SomeAttemptedFailed => 0,
            ExitClass::Fatal => 1,
        }
    }
}

impl std::fmt::Display for ExitClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitClass::AllSucceeded => write!(f, "all-succeeded"),
            ExitClass::SomeAttemptedFailed => write!(f, "some-attempted-failed"),
            ExitClass::Fatal => write!(f, "fatal"),
        }
    }
}

/// Aggregate over a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub run_id: String,
    pub counts: StatusCounts,
    /// Execution order
    pub verdicts: Vec<ProbeVerdict>,
    pub sink_failures: Vec<SinkFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    pub fn new(run_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: run_id.into(),
            counts: StatusCounts::default(),
            verdicts: Vec::new(),
            sink_failures: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    pub fn record(&mut self, probe_id: impl Into<ProbeId>, status: ProbeStatus) {
        self.counts.record(status);
        self.verdicts.push(ProbeVerdict {
            probe_id: probe_id.into(),
            status,
        });
    }

    pub fn record_sink_failure(&mut self, failure: SinkFailure) {
        self.sink_failures.push(failure);
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = finished_at;
    }

    pub fn total(&self) -> usize {
        self.verdicts.len()
    }

    /// True when every executed probe has a transcript entry
    pub fn transcript_complete(&self) -> bool {
        self.sink_failures.is_empty()
    }

    /// `AllSucceeded` exactly when every status is success (vacuously true for an empty run)
    pub fn exit_class(&self) -> ExitClass {
        if self.counts.success == self.counts.total() {
            ExitClass::AllSucceeded
        } else {
            ExitClass::SomeAttemptedFailed
        }
    }
}
