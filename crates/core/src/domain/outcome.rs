// Outcome Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Probe status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeStatus {
    Success,
    AttemptedFailed,
    Skipped,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Success => write!(f, "success"),
            ProbeStatus::AttemptedFailed => write!(f, "attempted-failed"),
            ProbeStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Free-text or structured payload attached to an outcome (JSON serializable)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Detail(serde_json::Value);

impl Detail {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn text(message: impl Into<String>) -> Self {
        Self(serde_json::Value::String(message.into()))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// One-line rendering, cut to at most `max_chars` characters
    pub fn summary(&self, max_chars: usize) -> String {
        let full = match &self.0 {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let flat = full.replace(['\n', '\r'], " ");
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

impl From<serde_json::Value> for Detail {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Detail {
    fn from(message: &str) -> Self {
        Self::text(message)
    }
}

impl From<String> for Detail {
    fn from(message: String) -> Self {
        Self::text(message)
    }
}

/// What a probe body reports; the orchestrator attaches timing to produce an Outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub status: ProbeStatus,
    pub detail: Detail,
}

impl Report {
    pub fn new(status: ProbeStatus, detail: impl Into<Detail>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn success(detail: impl Into<Detail>) -> Self {
        Self::new(ProbeStatus::Success, detail)
    }

    pub fn attempted_failed(detail: impl Into<Detail>) -> Self {
        Self::new(ProbeStatus::AttemptedFailed, detail)
    }

    pub fn skipped(detail: impl Into<Detail>) -> Self {
        Self::new(ProbeStatus::Skipped, detail)
    }

    /// Success when `ok`, attempted-failed otherwise
    pub fn from_ok(ok: bool, detail: impl Into<Detail>) -> Self {
        if ok {
            Self::success(detail)
        } else {
            Self::attempted_failed(detail)
        }
    }
}

/// Per-probe result record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub status: ProbeStatus,
    pub detail: Detail,
    pub duration_ms: u64,
    /// Instant the probe started
    pub timestamp: DateTime<Utc>,
}

impl Outcome {
    pub fn from_report(report: Report, duration_ms: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            status: report.status,
            detail: report.detail,
            duration_ms,
            timestamp,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}
