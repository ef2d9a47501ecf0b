// Probe Port
// Every concrete probe (filesystem, network, toolchain, ...) implements this single capability

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{Detail, Isolation, ProbeCategory, Report};

/// Run-scoped resources shared by every probe
#[derive(Debug, Clone)]
pub struct ProbeContext {
    pub run_id: String,
    /// Isolated scratch directory, removed at run end
    pub scratch_dir: PathBuf,
}

impl ProbeContext {
    pub fn new(run_id: impl Into<String>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_id: run_id.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn scratch_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.scratch_dir.join(name)
    }
}

/// Errors a probe raises instead of returning a report
///
/// Expected remote failures should already be folded into the report by the
/// probe itself; these are what the orchestrator converts at its boundary.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("{kind}: {message}")]
    Operation { kind: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Probe timeout after {0}ms")]
    Timeout(u64),

    #[error("Probe panicked: {0}")]
    Panicked(String),

    #[error("Probe cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProbeError {
    pub fn operation(kind: impl Into<String>, message: impl Into<String>) -> Self {
        ProbeError::Operation {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Stable tag for the error class
    pub fn kind(&self) -> String {
        match self {
            ProbeError::Operation { kind, .. } => kind.clone(),
            ProbeError::Io(e) => format!("io:{:?}", e.kind()),
            ProbeError::Timeout(_) => "timeout".to_string(),
            ProbeError::Panicked(_) => "panic".to_string(),
            ProbeError::Cancelled(_) => "cancelled".to_string(),
            ProbeError::Internal(_) => "internal".to_string(),
        }
    }

    fn message(&self) -> String {
        match self {
            ProbeError::Operation { message, .. } => message.clone(),
            ProbeError::Io(e) => e.to_string(),
            ProbeError::Panicked(msg) | ProbeError::Cancelled(msg) | ProbeError::Internal(msg) => {
                msg.clone()
            }
            ProbeError::Timeout(_) => self.to_string(),
        }
    }

    /// Normalized detail: `{"error": {"kind": ..., "message": ...}}`
    pub fn to_detail(&self) -> Detail {
        Detail::new(json!({
            "error": {
                "kind": self.kind(),
                "message": self.message(),
            }
        }))
    }
}

/// Result of a probe body
pub type ProbeResult = Result<Report, ProbeError>;

/// Probe trait
///
/// Implementations live in infra crates and are selected at registration time.
/// A probe never retries and never enforces its own outer deadline.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Unique identity within a run
    fn id(&self) -> &str;

    fn category(&self) -> ProbeCategory;

    fn isolation(&self) -> Isolation {
        Isolation::CatchAndContinue
    }

    /// Exercise the surface and report what happened
    ///
    /// # Errors
    /// Any error is converted to an attempted-failed outcome by the orchestrator.
    async fn execute(&self, ctx: &ProbeContext) -> ProbeResult;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Mock probe behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Report success
        Succeed,
        /// Report attempted-failed with message
        Fail(String),
        /// Return an error instead of a report
        Raise(String),
        /// Panic with message (for isolation testing)
        Panic(String),
        /// Report skipped with reason
        Skip(String),
        /// Sleep, then report success
        Sleep(Duration),
    }

    /// Mock Probe for testing
    pub struct MockProbe {
        id: String,
        category: ProbeCategory,
        behavior: MockBehavior,
        call_count: Arc<AtomicUsize>,
    }

    impl MockProbe {
        pub fn new(id: impl Into<String>, behavior: MockBehavior) -> Self {
            Self {
                id: id.into(),
                category: ProbeCategory::Other("mock".to_string()),
                behavior,
                call_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn succeed(id: impl Into<String>) -> Self {
            Self::new(id, MockBehavior::Succeed)
        }

        pub fn raise(id: impl Into<String>, message: impl Into<String>) -> Self {
            Self::new(id, MockBehavior::Raise(message.into()))
        }

        pub fn panicking(id: impl Into<String>, message: impl Into<String>) -> Self {
            Self::new(id, MockBehavior::Panic(message.into()))
        }

        pub fn with_category(mut self, category: ProbeCategory) -> Self {
            self.category = category;
            self
        }

        /// Shared counter, readable after the probe was moved into a plan
        pub fn call_counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.call_count)
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for MockProbe {
        fn id(&self) -> &str {
            &self.id
        }

        fn category(&self) -> ProbeCategory {
            self.category.clone()
        }

        async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            match &self.behavior {
                MockBehavior::Succeed => Ok(Report::success("mock ok")),
                MockBehavior::Fail(msg) => Ok(Report::attempted_failed(msg.clone())),
                MockBehavior::Raise(msg) => Err(ProbeError::operation("mock", msg.clone())),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for isolation testing
                }
                MockBehavior::Skip(reason) => Ok(Report::skipped(reason.clone())),
                MockBehavior::Sleep(duration) => {
                    tokio::time::sleep(*duration).await;
                    Ok(Report::success("mock slept"))
                }
            }
        }
    }
}
