// Signal Sink Port
// Append-only, ordered transcript of SignalEvents

use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::domain::SignalEvent;

/// Sink errors
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink transport unavailable: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Signal sink trait
///
/// No deduplication, no filtering: the sink is a faithful transcript.
/// `emit` is synchronous; the orchestrator does not move on until it returns.
pub trait SignalSink: Send + Sync {
    /// Append one event
    ///
    /// # Errors
    /// - SinkError::Transport when the console/file/remote target is unavailable
    fn emit(&self, event: &SignalEvent) -> Result<(), SinkError>;

    /// Take every accepted event, in emission order
    fn drain(&self) -> Vec<SignalEvent>;
}

/// In-memory transcript (default sink, also used by tests)
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<SignalEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another emitter panicked mid-push; the Vec is still valid
    fn events(&self) -> MutexGuard<'_, Vec<SignalEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }
}

impl SignalSink for MemorySink {
    fn emit(&self, event: &SignalEvent) -> Result<(), SinkError> {
        self.events().push(event.clone());
        Ok(())
    }

    fn drain(&self) -> Vec<SignalEvent> {
        std::mem::take(&mut *self.events())
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Sink that rejects chosen sequence numbers and records the rest
    pub struct FailingSink {
        inner: MemorySink,
        fail_on: Vec<u64>,
    }

    impl FailingSink {
        pub fn new(fail_on: Vec<u64>) -> Self {
            Self {
                inner: MemorySink::new(),
                fail_on,
            }
        }
    }

    impl SignalSink for FailingSink {
        fn emit(&self, event: &SignalEvent) -> Result<(), SinkError> {
            if self.fail_on.contains(&event.sequence) {
                return Err(SinkError::Transport(format!(
                    "injected failure at sequence {}",
                    event.sequence
                )));
            }
            self.inner.emit(event)
        }

        fn drain(&self) -> Vec<SignalEvent> {
            self.inner.drain()
        }
    }
}
