// JSON-lines signal sink
//
// One event per line, flushed before `emit` returns. The in-memory transcript
// only holds events that were durably written, so a failed write shows up as
// a missing entry rather than a silent one.
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use probebench_core::domain::SignalEvent;
use probebench_core::port::{SignalSink, SinkError};

pub struct JsonLinesSink {
    target: String,
    writer: Mutex<Box<dyn Write + Send>>,
    transcript: Mutex<Vec<SignalEvent>>,
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl JsonLinesSink {
    /// Wrap any writer; `target` names it in logs and errors
    pub fn from_writer(writer: impl Write + Send + 'static, target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            writer: Mutex::new(Box::new(writer)),
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Truncate-or-create `path` and write the transcript there
    ///
    /// # Errors
    /// - SinkError::Transport if the file cannot be opened
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file: File = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| SinkError::Transport(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), "Signal transcript file opened");
        Ok(Self::from_writer(file, path.display().to_string()))
    }

    /// Write the transcript to stdout
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout(), "stdout")
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = relock(&self.writer);
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl SignalSink for JsonLinesSink {
    fn emit(&self, event: &SignalEvent) -> Result<(), SinkError> {
        let line = serde_json::to_string(event)?;
        self.write_line(&line)
            .map_err(|e| SinkError::Transport(format!("{}: {}", self.target, e)))?;

        debug!(target_name = %self.target, sequence = event.sequence, "Signal written");
        relock(&self.transcript).push(event.clone());
        Ok(())
    }

    fn drain(&self) -> Vec<SignalEvent> {
        std::mem::take(&mut *relock(&self.transcript))
    }
}
