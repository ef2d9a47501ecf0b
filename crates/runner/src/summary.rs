// End-of-run summary: one table row per transcript entry plus an aggregate line
use colored::{ColoredString, Colorize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use probebench_core::domain::{ExitClass, ProbeStatus, SignalEvent, StatusCounts};

use crate::driver::DriverReport;

const DETAIL_COLUMN_MAX_CHARS: usize = 60;

#[derive(Tabled)]
struct SignalRow {
    #[tabled(rename = "#")]
    sequence: u64,
    probe: String,
    category: String,
    status: String,
    #[tabled(rename = "ms")]
    duration_ms: u64,
    detail: String,
}

impl From<&SignalEvent> for SignalRow {
    fn from(event: &SignalEvent) -> Self {
        Self {
            sequence: event.sequence,
            probe: event.probe_id.clone(),
            category: event.category.to_string(),
            status: paint_status(event.outcome.status).to_string(),
            duration_ms: event.outcome.duration_ms,
            detail: event.outcome.detail.summary(DETAIL_COLUMN_MAX_CHARS),
        }
    }
}

fn paint_status(status: ProbeStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        ProbeStatus::Success => text.green(),
        ProbeStatus::AttemptedFailed => text.red(),
        ProbeStatus::Skipped => text.yellow(),
    }
}

/// `N probes: S success, F attempted-failed, K skipped`
pub fn aggregate_line(counts: &StatusCounts) -> String {
    format!(
        "{} probes: {} success, {} attempted-failed, {} skipped",
        counts.total(),
        counts.success,
        counts.attempted_failed,
        counts.skipped
    )
}

/// Render the whole summary as printable text
pub fn render(report: &DriverReport) -> String {
    let mut lines = Vec::new();

    if !report.transcript.is_empty() {
        let rows: Vec<SignalRow> = report.transcript.iter().map(SignalRow::from).collect();
        lines.push(Table::new(rows).with(Style::rounded()).to_string());
    }

    match &report.result {
        Some(result) => {
            let aggregate = aggregate_line(&result.counts);
            let aggregate = match report.exit_class {
                ExitClass::AllSucceeded => aggregate.green().bold(),
                _ => aggregate.yellow().bold(),
            };
            lines.push(aggregate.to_string());

            for failure in &result.sink_failures {
                lines.push(
                    format!(
                        "warning: transcript entry #{} ({}) not recorded: {}",
                        failure.sequence, failure.probe_id, failure.message
                    )
                    .yellow()
                    .to_string(),
                );
            }
        }
        None => {
            let reason = report.fatal_error.as_deref().unwrap_or("unknown error");
            lines.push(format!("fatal: {}", reason).red().bold().to_string());
        }
    }

    lines.push(format!("run {} finished: {}", report.run_id, report.exit_class));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use probebench_core::domain::{Isolation, Outcome, ProbeCategory, Report, RunResult, SinkFailure};

    fn event(sequence: u64, id: &str, report: Report) -> SignalEvent {
        SignalEvent {
            sequence,
            probe_id: id.to_string(),
            category: ProbeCategory::Filesystem,
            isolation: Isolation::CatchAndContinue,
            outcome: Outcome::from_report(report, 7, Utc::now()),
        }
    }

    fn report_with(result: RunResult, transcript: Vec<SignalEvent>) -> DriverReport {
        DriverReport {
            run_id: "run-1".to_string(),
            exit_class: result.exit_class(),
            result: Some(result),
            transcript,
            scratch_dir: None,
            fatal_error: None,
        }
    }

    #[test]
    fn test_aggregate_line() {
        let counts = StatusCounts {
            success: 10,
            attempted_failed: 2,
            skipped: 1,
        };
        assert_eq!(
            aggregate_line(&counts),
            "13 probes: 10 success, 2 attempted-failed, 1 skipped"
        );
    }

    #[test]
    fn test_render_lists_every_event_and_sink_failure() {
        colored::control::set_override(false);

        let mut result = RunResult::new("run-1", Utc::now());
        result.record("fs-scratch-write", ProbeStatus::Success);
        result.record("zip-parse", ProbeStatus::AttemptedFailed);
        result.record_sink_failure(SinkFailure {
            sequence: 1,
            probe_id: "zip-parse".to_string(),
            message: "disk full".to_string(),
        });

        let text = render(&report_with(
            result,
            vec![event(0, "fs-scratch-write", Report::success("wrote a.txt"))],
        ));

        assert!(text.contains("fs-scratch-write"));
        assert!(text.contains("wrote a.txt"));
        assert!(text.contains("2 probes: 1 success, 1 attempted-failed, 0 skipped"));
        assert!(text.contains("#1 (zip-parse) not recorded: disk full"));
        assert!(text.contains("some-attempted-failed"));
    }

    #[test]
    fn test_render_fatal() {
        colored::control::set_override(false);

        let report = DriverReport {
            run_id: "run-2".to_string(),
            exit_class: ExitClass::Fatal,
            result: None,
            transcript: Vec::new(),
            scratch_dir: None,
            fatal_error: Some("Duplicate probe id: x".to_string()),
        };

        let text = render(&report);
        assert!(text.contains("fatal: Duplicate probe id: x"));
        assert!(!text.contains("probes:"));
    }
}
