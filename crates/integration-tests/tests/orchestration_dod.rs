//! Orchestration Definition of Done
//!
//! Scenario, isolation, ordering and exit-code properties of the orchestrator,
//! exercised through the public crate surface.

use async_trait::async_trait;
use probebench_core::application::{NestedSteps, Orchestrator, ProbePlan};
use probebench_core::domain::{ExitClass, Isolation, ProbeCategory, ProbeStatus, Report};
use probebench_core::port::probe::mocks::{MockBehavior, MockProbe};
use probebench_core::port::signal_sink::mocks::FailingSink;
use probebench_core::port::time_provider::mocks::FixedTimeProvider;
use probebench_core::port::{MemorySink, Probe, ProbeContext, ProbeError, ProbeResult, SignalSink};
use serde_json::json;
use std::sync::Arc;

fn ctx() -> ProbeContext {
    ProbeContext::new("run-dod", std::env::temp_dir())
}

fn orchestrator(sink: Arc<dyn SignalSink>) -> Orchestrator {
    Orchestrator::new(sink, Arc::new(FixedTimeProvider::epoch()))
}

/// Scenario A: three probes, all succeed
#[tokio::test]
async fn test_scenario_a_all_succeed() {
    let sink = Arc::new(MemorySink::new());
    let plan = ProbePlan::new()
        .with(MockProbe::succeed("p1"))
        .unwrap()
        .with(MockProbe::succeed("p2"))
        .unwrap()
        .with(MockProbe::succeed("p3"))
        .unwrap();

    let result = orchestrator(sink.clone()).run(plan, &ctx()).await;

    assert_eq!(result.counts.success, 3);
    assert_eq!(result.counts.attempted_failed, 0);
    assert_eq!(result.exit_class(), ExitClass::AllSucceeded);
    assert_eq!(result.exit_class().exit_code(), 0);
}

/// Scenario B: probe 2 of 3 raises
#[tokio::test]
async fn test_scenario_b_middle_probe_raises() {
    let sink = Arc::new(MemorySink::new());
    let plan = ProbePlan::new()
        .with(MockProbe::succeed("p1"))
        .unwrap()
        .with(MockProbe::raise("p2", "unexpected"))
        .unwrap()
        .with(MockProbe::new("p3", MockBehavior::Fail("refused".into())))
        .unwrap();

    let result = orchestrator(sink.clone()).run(plan, &ctx()).await;
    let events = sink.drain();

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].outcome.status, ProbeStatus::Success);
    assert_eq!(events[1].outcome.status, ProbeStatus::AttemptedFailed);
    // p3 keeps its own outcome
    assert_eq!(events[2].outcome.status, ProbeStatus::AttemptedFailed);
    assert_eq!(events[2].outcome.detail.as_value(), &json!("refused"));
    assert_eq!(result.exit_class(), ExitClass::SomeAttemptedFailed);
    assert_eq!(result.exit_class().exit_code(), 0);
}

/// Scenario C: the sink rejects probe 2's event
#[tokio::test]
async fn test_scenario_c_sink_failure_is_visible() {
    let sink = Arc::new(FailingSink::new(vec![1]));
    let p3 = MockProbe::succeed("p3");
    let p3_calls = p3.call_counter();
    let plan = ProbePlan::new()
        .with(MockProbe::succeed("p1"))
        .unwrap()
        .with(MockProbe::succeed("p2"))
        .unwrap()
        .with(p3)
        .unwrap();

    let result = orchestrator(sink.clone()).run(plan, &ctx()).await;

    assert_eq!(p3_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    // Execution outcome of p2 is known even though its transcript entry is missing
    assert_eq!(result.counts.success, 3);
    assert_eq!(result.verdicts[1].probe_id, "p2");
    assert_eq!(result.verdicts[1].status, ProbeStatus::Success);
    assert_eq!(result.sink_failures.len(), 1);
    assert_eq!(result.sink_failures[0].sequence, 1);
    assert!(!result.transcript_complete());

    let transcript: Vec<String> = sink.drain().into_iter().map(|e| e.probe_id).collect();
    assert_eq!(transcript, vec!["p1", "p3"]);
}

/// Total completion: N probes in, N events out, registration order kept
#[tokio::test]
async fn test_total_completion_under_mixed_failures() {
    let sink = Arc::new(MemorySink::new());
    let mut plan = ProbePlan::new();
    let mut expected = Vec::new();

    for i in 0..12 {
        let id = format!("probe-{:02}", i);
        let behavior = match i % 4 {
            0 => MockBehavior::Succeed,
            1 => MockBehavior::Raise(format!("raise {}", i)),
            2 => MockBehavior::Panic(format!("panic {}", i)),
            _ => MockBehavior::Skip("not here".into()),
        };
        plan.register(Arc::new(MockProbe::new(id.clone(), behavior)))
            .unwrap();
        expected.push(id);
    }

    let result = orchestrator(sink.clone()).run(plan, &ctx()).await;
    let events = sink.drain();

    let seen: Vec<String> = events.iter().map(|e| e.probe_id.clone()).collect();
    assert_eq!(seen, expected);
    assert_eq!(result.total(), 12);
    assert_eq!(result.counts.success, 3);
    assert_eq!(result.counts.attempted_failed, 6);
    assert_eq!(result.counts.skipped, 3);
}

/// Exit law: skipped is not success
#[tokio::test]
async fn test_skipped_only_run_is_not_all_succeeded() {
    let sink = Arc::new(MemorySink::new());
    let plan = ProbePlan::new()
        .with(MockProbe::new("s", MockBehavior::Skip("no rustc".into())))
        .unwrap();

    let result = orchestrator(sink).run(plan, &ctx()).await;
    assert_eq!(result.exit_class(), ExitClass::SomeAttemptedFailed);
}

/// Probe whose nested steps mix failure, panic and success
struct ThreeSteps;

#[async_trait]
impl Probe for ThreeSteps {
    fn id(&self) -> &str {
        "three-steps"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::parse("future-surface")
    }

    fn isolation(&self) -> Isolation {
        Isolation::BestEffortNested
    }

    async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
        let mut steps = NestedSteps::new();
        steps.run("denied", || Err(ProbeError::operation("read", "denied")));
        steps.run("explodes", || panic!("step blew up"));
        steps.run("fine", || Ok(json!({ "bytes": 3 })));
        Ok(steps.into_report())
    }
}

#[tokio::test]
async fn test_nested_probe_runs_every_step() {
    let sink = Arc::new(MemorySink::new());
    let plan = ProbePlan::new()
        .with(ThreeSteps)
        .unwrap()
        .with(MockProbe::succeed("after"))
        .unwrap();

    orchestrator(sink.clone()).run(plan, &ctx()).await;
    let events = sink.drain();

    let nested = &events[0];
    assert_eq!(nested.isolation, Isolation::BestEffortNested);
    assert_eq!(nested.category.as_str(), "future-surface");
    assert_eq!(nested.outcome.status, ProbeStatus::AttemptedFailed);

    let steps = nested.outcome.detail.as_value()["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[1]["detail"]["error"]["kind"], "panic");
    assert_eq!(steps[2]["ok"], true);
    assert_eq!(events[1].outcome.status, ProbeStatus::Success);
}

/// Wire format: the fields downstream consumers rely on
#[tokio::test]
async fn test_signal_event_wire_fields() {
    let sink = Arc::new(MemorySink::new());
    let plan = ProbePlan::new()
        .with(MockProbe::succeed("wire").with_category(ProbeCategory::Crypto))
        .unwrap();

    orchestrator(sink.clone()).run(plan, &ctx()).await;
    let value = serde_json::to_value(&sink.drain()[0]).unwrap();

    for field in ["probeId", "category", "status", "detail", "durationMs", "timestamp"] {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(value["category"], "crypto");
    assert_eq!(value["status"], "success");
}

#[test]
fn test_report_helpers_map_to_statuses() {
    assert_eq!(Report::from_ok(true, "x").status, ProbeStatus::Success);
    assert_eq!(Report::from_ok(false, "x").status, ProbeStatus::AttemptedFailed);
}
