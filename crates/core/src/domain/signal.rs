// Signal Event - one transcript entry per executed probe

use serde::{Deserialize, Serialize};

use super::outcome::Outcome;
use super::probe::{Isolation, ProbeCategory, ProbeId};

/// A probe's identity paired with its outcome
///
/// Wire format is flat: `sequence, probeId, category, isolation, status,
/// detail, durationMs, timestamp`. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEvent {
    /// 0-based execution index within the run
    pub sequence: u64,
    pub probe_id: ProbeId,
    pub category: ProbeCategory,
    pub isolation: Isolation,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProbeStatus, Report};
    use chrono::Utc;

    #[test]
    fn test_wire_format_is_flat() {
        let event = SignalEvent {
            sequence: 3,
            probe_id: "dns-lookup".to_string(),
            category: ProbeCategory::Network,
            isolation: Isolation::CatchAndContinue,
            outcome: Outcome::from_report(Report::attempted_failed("refused"), 7, Utc::now()),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["probeId"], "dns-lookup");
        assert_eq!(value["category"], "network");
        assert_eq!(value["status"], "attempted-failed");
        assert_eq!(value["detail"], "refused");
        assert_eq!(value["durationMs"], 7);
        assert!(value.get("outcome").is_none());

        let parsed: SignalEvent = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.outcome.status, ProbeStatus::AttemptedFailed);
    }
}
