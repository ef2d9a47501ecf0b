// Typed payload validation
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use probebench_core::domain::{ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeResult};

/// Category name for probes outside the built-in surfaces
pub const SCHEMA_CATEGORY: &str = "schema";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Ack {
    ok: bool,
}

/// Strictly deserialize a fixed payload into a typed struct
pub struct SchemaValidateProbe {
    payload: serde_json::Value,
}

impl SchemaValidateProbe {
    pub fn new(payload: serde_json::Value) -> Self {
        Self { payload }
    }
}

impl Default for SchemaValidateProbe {
    fn default() -> Self {
        Self::new(json!({ "ok": true }))
    }
}

#[async_trait]
impl Probe for SchemaValidateProbe {
    fn id(&self) -> &str {
        "schema-validate"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Other(SCHEMA_CATEGORY.to_string())
    }

    async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
        match serde_json::from_value::<Ack>(self.payload.clone()) {
            Ok(ack) => Ok(Report::from_ok(ack.ok, json!({ "ok": ack.ok }))),
            Err(e) => Ok(Report::attempted_failed(json!({
                "error": { "kind": "schema", "message": e.to_string() },
            }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probebench_core::domain::ProbeStatus;

    fn ctx() -> ProbeContext {
        ProbeContext::new("run", std::env::temp_dir())
    }

    #[tokio::test]
    async fn test_default_payload_validates() {
        let report = SchemaValidateProbe::default().execute(&ctx()).await.unwrap();
        assert_eq!(report.status, ProbeStatus::Success);
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let report = SchemaValidateProbe::new(json!({ "ok": true, "extra": 1 }))
            .execute(&ctx())
            .await
            .unwrap();
        assert_eq!(report.status, ProbeStatus::AttemptedFailed);
        assert_eq!(report.detail.as_value()["error"]["kind"], "schema");
    }

    #[test]
    fn test_open_category() {
        assert_eq!(
            SchemaValidateProbe::default().category().as_str(),
            SCHEMA_CATEGORY
        );
    }
}
