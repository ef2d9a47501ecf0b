// CPU-bound key derivation
// reason: pbkdf2 + sha2 for PBKDF2-HMAC-SHA256, run on the blocking pool
use async_trait::async_trait;
use serde_json::json;
use sha2::Sha256;

use probebench_core::domain::{ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeError, ProbeResult};

pub const DEFAULT_PBKDF2_ROUNDS: u32 = 200_000;
pub const PBKDF2_KEY_LEN: usize = 32;
const PBKDF2_PASSWORD: &[u8] = b"pw";
const PBKDF2_SALT: &[u8] = b"salt";

pub struct Pbkdf2Probe {
    rounds: u32,
}

impl Pbkdf2Probe {
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }
}

impl Default for Pbkdf2Probe {
    fn default() -> Self {
        Self::new(DEFAULT_PBKDF2_ROUNDS)
    }
}

/// Derive the fixed test key with `rounds` iterations
pub fn derive_key(rounds: u32) -> [u8; PBKDF2_KEY_LEN] {
    let mut key = [0u8; PBKDF2_KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(PBKDF2_PASSWORD, PBKDF2_SALT, rounds, &mut key);
    key
}

#[async_trait]
impl Probe for Pbkdf2Probe {
    fn id(&self) -> &str {
        "pbkdf2-sha256"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Crypto
    }

    async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
        let rounds = self.rounds;
        let key = tokio::task::spawn_blocking(move || derive_key(rounds))
            .await
            .map_err(|e| ProbeError::Internal(format!("key derivation task failed: {}", e)))?;

        Ok(Report::success(json!({
            "algorithm": "pbkdf2-hmac-sha256",
            "rounds": rounds,
            "keyLen": PBKDF2_KEY_LEN,
            "digest": hex::encode(key),
        })))
    }
}
