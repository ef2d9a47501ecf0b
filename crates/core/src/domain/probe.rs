// Probe Domain Model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Probe ID (unique within a run)
pub type ProbeId = String;

/// System surface a probe exercises
///
/// Open enum: consumers must tolerate categories introduced by newer probes,
/// so any unrecognized name round-trips through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProbeCategory {
    Filesystem,
    SensitiveAccess,
    EnvMutation,
    Exec,
    Network,
    MetadataProbe,
    Crypto,
    Archive,
    Toolchain,
    Other(String),
}

impl ProbeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ProbeCategory::Filesystem => "filesystem",
            ProbeCategory::SensitiveAccess => "sensitive-access",
            ProbeCategory::EnvMutation => "env-mutation",
            ProbeCategory::Exec => "exec",
            ProbeCategory::Network => "network",
            ProbeCategory::MetadataProbe => "metadata-probe",
            ProbeCategory::Crypto => "crypto",
            ProbeCategory::Archive => "archive",
            ProbeCategory::Toolchain => "toolchain",
            ProbeCategory::Other(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        match name {
            "filesystem" => ProbeCategory::Filesystem,
            "sensitive-access" => ProbeCategory::SensitiveAccess,
            "env-mutation" => ProbeCategory::EnvMutation,
            "exec" => ProbeCategory::Exec,
            "network" => ProbeCategory::Network,
            "metadata-probe" => ProbeCategory::MetadataProbe,
            "crypto" => ProbeCategory::Crypto,
            "archive" => ProbeCategory::Archive,
            "toolchain" => ProbeCategory::Toolchain,
            other => ProbeCategory::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProbeCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProbeCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ProbeCategory::parse(&name))
    }
}

/// How far failure containment reaches for a probe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Isolation {
    /// Orchestrator boundary only: a raised error becomes attempted-failed
    #[default]
    CatchAndContinue,
    /// Sub-steps are also caught individually inside the probe
    BestEffortNested,
}

impl std::fmt::Display for Isolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Isolation::CatchAndContinue => write!(f, "catch-and-continue"),
            Isolation::BestEffortNested => write!(f, "best-effort-nested"),
        }
    }
}
