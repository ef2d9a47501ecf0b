// Concrete probes, one module per system surface
//
// Each probe folds expected failures (permission denied, connection refused,
// missing toolchain) into its own report. Errors it raises are left to the
// orchestrator's isolation boundary.

pub mod archive;
pub mod crypto;
pub mod disabled;
pub mod env;
pub mod exec;
pub mod filesystem;
pub mod network;
pub mod schema;
pub mod sensitive;
pub mod toolchain;

pub use archive::{TarGzipProbe, ZipParseProbe};
pub use crypto::Pbkdf2Probe;
pub use disabled::DisabledProbe;
pub use env::EnvTamperProbe;
pub use exec::ShellSpawnProbe;
pub use filesystem::ScratchWriteProbe;
pub use network::{DnsLookupProbe, HttpProbe};
pub use schema::SchemaValidateProbe;
pub use sensitive::SensitiveReadProbe;
pub use toolchain::{PackageInstallProbe, RustcBuildProbe};

use probebench_core::domain::Report;
use serde_json::json;
use std::path::Path;

/// Report for an expected IO failure on `path`
pub(crate) fn io_failure(path: &Path, error: &std::io::Error) -> Report {
    Report::attempted_failed(json!({
        "path": path.display().to_string(),
        "error": {
            "kind": format!("io:{:?}", error.kind()),
            "message": error.to_string(),
        }
    }))
}
