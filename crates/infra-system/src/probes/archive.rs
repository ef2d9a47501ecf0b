// Archive probes: create a gzip tarball, then try to parse it as a zip
// reason: tar + flate2 for creation, zip for the (expected to fail) parse
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;
use std::fs::File;
use std::path::Path;

use probebench_core::application::NestedSteps;
use probebench_core::domain::{Isolation, ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeError, ProbeResult};

use super::filesystem::SEED_FILE_NAME;
use super::io_failure;

pub const ARCHIVE_FILE_NAME: &str = "out.tgz";

/// Pack the seed file into `out.tgz`
pub struct TarGzipProbe;

fn build_tarball(source: &Path, archive: &Path) -> std::io::Result<u64> {
    let file = File::create(archive)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.append_path_with_name(source, SEED_FILE_NAME)?;
    builder.into_inner()?.finish()?;
    Ok(std::fs::metadata(archive)?.len())
}

#[async_trait]
impl Probe for TarGzipProbe {
    fn id(&self) -> &str {
        "tar-gzip-create"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Archive
    }

    async fn execute(&self, ctx: &ProbeContext) -> ProbeResult {
        let source = ctx.scratch_path(SEED_FILE_NAME);
        let archive = ctx.scratch_path(ARCHIVE_FILE_NAME);

        let (source, archive, built) = tokio::task::spawn_blocking(move || {
            let built = build_tarball(&source, &archive);
            (source, archive, built)
        })
        .await
        .map_err(|e| ProbeError::Internal(format!("archive task failed: {}", e)))?;

        match built {
            Ok(bytes) => Ok(Report::success(json!({
                "archive": archive.display().to_string(),
                "entries": [SEED_FILE_NAME],
                "bytes": bytes,
            }))),
            Err(e) => Ok(io_failure(&source, &e)),
        }
    }
}

/// Feed the gzip tarball to a zip parser
///
/// Exercises the parse path; with a real tarball the parse is rejected and the
/// probe reports attempted-failed.
pub struct ZipParseProbe;

fn parse_zip(path: &Path) -> Result<serde_json::Value, ProbeError> {
    let file = File::open(path)?;
    let archive = zip::ZipArchive::new(file)
        .map_err(|e| ProbeError::operation("zip-parse", e.to_string()))?;
    Ok(json!({ "entries": archive.len() }))
}

#[async_trait]
impl Probe for ZipParseProbe {
    fn id(&self) -> &str {
        "zip-parse"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Archive
    }

    fn isolation(&self) -> Isolation {
        Isolation::BestEffortNested
    }

    async fn execute(&self, ctx: &ProbeContext) -> ProbeResult {
        let archive = ctx.scratch_path(ARCHIVE_FILE_NAME);

        let steps = tokio::task::spawn_blocking(move || {
            let mut steps = NestedSteps::new();
            steps.run("stat", || {
                let len = std::fs::metadata(&archive)?.len();
                Ok(json!({ "path": archive.display().to_string(), "bytes": len }))
            });
            steps.run("parse-zip", || parse_zip(&archive));
            steps
        })
        .await
        .map_err(|e| ProbeError::Internal(format!("zip parse task failed: {}", e)))?;

        Ok(steps.into_report())
    }
}
