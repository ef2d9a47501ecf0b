// Filesystem probe: write into the scratch workspace, then walk it
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};

use probebench_core::domain::{ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeResult};

use super::io_failure;

/// Seed file later probes (archive) depend on
pub const SEED_FILE_NAME: &str = "a.txt";
pub const SEED_FILE_CONTENTS: &[u8] = b"hello\n";

pub struct ScratchWriteProbe;

#[async_trait]
impl Probe for ScratchWriteProbe {
    fn id(&self) -> &str {
        "fs-scratch-write"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Filesystem
    }

    async fn execute(&self, ctx: &ProbeContext) -> ProbeResult {
        let target = ctx.scratch_path(SEED_FILE_NAME);
        if let Err(e) = tokio::fs::write(&target, SEED_FILE_CONTENTS).await {
            return Ok(io_failure(&target, &e));
        }

        let files = match walk_files(&ctx.scratch_dir) {
            Ok(files) => files,
            Err(e) => return Ok(io_failure(&ctx.scratch_dir, &e)),
        };

        Ok(Report::success(json!({
            "path": target.display().to_string(),
            "bytes": SEED_FILE_CONTENTS.len(),
            "files": files.len(),
        })))
    }
}

/// Every regular file below `dir`, recursively
pub fn walk_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(walk_files(&path)?);
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use probebench_core::domain::ProbeStatus;

    #[tokio::test]
    async fn test_writes_seed_file_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/other.txt"), b"x").unwrap();
        let ctx = ProbeContext::new("run", dir.path());

        let report = ScratchWriteProbe.execute(&ctx).await.unwrap();

        assert_eq!(report.status, ProbeStatus::Success);
        assert_eq!(report.detail.as_value()["files"], 2);
        assert_eq!(
            std::fs::read(dir.path().join(SEED_FILE_NAME)).unwrap(),
            SEED_FILE_CONTENTS
        );
    }

    #[tokio::test]
    async fn test_missing_scratch_dir_is_attempted_failed() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProbeContext::new("run", dir.path().join("gone"));

        let report = ScratchWriteProbe.execute(&ctx).await.unwrap();

        assert_eq!(report.status, ProbeStatus::AttemptedFailed);
        assert_eq!(report.detail.as_value()["error"]["kind"], "io:NotFound");
    }
}
