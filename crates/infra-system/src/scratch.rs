// Scratch workspace: one isolated temp directory per run
// reason: tempfile for collision-free naming under the platform temp root
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use probebench_core::HarnessError;

/// Directory name prefix under the temp root
pub const SCRATCH_PREFIX: &str = "probebench-";

/// Run-scoped scratch directory
///
/// Release is best-effort and idempotent; `Drop` releases too, so every exit
/// path (normal completion, early return, unwinding) removes the directory.
pub struct ScratchWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchWorkspace {
    /// Create a uniquely-named directory under the platform temp root
    pub fn acquire() -> Result<Self, HarnessError> {
        Self::acquire_in(std::env::temp_dir())
    }

    /// Create a uniquely-named directory under `root`
    pub fn acquire_in(root: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let root = root.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(root)
            .map_err(|e| {
                HarnessError::Workspace(format!(
                    "cannot create scratch dir under {}: {}",
                    root.display(),
                    e
                ))
            })?;
        let path = dir.path().to_path_buf();

        info!(path = %path.display(), "Scratch workspace acquired");

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory recursively; failures are logged, never raised
    pub fn release(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        match dir.close() {
            Ok(()) => debug!(path = %self.path.display(), "Scratch workspace removed"),
            Err(e) if !self.path.exists() => {
                debug!(path = %self.path.display(), error = %e, "Scratch workspace already gone");
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Scratch workspace cleanup failed"
                );
            }
        }
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_unique_dirs() {
        let root = tempfile::tempdir().unwrap();
        let a = ScratchWorkspace::acquire_in(root.path()).unwrap();
        let b = ScratchWorkspace::acquire_in(root.path()).unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(SCRATCH_PREFIX));
    }

    #[test]
    fn test_release_removes_nested_content() {
        let root = tempfile::tempdir().unwrap();
        let mut ws = ScratchWorkspace::acquire_in(root.path()).unwrap();
        let nested = ws.path().join("deep/er");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("f.txt"), b"x").unwrap();
        let path = ws.path().to_path_buf();

        ws.release();
        assert!(!path.exists());

        // idempotent
        ws.release();
    }

    #[test]
    fn test_release_tolerates_missing_dir() {
        let root = tempfile::tempdir().unwrap();
        let mut ws = ScratchWorkspace::acquire_in(root.path()).unwrap();
        std::fs::remove_dir_all(ws.path()).unwrap();

        ws.release();
        assert!(!ws.path().exists());
    }

    #[test]
    fn test_drop_releases() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let ws = ScratchWorkspace::acquire_in(root.path()).unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_acquire_under_missing_root_fails() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("does-not-exist");
        assert!(matches!(
            ScratchWorkspace::acquire_in(&missing),
            Err(HarnessError::Workspace(_))
        ));
    }
}
