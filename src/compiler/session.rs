//! The isolated execution context and temporary-file lifecycle.
//!
//! Parsing arbitrary user markup and building the intermediate assembly
//! happen on a dedicated worker with its own resolver index; nothing it
//! loads outlives the call. Temp paths are deleted only after the worker
//! has terminated, which is what makes deletion safe.

use std::io;
use std::path::{Path, PathBuf};

/// Tracks every temporary path created during one compile call.
#[derive(Debug, Default)]
pub(crate) struct TempTracker {
    paths: Vec<PathBuf>,
}

impl TempTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh, atomically created temp directory and tracks it.
    pub fn allocate_dir(&mut self) -> io::Result<PathBuf> {
        let dir = tempfile::Builder::new().prefix("telar-").tempdir()?;
        // Ownership of deletion moves to the tracker.
        let path = dir.keep();
        self.paths.push(path.clone());
        Ok(path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Best-effort deletion, newest first. Failures are logged and
    /// swallowed; cleanup is advisory, the result is already produced.
    pub fn cleanup(&self) {
        for path in self.paths.iter().rev() {
            if let Err(error) = remove_path(path) {
                if error.kind() != io::ErrorKind::NotFound {
                    log::warn!("failed to delete temp path {}: {}", path.display(), error);
                }
            }
        }
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Runs `job` on a dedicated worker thread and joins it.
///
/// `Err` means the worker panicked; the orchestrator converts that into
/// the single "unknown compiler exception" diagnostic instead of
/// propagating the panic to the caller.
pub(crate) fn run_isolated<T, F>(job: F) -> Result<T, ()>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    std::thread::scope(|scope| scope.spawn(job).join().map_err(|_| ()))
}
