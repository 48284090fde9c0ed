use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SweepError;

/// A grant for reading a user-chosen folder outside the default developer
/// root, held for the lifetime of the orchestrator that needs it.
///
/// Readability is verified once at acquisition. When acquisition fails the
/// affected location degrades to "no entries found" instead of erroring.
#[derive(Debug)]
pub struct ScopedAccess {
    path: PathBuf,
}

impl ScopedAccess {
    pub fn acquire(path: &Path) -> Result<Self, SweepError> {
        fs::read_dir(path).map_err(|_| SweepError::AccessDenied(path.to_path_buf()))?;

        tracing::debug!(path = %path.display(), "acquired scoped access");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedAccess {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "released scoped access");
    }
}
