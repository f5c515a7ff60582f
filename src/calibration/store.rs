//! Persistence of the capture region as a small JSON file.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::region::CaptureRegion;

/// Reads and writes the capture region file.
#[derive(Clone, Debug)]
pub struct RegionStore {
    path: PathBuf,
}

impl RegionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved region.
    ///
    /// Returns `Ok(None)` when no file exists; an unreadable or invalid file
    /// is an error and is left on disk.
    pub fn load(&self) -> Result<Option<CaptureRegion>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let region = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(region))
    }

    /// Overwrites the file with `region`.
    ///
    /// Writes to a temporary file in the same directory and renames it over
    /// the target, so readers never observe a partial file.
    pub fn save(&self, region: &CaptureRegion) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        serde_json::to_writer(&mut temp, region)?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|e| anyhow!("Failed to write {}: {}", self.path.display(), e.error))?;
        Ok(())
    }
}
