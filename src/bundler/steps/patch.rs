//! Entry file patching.
//!
//! The entry file is a shared resource on disk: it is patched in place for
//! the packager and must end up byte-identical to what it was. [`PatchedEntry`]
//! owns the original bytes; `restore()` puts them back on the success path and
//! `Drop` puts them back on every other path.

use crate::bundler::{
    error::{ErrorExt, Result},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// An entry file currently holding patched content.
#[derive(Debug)]
#[must_use = "dropping a PatchedEntry immediately restores the original file"]
pub struct PatchedEntry {
    path: PathBuf,
    original: Vec<u8>,
    restored: bool,
}

impl PatchedEntry {
    /// Appends `snippet` to the file at `path`, keeping the original bytes.
    pub async fn apply(path: &Path, snippet: &str) -> Result<Self> {
        let original = fs::read_bytes(path).await?;

        let mut patched = Vec::with_capacity(original.len() + snippet.len());
        patched.extend_from_slice(&original);
        patched.extend_from_slice(snippet.as_bytes());

        // Guard exists before the write so a partial write is rolled back too
        let guard = Self {
            path: path.to_path_buf(),
            original,
            restored: false,
        };
        tokio::fs::write(&guard.path, &patched)
            .await
            .fs_context("writing patched entry file", &guard.path)?;

        log::info!(
            "Patched entry file {} (+{} bytes)",
            guard.path.display(),
            snippet.len()
        );
        Ok(guard)
    }

    /// Content of the file before patching.
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// Writes the original content back.
    pub async fn restore(mut self) -> Result<()> {
        tokio::fs::write(&self.path, &self.original)
            .await
            .fs_context("restoring entry file", &self.path)?;
        self.restored = true;
        log::info!("Restored entry file {}", self.path.display());
        Ok(())
    }
}

impl Drop for PatchedEntry {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        log::warn!(
            "Build interrupted, restoring entry file {}",
            self.path.display()
        );
        if let Err(e) = std::fs::write(&self.path, &self.original) {
            log::error!(
                "Failed to restore entry file {}: {}. Restore it from version control.",
                self.path.display(),
                e
            );
        }
    }
}
