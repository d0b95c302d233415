//! File system utilities for bundling.
//!
//! Provides file operations with automatic directory creation,
//! symlink preservation, and path-carrying errors.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Outcome of [`delete_files`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    /// Files that existed and were removed.
    pub deleted: Vec<PathBuf>,
    /// Files that were already absent.
    pub missing: Vec<PathBuf>,
}

/// Creates all of the directories of the specified path.
///
/// Existing content is kept; steps overwrite the files they produce.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Reads a whole file as raw bytes.
pub async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).await.fs_context("reading file", path)
}

/// Writes `contents` to `path`, replacing any existing file and creating
/// parent directories as needed.
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating parent directory", parent)?;
    }
    fs::write(path, contents).await.fs_context("writing file", path)
}

/// Deletes every file in `files`.
///
/// Files that do not exist are not an error; they are reported in
/// [`DeleteReport::missing`]. Any other failure aborts.
pub async fn delete_files<P: AsRef<Path>>(files: &[P]) -> Result<DeleteReport> {
    let mut report = DeleteReport::default();

    for file in files {
        let file = file.as_ref();
        match fs::remove_file(file).await {
            Ok(()) => {
                log::info!("Deleted file: {}", file.display());
                report.deleted.push(file.to_path_buf());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("File not available: {}", file.display());
                report.missing.push(file.to_path_buf());
            }
            Err(e) => return Err(e).fs_context("deleting file", file),
        }
    }

    Ok(report)
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Replaces whatever is at `dest` with a symlink to `target`.
fn replace_with_symlink(target: &Path, dest: &Path, is_dir: bool) -> io::Result<()> {
    match std::fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() && !meta.file_type().is_symlink() => {
            std::fs::remove_dir_all(dest)?
        }
        Ok(_) => std::fs::remove_file(dest)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    if is_dir {
        symlink_dir(target, dest)
    } else {
        symlink_file(target, dest)
    }
}

/// Recursively copies a directory into `to`, creating `to` and any missing
/// parents. Existing files at the destination are overwritten.
///
/// Preserves symlinks on platforms that support them.
/// Returns the number of regular files copied.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<usize> {
        std::fs::create_dir_all(&to).fs_context("creating destination directory", &to)?;

        let mut copied = 0;
        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            debug_assert!(entry.path().starts_with(&from));
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target =
                    std::fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
                replace_with_symlink(&target, &dest_path, entry.path().is_dir())
                    .fs_context("creating symlink", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
                copied += 1;
            }
        }

        Ok(copied)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}
