//! External tool detection and availability checking.

use std::{ffi::OsStr, path::PathBuf, sync::LazyLock};

/// npm version reported by `npm --version`, `None` when npm is unusable.
///
/// Cached to avoid repeated subprocess calls.
pub static NPM_VERSION: LazyLock<Option<String>> = LazyLock::new(|| match which::which("npm") {
    Ok(path) => match std::process::Command::new(&path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            log::info!("✓ npm available: {}", version);
            Some(version)
        }
        Ok(output) => {
            log::warn!(
                "npm found at {} but --version failed (exit code: {:?}). Stderr: {}",
                path.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            );
            None
        }
        Err(e) => {
            log::warn!(
                "npm found at {} but failed to execute: {}. Check file permissions.",
                path.display(),
                e
            );
            None
        }
    },
    Err(e) => {
        log::debug!("npm not found in PATH: {}", e);
        None
    }
});

/// Looks `program` up on `PATH`.
pub fn find_tool(program: &OsStr) -> Option<PathBuf> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program.to_string_lossy(), path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", program.to_string_lossy(), e);
            None
        }
    }
}
