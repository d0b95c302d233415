//! Error types for the bundling pipeline.
//!
//! Every failure is fatal. Errors carry enough context (the command line, the
//! file path, the pipeline stage) to be printed as-is by the CLI.

use super::builder::PipelineStage;
use std::{
    fmt::Display,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error as ThisError;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a release.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Free-form failure.
    #[error("{0}")]
    GenericError(String),

    /// Raw I/O failure without path context.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Filesystem failure on a known path.
    #[error("{context} ({}): {error}", .path.display())]
    Fs {
        /// What the pipeline was doing.
        context: String,
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        error: std::io::Error,
    },

    /// The command could not be spawned or waited on.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Full command line.
        command: String,
        /// Underlying error.
        error: std::io::Error,
    },

    /// The command exited with a non-zero status.
    #[error("`{command}` exited with {code}{}", stderr_suffix(.stderr))]
    CommandExit {
        /// Full command line.
        command: String,
        /// Exit code, `-1` when terminated by a signal.
        code: i32,
        /// Captured stderr.
        stderr: String,
    },

    /// The command succeeded but wrote to stderr while stderr is treated as fatal.
    #[error("`{command}` wrote to stderr: {stderr}")]
    CommandStderr {
        /// Full command line.
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// The command ran longer than the configured timeout and was killed.
    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    CommandTimeout {
        /// Full command line.
        command: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },

    /// JSON (manifest) failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Setup script template failure.
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Archive writer failure.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal failure.
    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix mismatch while mapping source to destination.
    #[error("path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Error wrapped with a description of the operation.
    #[error("{context}: {source}")]
    Context {
        /// What the pipeline was doing.
        context: String,
        /// Underlying error.
        source: Box<Error>,
    },

    /// Failure of a pipeline stage.
    #[error("{} failed: {source}", .stage.action())]
    Stage {
        /// Stage that was being entered.
        stage: PipelineStage,
        /// Underlying error.
        source: Box<Error>,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Attaches path context to I/O results.
pub trait ErrorExt<T> {
    /// Converts an I/O error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::io::Result<T> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Adds a description to failures.
pub trait Context<T> {
    /// Wraps the failure with a lazily built description.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display,
        F: FnOnce() -> C;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context {
            context: f().to_string(),
            source: Box::new(e.into()),
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_exit_message_includes_trimmed_stderr() {
        let err = Error::CommandExit {
            command: "pkg www -o run".into(),
            code: 2,
            stderr: "  boom\n".into(),
        };
        assert_eq!(err.to_string(), "`pkg www -o run` exited with 2: boom");

        let quiet = Error::CommandExit {
            command: "pkg".into(),
            code: 1,
            stderr: String::new(),
        };
        assert_eq!(quiet.to_string(), "`pkg` exited with 1");
    }

    #[test]
    fn fs_context_keeps_path() {
        let res: std::io::Result<()> = Err(std::io::Error::from(std::io::ErrorKind::NotFound));
        let err = res.fs_context("reading entry file", "bin/www").unwrap_err();
        match err {
            Error::Fs { context, path, .. } => {
                assert_eq!(context, "reading entry file");
                assert_eq!(path, PathBuf::from("bin/www"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn with_context_wraps_converted_error() {
        let parsed: std::result::Result<serde_json::Value, serde_json::Error> =
            serde_json::from_str("{ not json");
        let err = parsed
            .with_context(|| "parsing manifest package.json")
            .unwrap_err();

        assert!(matches!(&err, Error::Context { source, .. } if matches!(**source, Error::Json(_))));
        assert!(err.to_string().starts_with("parsing manifest package.json: JSON error:"));

        let staged = Error::Stage {
            stage: PipelineStage::AssetsCopied,
            source: Box::new(err),
        };
        assert!(staged.to_string().starts_with("copying assets failed: parsing manifest"));
    }
}
