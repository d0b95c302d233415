//! Top-level error types for the CLI.
//!
//! Wraps pipeline errors and adds argument and config-file failures, each with
//! recovery suggestions printed next to the message.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pipeline errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Config file could not be read
    #[error("Cannot read config file {}: {reason}", .path.display())]
    ConfigFile {
        /// Config file path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as E;

        let root = match self {
            Self::Bundler(e) => innermost(e),
            Self::Toml(_) => {
                return vec!["Check the config file against the documented keys".to_string()];
            }
            Self::Cli(_) => return vec!["Run with --help to see the accepted flags".to_string()],
            Self::Io(_) => return vec!["Check the error message above for specific details".to_string()],
        };

        match root {
            E::CommandFailed { command, .. } => vec![
                format!("Check that the program of `{}` is installed and on PATH", command),
                "Install the packager with `npm i -g pkg`".to_string(),
            ],
            E::CommandStderr { .. } => vec![
                "The command succeeded but printed warnings; pass --allow-stderr to accept them"
                    .to_string(),
            ],
            E::CommandTimeout { .. } => {
                vec!["Raise the limit with --command-timeout <SECS>".to_string()]
            }
            E::Fs { path, .. } => vec![format!(
                "Check that {} exists and is accessible from the current directory",
                path.display()
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Unwraps stage and context layers down to the original failure.
fn innermost(error: &crate::bundler::Error) -> &crate::bundler::Error {
    use crate::bundler::Error as E;
    match error {
        E::Stage { source, .. } | E::Context { source, .. } => innermost(source),
        other => other,
    }
}
