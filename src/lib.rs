//! Release packager for a Node.js application.
//!
//! Turns a server checkout into a self-contained executable, a setup
//! executable, the frontend bundle and a trimmed `package.json`, all zipped
//! under a unique build id. Usable as a CLI or as a library through
//! [`bundler::Pipeline`].

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
