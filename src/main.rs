//! Nodepack Bundler - release packager for a Node.js application.
//!
//! Produces `<dist>/<BUILD_ID>/` with the packaged `run` and `setup` binaries,
//! the frontend bundle and a trimmed `package.json`, plus `<dist>/<BUILD_ID>.zip`.

use nodepack_bundler::{
    BundlerError,
    cli::{self, OutputManager},
};
use std::process;

#[tokio::main]
async fn main() {
    // Logging is initialized by the CLI once verbosity is known
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            1
        }
    };

    process::exit(exit_code);
}

fn report_error(error: &BundlerError) {
    let output = OutputManager::new(false, false);
    if output.error(&error.to_string()).is_err() {
        eprintln!("Error: {}", error);
    }
    for suggestion in error.recovery_suggestions() {
        eprintln!("  hint: {}", suggestion);
    }
}
