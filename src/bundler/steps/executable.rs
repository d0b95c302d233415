//! Application binary build.

use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::{fs, process::CommandRunner},
};
use std::path::PathBuf;

/// Packages the (patched) entry file into `<output>/run`.
///
/// The packager's exit status is the only check made.
pub async fn build_executable(settings: &Settings, runner: &CommandRunner) -> Result<PathBuf> {
    let output_dir = settings.output_dir();
    fs::create_dir_all(&output_dir).await?;

    let output = settings.run_binary_path();
    let command = settings.packager_command(settings.entry_file(), &output)?;
    runner.run(&command).await?;

    log::info!("Built executable {}", output.display());
    Ok(output)
}
