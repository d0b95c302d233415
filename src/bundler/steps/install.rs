//! Dependency installer.

use crate::bundler::{
    builder::tool_detection,
    error::Result,
    settings::Settings,
    utils::process::CommandRunner,
};

/// Runs the configured package-installation commands in order.
///
/// Stops at the first failing command. There is no "already installed"
/// check; every run reinstalls. Returns the number of commands run.
pub async fn install_dependencies(settings: &Settings, runner: &CommandRunner) -> Result<usize> {
    if settings.packager().skip_install {
        log::info!("Skipping dependency installation");
        return Ok(0);
    }

    let commands = settings.install_commands();
    if let Some(version) = tool_detection::NPM_VERSION.as_deref() {
        log::debug!("Using npm {}", version);
    }

    for command in &commands {
        if tool_detection::find_tool(command.program()).is_none() {
            log::warn!(
                "`{}` not found in PATH, `{}` will likely fail",
                command.program().to_string_lossy(),
                command.display()
            );
        }
        runner.run(command).await?;
    }

    log::info!("Installed dependencies ({} commands)", commands.len());
    Ok(commands.len())
}
