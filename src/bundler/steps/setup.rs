//! Setup binary build.
//!
//! The setup binary ships next to `run` and installs the manifest's
//! dependencies on the target machine.

use super::template::SETUP_TEMPLATE;
use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::{
        fs::{self, DeleteReport},
        process::CommandRunner,
    },
};
use handlebars::Handlebars;
use std::{collections::BTreeMap, path::PathBuf};

/// Renders the setup script source for `install_command`.
pub fn render_setup_script(install_command: &str) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let mut data = BTreeMap::new();
    data.insert("install_command", serde_json::to_string(install_command)?);

    Ok(handlebars.render_template(SETUP_TEMPLATE, &data)?)
}

/// Writes the setup script, packages it into `<output>/setup` and deletes
/// the script source.
///
/// A failure leaves any partial artifacts in place.
pub async fn build_setup_binary(
    settings: &Settings,
    runner: &CommandRunner,
) -> Result<(PathBuf, DeleteReport)> {
    let script = render_setup_script(&settings.packager().setup_install_command)?;
    let script_path = settings.setup_script_path();
    fs::write_file(&script_path, script).await?;

    let output = settings.setup_binary_path();
    let command = settings.packager_command(&script_path, &output)?;
    runner.run(&command).await?;

    let cleanup = fs::delete_files(&[&script_path]).await?;
    log::info!("Built setup binary {}", output.display());
    Ok((output, cleanup))
}
