//! Core Settings struct and implementations.

use super::{AppSettings, PackagerSettings};
use crate::bundler::{
    BuildId,
    error::{Error, Result},
    utils::process::{CommandRunner, CommandSpec},
};
use std::path::{Path, PathBuf};

/// Default root of all build outputs.
pub const DEFAULT_DIST_DIR: &str = "./dist";

/// File name of the packaged application binary.
pub const RUN_BINARY_NAME: &str = "run";

/// File name of the packaged setup binary.
pub const SETUP_BINARY_NAME: &str = "setup";

/// File name of the setup script source, deleted once compiled.
pub const SETUP_SCRIPT_NAME: &str = "setup.js";

/// File name of the trimmed manifest written into the output.
pub const OUTPUT_MANIFEST_NAME: &str = "package.json";

/// Settings for one pipeline run, constructed via [`SettingsBuilder`].
///
/// Every output path is derived from `dist_dir` and the [`BuildId`]:
///
/// ```text
/// <dist_dir>/<BUILD_ID>/run
/// <dist_dir>/<BUILD_ID>/setup
/// <dist_dir>/<BUILD_ID>/package.json
/// <dist_dir>/<BUILD_ID>/<frontend_dest>/...
/// <dist_dir>/<BUILD_ID>.zip
/// ```
///
/// [`SettingsBuilder`]: super::SettingsBuilder
#[derive(Clone, Debug)]
pub struct Settings {
    /// Application source locations.
    app: AppSettings,

    /// External tool configuration.
    packager: PackagerSettings,

    /// Root directory for build outputs.
    dist_dir: PathBuf,

    /// Name of this run's output directory and archive.
    build_id: BuildId,
}

impl Settings {
    /// Returns the application settings.
    pub fn app(&self) -> &AppSettings {
        &self.app
    }

    /// Returns the packager settings.
    pub fn packager(&self) -> &PackagerSettings {
        &self.packager
    }

    /// Returns the build id of this run.
    pub fn build_id(&self) -> &BuildId {
        &self.build_id
    }

    /// Returns the entry file that gets patched.
    pub fn entry_file(&self) -> &Path {
        &self.app.entry_file
    }

    /// Returns the root directory for build outputs.
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Returns `<dist_dir>/<build_id>`.
    pub fn output_dir(&self) -> PathBuf {
        self.dist_dir.join(&self.build_id)
    }

    /// Returns `<dist_dir>/<build_id>.zip`.
    pub fn archive_path(&self) -> PathBuf {
        self.dist_dir.join(format!("{}.zip", self.build_id))
    }

    /// Returns the path of the packaged application binary.
    pub fn run_binary_path(&self) -> PathBuf {
        self.output_dir().join(RUN_BINARY_NAME)
    }

    /// Returns the path of the packaged setup binary.
    pub fn setup_binary_path(&self) -> PathBuf {
        self.output_dir().join(SETUP_BINARY_NAME)
    }

    /// Returns the temporary path of the setup script source.
    pub fn setup_script_path(&self) -> PathBuf {
        self.output_dir().join(SETUP_SCRIPT_NAME)
    }

    /// Returns where the frontend bundle is copied to.
    pub fn frontend_dest(&self) -> PathBuf {
        self.output_dir().join(&self.app.frontend_dest)
    }

    /// Returns the path of the trimmed manifest.
    pub fn output_manifest_path(&self) -> PathBuf {
        self.output_dir().join(OUTPUT_MANIFEST_NAME)
    }

    /// Builds a command runner honoring the timeout and stderr policy.
    pub fn command_runner(&self) -> CommandRunner {
        CommandRunner::new(self.packager.command_timeout, self.packager.fail_on_stderr)
    }

    /// Returns the dependency installer commands, skipping blank entries.
    pub fn install_commands(&self) -> Vec<CommandSpec> {
        self.packager
            .install_commands
            .iter()
            .filter_map(|line| CommandSpec::parse(line))
            .collect()
    }

    /// Builds `<packager> <input> [-t <target>] -o <output>`.
    pub fn packager_command(&self, input: &Path, output: &Path) -> Result<CommandSpec> {
        let mut spec = CommandSpec::parse(&self.packager.packager).ok_or_else(|| {
            Error::GenericError("packager command is empty".to_string())
        })?;
        spec = spec.arg(input);
        if let Some(target) = &self.packager.target {
            spec = spec.arg("-t").arg(target);
        }
        Ok(spec.arg("-o").arg(output))
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        app: AppSettings,
        packager: PackagerSettings,
        dist_dir: PathBuf,
        build_id: BuildId,
    ) -> Self {
        Self {
            app,
            packager,
            dist_dir,
            build_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::SettingsBuilder;
    use super::*;

    fn settings() -> Settings {
        SettingsBuilder::new()
            .dist_dir("out")
            .build_id(BuildId::from_millis(1_000))
            .build()
            .unwrap()
    }

    #[test]
    fn output_paths_are_derived_from_build_id() {
        let s = settings();
        let id = s.build_id().to_string();
        assert_eq!(s.output_dir(), Path::new("out").join(&id));
        assert_eq!(s.archive_path(), Path::new("out").join(format!("{id}.zip")));
        assert_eq!(s.run_binary_path(), s.output_dir().join("run"));
        assert_eq!(s.setup_binary_path(), s.output_dir().join("setup"));
        assert_eq!(
            s.frontend_dest(),
            s.output_dir().join("frontend/angular/dist/angular")
        );
    }

    #[test]
    fn packager_command_shape() {
        let s = settings();
        let cmd = s
            .packager_command(Path::new("bin/www"), Path::new("out/run"))
            .unwrap();
        assert_eq!(cmd.display(), "pkg bin/www -o out/run");

        let targeted = SettingsBuilder::new()
            .packager("npx pkg")
            .target("node18-win-x64")
            .build()
            .unwrap();
        let cmd = targeted
            .packager_command(Path::new("www"), Path::new("run"))
            .unwrap();
        assert_eq!(cmd.display(), "npx pkg www -t node18-win-x64 -o run");
    }

    #[test]
    fn default_install_commands() {
        let cmds: Vec<_> = settings()
            .install_commands()
            .iter()
            .map(CommandSpec::display)
            .collect();
        assert_eq!(cmds, ["npm i fs-extra", "npm i archiver", "npm i -g pkg"]);
    }
}
