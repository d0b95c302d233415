//! Builder for constructing Settings.

use super::{AppSettings, PackagerSettings, Settings, core::DEFAULT_DIST_DIR};
use crate::bundler::BuildId;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Builder for constructing [`Settings`].
///
/// Every field has a default matching the conventional project layout, so
/// `SettingsBuilder::new().build()` is a complete configuration.
///
/// # Examples
///
/// ```no_run
/// use nodepack_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> nodepack_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .entry_file("../server/bin/www")
///     .dist_dir("./dist")
///     .skip_install(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone)]
pub struct SettingsBuilder {
    app: AppSettings,
    packager: PackagerSettings,
    dist_dir: Option<PathBuf>,
    build_id: Option<BuildId>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces all application paths at once.
    pub fn app_settings(mut self, app: AppSettings) -> Self {
        self.app = app;
        self
    }

    /// Replaces all packager settings at once.
    pub fn packager_settings(mut self, packager: PackagerSettings) -> Self {
        self.packager = packager;
        self
    }

    /// Sets the entry file to patch and package.
    pub fn entry_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.app.entry_file = path.as_ref().to_path_buf();
        self
    }

    /// Sets the prebuilt frontend bundle directory.
    pub fn frontend_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.app.frontend_dir = path.as_ref().to_path_buf();
        self
    }

    /// Sets the frontend destination, relative to the output directory.
    pub fn frontend_dest<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.app.frontend_dest = path.as_ref().to_path_buf();
        self
    }

    /// Sets the application manifest (`package.json`).
    pub fn manifest<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.app.manifest = path.as_ref().to_path_buf();
        self
    }

    /// Sets the root directory for build outputs.
    ///
    /// Default: `./dist`
    pub fn dist_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the packager command line.
    ///
    /// Default: `pkg`
    pub fn packager(mut self, command: impl Into<String>) -> Self {
        self.packager.packager = command.into();
        self
    }

    /// Sets the packager target.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.packager.target = Some(target.into());
        self
    }

    /// Sets the dependency installer commands.
    pub fn install_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packager.install_commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the command the setup binary runs.
    ///
    /// Default: `npm i`
    pub fn setup_install_command(mut self, command: impl Into<String>) -> Self {
        self.packager.setup_install_command = command.into();
        self
    }

    /// Skips the dependency installer.
    pub fn skip_install(mut self, skip: bool) -> Self {
        self.packager.skip_install = skip;
        self
    }

    /// Sets the per-command timeout.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.packager.command_timeout = timeout;
        self
    }

    /// Sets whether stderr output fails a command.
    ///
    /// Default: true
    pub fn fail_on_stderr(mut self, fail: bool) -> Self {
        self.packager.fail_on_stderr = fail;
        self
    }

    /// Pins the build id instead of deriving it from the clock.
    pub fn build_id(mut self, id: BuildId) -> Self {
        self.build_id = Some(id);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the packager command is blank.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        if self.packager.packager.trim().is_empty() {
            crate::bail!("packager command must not be empty");
        }

        Ok(Settings::new(
            self.app,
            self.packager,
            self.dist_dir.unwrap_or_else(|| DEFAULT_DIST_DIR.into()),
            self.build_id.unwrap_or_else(BuildId::generate),
        ))
    }
}
