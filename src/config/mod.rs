//! Optional TOML config file.
//!
//! ```toml
//! dist_dir = "./dist"
//!
//! [app]
//! entry_file = "../app/node/bin/www"
//! frontend_dir = "../app/node/frontend/angular/dist/angular"
//! manifest = "../app/node/package.json"
//!
//! [packager]
//! packager = "pkg"
//! target = "node18-win-x64"
//! install_commands = ["npm i -g pkg"]
//! command_timeout = 900
//! fail_on_stderr = false
//! ```
//!
//! Missing keys keep their defaults; command line flags override the file.

use crate::bundler::{AppSettings, PackagerSettings, SettingsBuilder};
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// Root directory for build outputs.
    pub dist_dir: Option<PathBuf>,

    /// Application paths.
    pub app: Option<AppSettings>,

    /// External tool settings.
    pub packager: Option<PackagerSettings>,
}

impl BundleConfig {
    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BundlerError::Cli(CliError::ConfigFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
        let config = Self::parse(&text)?;
        log::debug!("Loaded config file {}", path.display());
        Ok(config)
    }

    /// Parses config file contents.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Layers the file's values over `builder`.
    pub fn apply(self, mut builder: SettingsBuilder) -> SettingsBuilder {
        if let Some(dist_dir) = self.dist_dir {
            builder = builder.dist_dir(dist_dir);
        }
        if let Some(app) = self.app {
            builder = builder.app_settings(app);
        }
        if let Some(packager) = self.packager {
            builder = builder.packager_settings(packager);
        }
        builder
    }
}
