//! External tool configuration: the native packager and the installers.

use crate::bundler::utils::process::DEFAULT_COMMAND_TIMEOUT;
use serde::Deserialize;
use std::time::Duration;

/// Default native packaging tool.
pub const DEFAULT_PACKAGER: &str = "pkg";

/// Commands run by the dependency installer, in order.
pub const DEFAULT_INSTALL_COMMANDS: [&str; 3] = ["npm i fs-extra", "npm i archiver", "npm i -g pkg"];

/// Command the setup binary runs on the target machine.
pub const DEFAULT_SETUP_INSTALL_COMMAND: &str = "npm i";

/// Settings for the external commands of the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackagerSettings {
    /// Packager command line, e.g. `pkg` or `npx pkg`.
    ///
    /// Invoked as `<packager> <input> [-t <target>] -o <output>`.
    pub packager: String,

    /// Single packager target such as `node18-win-x64`.
    ///
    /// Default: None (the packager's own default)
    pub target: Option<String>,

    /// Package installation commands run before the build.
    pub install_commands: Vec<String>,

    /// Command embedded in the setup binary.
    pub setup_install_command: String,

    /// Skip the dependency installer.
    pub skip_install: bool,

    /// Timeout applied to each external command.
    #[serde(with = "duration_secs")]
    pub command_timeout: Duration,

    /// Treat any stderr output of a command as a failure.
    pub fail_on_stderr: bool,
}

impl Default for PackagerSettings {
    fn default() -> Self {
        Self {
            packager: DEFAULT_PACKAGER.to_string(),
            target: None,
            install_commands: DEFAULT_INSTALL_COMMANDS.iter().map(|c| c.to_string()).collect(),
            setup_install_command: DEFAULT_SETUP_INSTALL_COMMAND.to_string(),
            skip_install: false,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            fail_on_stderr: true,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
