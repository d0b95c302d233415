//! Command line argument parsing and validation.
//!
//! Every flag can also come from a `NODEPACK_*` environment variable or the
//! `--config` file; flags win over the file.

use crate::bundler::{PipelineStage, Settings, SettingsBuilder, StageObserver};
use crate::config::BundleConfig;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Release packager for a Node.js application
#[derive(Parser, Debug)]
#[command(
    name = "nodepack_bundler",
    version,
    about = "Release packager for a Node.js application",
    long_about = "Packages a Node.js server and its frontend bundle into a versioned release.

Installs the helper packages, patches the entry file with the runtime snippet,
compiles it with `pkg`, restores the entry file, copies the frontend bundle and
a trimmed package.json, compiles a setup binary and zips the result.

Usage:
  nodepack_bundler
  nodepack_bundler --entry-file ../app/node/bin/www --target node18-linux-x64
  nodepack_bundler --config release.toml --skip-install

Output: <dist>/<BUILD_ID>/{run, setup, package.json, frontend/...} and <dist>/<BUILD_ID>.zip
Exit code 0 = archive created."
)]
pub struct Args {
    /// TOML file with default settings
    #[arg(short, long, value_name = "FILE", env = "NODEPACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server entry script to patch and package
    #[arg(long, value_name = "PATH", env = "NODEPACK_ENTRY_FILE")]
    pub entry_file: Option<PathBuf>,

    /// Built frontend bundle to ship next to the binary
    #[arg(long, value_name = "DIR", env = "NODEPACK_FRONTEND_DIR")]
    pub frontend_dir: Option<PathBuf>,

    /// Application package.json
    #[arg(long, value_name = "PATH", env = "NODEPACK_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Root directory for release outputs
    #[arg(short, long, value_name = "DIR", env = "NODEPACK_DIST_DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Packager command (defaults to `pkg`)
    #[arg(long, value_name = "COMMAND", env = "NODEPACK_PACKAGER")]
    pub packager: Option<String>,

    /// Packager target triple, e.g. node18-win-x64
    #[arg(short, long, value_name = "TARGET", env = "NODEPACK_TARGET")]
    pub target: Option<String>,

    /// Do not run the npm install commands
    #[arg(long, env = "NODEPACK_SKIP_INSTALL")]
    pub skip_install: bool,

    /// Time limit for each external command, in seconds
    #[arg(long, value_name = "SECS", env = "NODEPACK_COMMAND_TIMEOUT")]
    pub command_timeout: Option<u64>,

    /// Accept commands that exit 0 but write to stderr
    #[arg(long, env = "NODEPACK_ALLOW_STDERR")]
    pub allow_stderr: bool,

    /// Print every stage and the command lines being run
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.command_timeout == Some(0) {
            return Err("--command-timeout must be at least 1 second".to_string());
        }

        if let Some(packager) = &self.packager
            && packager.trim().is_empty()
        {
            return Err("--packager cannot be empty".to_string());
        }

        if let Some(target) = &self.target
            && target.trim().is_empty()
        {
            return Err("--target cannot be empty".to_string());
        }

        Ok(())
    }

    /// Resolves the config file, then these flags, into run settings.
    pub fn settings(&self) -> Result<Settings> {
        let mut builder = SettingsBuilder::new();

        if let Some(path) = &self.config {
            builder = BundleConfig::load(path)?.apply(builder);
        }

        Ok(self.apply(builder).build()?)
    }

    fn apply(&self, mut builder: SettingsBuilder) -> SettingsBuilder {
        if let Some(path) = &self.entry_file {
            builder = builder.entry_file(path);
        }
        if let Some(path) = &self.frontend_dir {
            builder = builder.frontend_dir(path);
        }
        if let Some(path) = &self.manifest {
            builder = builder.manifest(path);
        }
        if let Some(path) = &self.dist_dir {
            builder = builder.dist_dir(path);
        }
        if let Some(packager) = &self.packager {
            builder = builder.packager(packager.trim());
        }
        if let Some(target) = &self.target {
            builder = builder.target(target.trim());
        }
        if self.skip_install {
            builder = builder.skip_install(true);
        }
        if let Some(secs) = self.command_timeout {
            builder = builder.command_timeout(Duration::from_secs(secs));
        }
        if self.allow_stderr {
            builder = builder.fail_on_stderr(false);
        }
        builder
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.quiet);
        Self { output }
    }
}

impl RuntimeConfig {
    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

impl StageObserver for RuntimeConfig {
    fn stage_started(&self, next: PipelineStage) {
        let _ = self.progress(&format!("{}...", capitalize(next.action())));
    }

    fn stage_reached(&self, stage: PipelineStage) {
        let _ = match stage {
            PipelineStage::Init => self.verbose_println("Pipeline initialized"),
            PipelineStage::Failed => Ok(()),
            stage => self.verbose_println(&format!("Stage {}", stage)),
        };
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
