//! Command line interface for the release packager.
//!
//! Parses arguments, resolves settings, runs the [`Pipeline`] with live stage
//! output and prints the resulting artifacts.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{BuildReport, Pipeline};
use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(&args);

    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime_config = RuntimeConfig::from(&args);
    let settings = args.settings()?;

    runtime_config.section(&format!("Build {}", settings.build_id()))?;
    runtime_config.verbose_println(&format!(
        "Entry file: {}",
        settings.entry_file().display()
    ))?;
    runtime_config.verbose_println(&format!(
        "Output directory: {}",
        settings.output_dir().display()
    ))?;

    let pipeline = Pipeline::new(settings);
    let report = pipeline.run_with(&runtime_config).await?;
    print_report(&runtime_config, &report)?;

    Ok(0)
}

/// Sets up `env_logger`; `RUST_LOG` overrides the verbosity flags.
fn init_logging(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn print_report(runtime_config: &RuntimeConfig, report: &BuildReport) -> std::io::Result<()> {
    runtime_config.success(&format!("Created {}", report.archive_path.display()))?;
    runtime_config.indent(&format!("Size:      {} bytes", report.archive_size))?;
    runtime_config.indent(&format!("SHA-256:   {}", report.archive_sha256))?;
    runtime_config.indent(&format!("Run:       {}", report.run_binary.display()))?;
    runtime_config.indent(&format!("Setup:     {}", report.setup_binary.display()))?;
    runtime_config.indent(&format!(
        "Frontend:  {} files, {} dependencies",
        report.frontend_files, report.dependencies
    ))?;
    if !report.setup_cleanup.missing.is_empty() {
        runtime_config.warn("Setup script was already gone before cleanup")?;
    }
    Ok(())
}
