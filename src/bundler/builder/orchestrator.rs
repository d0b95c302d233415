//! Main pipeline orchestration.
//!
//! This module provides the [`Pipeline`] that runs the build steps in order
//! and tracks the run's [`PipelineStage`].

use super::{checksum::calculate_sha256, stage::PipelineStage, tool_detection};
use crate::bundler::{
    Error, Result, Settings,
    error::ErrorExt,
    steps::{
        archive, assets, executable, install,
        patch::PatchedEntry,
        setup,
        template::ENTRY_SNIPPET,
    },
    utils::{
        fs::DeleteReport,
        process::{CommandRunner, CommandSpec},
    },
};
use std::path::PathBuf;

/// Receives stage transitions of a running pipeline.
pub trait StageObserver: Send + Sync {
    /// Called before the work leading to `next` starts.
    fn stage_started(&self, next: PipelineStage);

    /// Called once `stage` has been reached.
    fn stage_reached(&self, stage: PipelineStage);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl StageObserver for SilentObserver {
    fn stage_started(&self, _next: PipelineStage) {}
    fn stage_reached(&self, _stage: PipelineStage) {}
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Build id naming the output directory and archive.
    pub build_id: String,
    /// `<dist>/<build_id>`.
    pub output_dir: PathBuf,
    /// Packaged application binary.
    pub run_binary: PathBuf,
    /// Packaged setup binary.
    pub setup_binary: PathBuf,
    /// `<dist>/<build_id>.zip`.
    pub archive_path: PathBuf,
    /// Archive size in bytes.
    pub archive_size: u64,
    /// Hex SHA-256 of the archive.
    pub archive_sha256: String,
    /// Number of install commands run.
    pub install_commands: usize,
    /// Files copied from the frontend bundle.
    pub frontend_files: usize,
    /// Entries in the shipped `dependencies`.
    pub dependencies: usize,
    /// Result of removing the setup script source.
    pub setup_cleanup: DeleteReport,
    /// Every state the run went through, `Init` to `Done`.
    pub stages: Vec<PipelineStage>,
}

/// Runs the release pipeline.
///
/// # Examples
///
/// ```no_run
/// use nodepack_bundler::bundler::{Pipeline, SettingsBuilder};
///
/// # async fn example() -> nodepack_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new().build()?;
/// let report = Pipeline::new(settings).run().await?;
/// println!("Created {} ({} bytes)", report.archive_path.display(), report.archive_size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pipeline {
    settings: Settings,
    runner: CommandRunner,
}

/// Stage bookkeeping for a single run.
struct Progress<'a> {
    reached: Vec<PipelineStage>,
    observer: &'a dyn StageObserver,
}

impl<'a> Progress<'a> {
    fn new(observer: &'a dyn StageObserver) -> Self {
        observer.stage_reached(PipelineStage::Init);
        Self {
            reached: vec![PipelineStage::Init],
            observer,
        }
    }

    fn current(&self) -> PipelineStage {
        self.reached
            .last()
            .copied()
            .unwrap_or(PipelineStage::Init)
    }

    /// Announces the transition to `next`.
    fn begin(&self, next: PipelineStage) {
        debug_assert_eq!(self.current().next(), Some(next));
        log::debug!("{} -> {}", self.current(), next);
        self.observer.stage_started(next);
    }

    /// Records the outcome of the step that leads to `next`.
    fn finish<T>(&mut self, next: PipelineStage, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.reached.push(next);
                self.observer.stage_reached(next);
                Ok(value)
            }
            Err(e) => {
                log::error!("Error {}: {}", next.action(), e);
                self.reached.push(PipelineStage::Failed);
                self.observer.stage_reached(PipelineStage::Failed);
                Err(Error::Stage {
                    stage: next,
                    source: Box::new(e),
                })
            }
        }
    }
}

impl Pipeline {
    /// Creates a pipeline for `settings`.
    pub fn new(settings: Settings) -> Self {
        let runner = settings.command_runner();
        Self { settings, runner }
    }

    /// Returns the settings of this run.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs every step without progress reporting.
    pub async fn run(&self) -> Result<BuildReport> {
        self.run_with(&SilentObserver).await
    }

    /// Runs every step, reporting transitions to `observer`.
    ///
    /// The entry file is restored on every exit path once it has been
    /// patched. Any other partial output is left as-is on failure.
    pub async fn run_with(&self, observer: &dyn StageObserver) -> Result<BuildReport> {
        let settings = &self.settings;
        let mut progress = Progress::new(observer);
        log::info!(
            "Starting build {} into {}",
            settings.build_id(),
            settings.output_dir().display()
        );

        progress.begin(PipelineStage::DependenciesInstalled);
        let installed = install::install_dependencies(settings, &self.runner).await;
        let install_commands = progress.finish(PipelineStage::DependenciesInstalled, installed)?;
        self.check_packager();

        progress.begin(PipelineStage::EntryPatched);
        let patched = PatchedEntry::apply(settings.entry_file(), ENTRY_SNIPPET).await;
        let patched = progress.finish(PipelineStage::EntryPatched, patched)?;

        progress.begin(PipelineStage::BinaryBuilt);
        let built = executable::build_executable(settings, &self.runner).await;
        // On error `patched` is dropped here, which restores the entry file
        let run_binary = progress.finish(PipelineStage::BinaryBuilt, built)?;

        progress.begin(PipelineStage::EntryRestored);
        let restored = patched.restore().await;
        progress.finish(PipelineStage::EntryRestored, restored)?;

        progress.begin(PipelineStage::AssetsCopied);
        let copied = assets::copy_assets(settings).await;
        let copied = progress.finish(PipelineStage::AssetsCopied, copied)?;

        progress.begin(PipelineStage::SetupBuilt);
        let setup_built = setup::build_setup_binary(settings, &self.runner).await;
        let (setup_binary, setup_cleanup) = progress.finish(PipelineStage::SetupBuilt, setup_built)?;

        progress.begin(PipelineStage::Archived);
        let archived = self.archive().await;
        let (summary, archive_size, archive_sha256) =
            progress.finish(PipelineStage::Archived, archived)?;

        progress.begin(PipelineStage::Done);
        progress.finish(PipelineStage::Done, Ok(()))?;
        log::info!("Process completed successfully.");

        Ok(BuildReport {
            build_id: settings.build_id().to_string(),
            output_dir: settings.output_dir(),
            run_binary,
            setup_binary,
            archive_path: summary.path,
            archive_size,
            archive_sha256,
            install_commands,
            frontend_files: copied.frontend_files,
            dependencies: copied.dependencies,
            setup_cleanup,
            stages: progress.reached,
        })
    }

    async fn archive(&self) -> Result<(archive::ArchiveSummary, u64, String)> {
        let archive_path = self.settings.archive_path();
        let summary = archive::create_archive(&self.settings.output_dir(), &archive_path).await?;
        let size = tokio::fs::metadata(&summary.path)
            .await
            .fs_context("reading archive metadata", &summary.path)?
            .len();
        let checksum = calculate_sha256(&summary.path).await?;
        Ok((summary, size, checksum))
    }

    fn check_packager(&self) {
        let Some(spec) = CommandSpec::parse(&self.settings.packager().packager) else {
            return;
        };
        if tool_detection::find_tool(spec.program()).is_none() {
            log::warn!(
                "Packager `{}` not found in PATH; install it with `npm i -g pkg`",
                spec.program().to_string_lossy()
            );
        }
    }
}
