//! Pipeline states.

use std::fmt;

/// State of a pipeline run.
///
/// A run moves strictly forward through
/// `Init → DependenciesInstalled → EntryPatched → BinaryBuilt → EntryRestored
/// → AssetsCopied → SetupBuilt → Archived → Done`; any failing step moves it
/// to the terminal `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Nothing has run yet.
    Init,
    /// Helper packages installed.
    DependenciesInstalled,
    /// Detection snippet appended to the entry file.
    EntryPatched,
    /// Application binary produced.
    BinaryBuilt,
    /// Entry file back to its original content.
    EntryRestored,
    /// Frontend bundle and trimmed manifest in place.
    AssetsCopied,
    /// Setup binary produced and its source deleted.
    SetupBuilt,
    /// Output directory zipped.
    Archived,
    /// Run completed.
    Done,
    /// A step failed. Terminal.
    Failed,
}

impl PipelineStage {
    /// Forward order of the non-terminal states.
    pub const SEQUENCE: [PipelineStage; 9] = [
        Self::Init,
        Self::DependenciesInstalled,
        Self::EntryPatched,
        Self::BinaryBuilt,
        Self::EntryRestored,
        Self::AssetsCopied,
        Self::SetupBuilt,
        Self::Archived,
        Self::Done,
    ];

    /// The work performed to reach this state, for log and error messages.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Init => "starting build",
            Self::DependenciesInstalled => "installing dependencies",
            Self::EntryPatched => "patching entry file",
            Self::BinaryBuilt => "building executable",
            Self::EntryRestored => "restoring entry file",
            Self::AssetsCopied => "copying assets",
            Self::SetupBuilt => "building setup binary",
            Self::Archived => "creating archive",
            Self::Done => "finishing build",
            Self::Failed => "build",
        }
    }

    /// Whether no transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// The state a successful step moves to, `None` for terminal states.
    pub fn next(&self) -> Option<PipelineStage> {
        let idx = Self::SEQUENCE.iter().position(|s| s == self)?;
        Self::SEQUENCE.get(idx + 1).copied()
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::DependenciesInstalled => "DEPENDENCIES_INSTALLED",
            Self::EntryPatched => "ENTRY_PATCHED",
            Self::BinaryBuilt => "BINARY_BUILT",
            Self::EntryRestored => "ENTRY_RESTORED",
            Self::AssetsCopied => "ASSETS_COPIED",
            Self::SetupBuilt => "SETUP_BUILT",
            Self::Archived => "ARCHIVED",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}
