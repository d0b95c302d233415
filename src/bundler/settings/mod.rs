//! Configuration structures for a pipeline run.
//!
//! [`Settings`] is built through [`SettingsBuilder`] from the CLI and the
//! optional config file; application paths live in [`AppSettings`], external
//! tool configuration in [`PackagerSettings`].

mod app;
mod builder;
mod core;
mod packager;

pub use app::AppSettings;
pub use builder::SettingsBuilder;
pub use self::core::{
    OUTPUT_MANIFEST_NAME, RUN_BINARY_NAME, SETUP_BINARY_NAME, SETUP_SCRIPT_NAME, Settings,
};
pub use packager::PackagerSettings;
