//! Release pipeline for packaging a Node.js application.
//!
//! The [`Pipeline`] turns an application checkout into
//! `<dist>/<BUILD_ID>/{run, setup, package.json, frontend/...}` plus
//! `<dist>/<BUILD_ID>.zip`, driving the external `pkg` packager and `npm`.

pub mod build_id;
pub mod builder;
pub mod error;
pub mod settings;
pub mod steps;
pub mod utils;

pub use build_id::BuildId;
pub use builder::{BuildReport, Pipeline, PipelineStage, SilentObserver, StageObserver};
pub use error::{Error, Result};
pub use settings::{AppSettings, PackagerSettings, Settings, SettingsBuilder};
