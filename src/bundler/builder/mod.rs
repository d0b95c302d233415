//! Pipeline orchestration and coordination.
//!
//! This module provides the main [`Pipeline`] that sequences the build steps
//! to produce a release archive.
//!
//! # Overview
//!
//! The pipeline:
//! 1. Installs the helper packages
//! 2. Patches the entry file and packages it into `run`
//! 3. Restores the entry file
//! 4. Copies the frontend bundle and a trimmed `package.json`
//! 5. Packages the `setup` binary
//! 6. Zips the output directory and checksums the archive
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for the archive
//! - [`orchestrator`] - Main [`Pipeline`] struct and its run loop
//! - [`stage`] - The [`PipelineStage`] state machine
//! - [`tool_detection`] - External tool availability checking

pub mod checksum;
mod orchestrator;
mod stage;
pub mod tool_detection;

pub use orchestrator::{BuildReport, Pipeline, SilentObserver, StageObserver};
pub use stage::PipelineStage;
