//! The individual pipeline steps.
//!
//! Each step is a one-shot async function over [`Settings`](crate::bundler::Settings);
//! the [`Pipeline`](crate::bundler::Pipeline) sequences them.
//!
//! - `install` - dependency installer
//! - `patch` - entry file patch guard
//! - `executable` - application binary
//! - `assets` - frontend bundle and trimmed manifest
//! - `setup` - setup binary
//! - `archive` - release zip
//! - `template` - injected and generated JavaScript

pub mod archive;
pub mod assets;
pub mod executable;
pub mod install;
pub mod patch;
pub mod setup;
pub mod template;
