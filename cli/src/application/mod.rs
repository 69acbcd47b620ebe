//! Ports and the deploy/render/config use-cases built on them.
//!
//! Depends on `crate::domain` only.

pub mod ports;
pub mod services;

pub use ports::{ArtifactWriter, CommandRunner, ConfigStore, ProgressReporter, Prompter};
