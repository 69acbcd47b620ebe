//! Port implementations backed by tokio processes, the local filesystem,
//! a YAML config file and dialoguer prompts.
//!
//! May import `crate::domain` and `crate::application::ports`, nothing above.

pub mod command_runner;
pub mod config;
pub mod fs;
pub mod prompt;
