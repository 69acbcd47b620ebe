//! Traits the services call for processes, prompts, files, config and progress.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{Artifact, MonstackConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Prompt Port ───────────────────────────────────────────────────────────────

/// Line-based questions to the operator.
pub trait Prompter {
    /// Ask for free text. Returns the answer trimmed.
    fn input(&self, prompt: &str) -> Result<String>;
    /// Ask for free text, offering `default` when the answer is empty.
    fn input_with_default(&self, prompt: &str, default: &str) -> Result<String>;
    /// Ask a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
    /// Pick one of `items`; returns its index.
    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Synchronous.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Mark the start of a long-running task (e.g. pulling images).
    ///
    /// Every `begin_task` is closed by `end_task` before the next prompt.
    fn begin_task(&self, message: &str) {
        self.step(message);
    }
    /// Close the task opened by `begin_task`.
    fn end_task(&self, ok: bool, message: &str) {
        if ok {
            self.success(message);
        } else {
            self.warn(message);
        }
    }
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Writes generated artifacts into an explicit output directory.
pub trait ArtifactWriter {
    /// Write `artifact` into `dir` (created if missing); returns the file path.
    fn write_artifact(&self, dir: &Path, artifact: &Artifact) -> Result<PathBuf>;
}

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults if none exists.
    fn load(&self) -> Result<MonstackConfig>;
    /// Persist the configuration.
    fn save(&self, config: &MonstackConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
