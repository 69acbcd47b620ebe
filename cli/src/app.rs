//! Per-invocation context handed to every command handler.
//!
//! Holds the output context and the production port implementations so
//! command handlers only borrow what they need.

use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::infra::prompt::DialoguerPrompter;
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
#[allow(clippy::struct_excessive_bools)]
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Skip interactive prompts (also set by `CI` / `MONSTACK_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Host process runner.
    pub runner: TokioCommandRunner,
    /// Terminal prompts.
    pub prompter: DialoguerPrompter,
    /// Artifact writes and path probes.
    pub fs: LocalFs,
    /// `~/.monstack/config.yaml`.
    pub config_store: YamlConfigStore,
    /// When `true`, never prompt.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `MONSTACK_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("MONSTACK_YES").is_ok();
        let non_interactive = flags.yes || ci_env;

        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        // Progress lines would corrupt the JSON document on stdout.
        let quiet = flags.quiet || flags.json;

        Self {
            output: OutputContext::new(flags.no_color, quiet),
            mode,
            runner: TokioCommandRunner::default(),
            prompter: DialoguerPrompter,
            fs: LocalFs,
            config_store: YamlConfigStore::default(),
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }
}
