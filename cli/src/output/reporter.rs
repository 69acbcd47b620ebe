//! Terminal `ProgressReporter`: spinners on a TTY, plain lines otherwise.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
/// - `begin_task()` shows a spinner when stdout is a terminal
///
/// Everything is suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    task: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            task: RefCell::new(None),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn begin_task(&self, message: &str) {
        if self.ctx.show_progress() {
            *self.task.borrow_mut() = Some(progress::spinner(message));
        } else {
            self.step(message);
        }
    }

    fn end_task(&self, ok: bool, message: &str) {
        match self.task.borrow_mut().take() {
            Some(pb) => progress::finish_with(&pb, ok, message),
            None if ok => self.success(message),
            None => self.warn(message),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.task.get_mut().take() {
            pb.finish_and_clear();
        }
    }
}
