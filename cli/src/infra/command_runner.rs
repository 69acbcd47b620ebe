//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs host processes with tokio, capturing output and
//! killing the child when the timeout fires.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;

/// Default timeout for short host commands (`docker --version`, `ufw`).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Production `CommandRunner`.
///
/// `tokio::time::timeout` around `.output().await` would only drop the future
/// and leave the process running, so the child is killed explicitly from a
/// `tokio::select!` branch.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, ?args, timeout_secs = timeout.as_secs(), "spawn");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    read_all(stdout_handle.as_mut()),
                    read_all(stderr_handle.as_mut()),
                );
                let status = status.with_context(|| format!("waiting for {program}"))?;
                tracing::debug!(program, code = ?status.code(), "exited");
                Ok(Output { status, stdout, stderr })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                tracing::warn!(program, "killed after timeout");
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }
}

/// Drain a child pipe. A read error ends the capture with a visible marker,
/// so a cut-off stderr is not mistaken for the whole message.
async fn read_all<R: tokio::io::AsyncRead + Unpin>(handle: Option<&mut R>) -> Vec<u8> {
    let mut buf = Vec::new();
    let Some(h) = handle else {
        return buf;
    };
    if let Err(e) = h.read_to_end(&mut buf).await {
        tracing::debug!(error = %e, captured = buf.len(), "pipe read failed");
        if !buf.is_empty() && !buf.ends_with(b"\n") {
            buf.push(b'\n');
        }
        buf.extend_from_slice(format!("[output truncated: {e}]").as_bytes());
    }
    buf
}
