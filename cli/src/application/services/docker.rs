//! Host-side container operations: Docker presence, firewall, compose launch.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::domain::CommandError;

/// Limit for the Docker installer and `docker compose up`, which pull images.
pub const LONG_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Where the Docker convenience script comes from and who gets added to the
/// `docker` group afterwards.
#[derive(Debug, Clone)]
pub struct DockerInstall {
    pub install_url: String,
    pub script_path: PathBuf,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DockerStatus {
    AlreadyInstalled { version: String },
    Installed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewallOutcome {
    pub allowed_from: Ipv4Addr,
    pub applied: bool,
}

/// Make sure the Docker CLI is available, installing it when it is not.
///
/// # Errors
///
/// Returns an error if any installation step fails.
pub async fn ensure_docker(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    install: &DockerInstall,
) -> Result<DockerStatus> {
    reporter.step("checking Docker...");
    match runner.run("docker", &["--version"]).await {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            tracing::debug!(%version, "docker present");
            reporter.success("Docker is already installed");
            return Ok(DockerStatus::AlreadyInstalled { version });
        }
        Ok(out) => tracing::debug!(code = ?out.status.code(), "docker --version failed"),
        Err(e) => tracing::debug!(error = %e, "docker not runnable"),
    }

    reporter.begin_task("Docker not found, installing...");
    let result = install_docker(runner, install).await;
    reporter.end_task(
        result.is_ok(),
        if result.is_ok() { "Docker installed" } else { "Docker installation failed" },
    );
    result?;
    reporter.warn("log out and back in (or run 'newgrp docker') to use Docker without sudo");
    Ok(DockerStatus::Installed)
}

async fn install_docker(runner: &impl CommandRunner, install: &DockerInstall) -> Result<()> {
    let script = install.script_path.to_string_lossy().into_owned();
    run_required(
        runner,
        "curl",
        &["-fsSL", &install.install_url, "-o", &script],
        LONG_COMMAND_TIMEOUT,
    )
    .await
    .context("downloading the Docker install script")?;
    run_required(runner, "sh", &[&script], LONG_COMMAND_TIMEOUT)
        .await
        .context("running the Docker install script")?;
    run_required(
        runner,
        "sudo",
        &["usermod", "-aG", "docker", &install.user],
        LONG_COMMAND_TIMEOUT,
    )
    .await
    .context("adding user to the docker group")?;
    Ok(())
}

/// Allow all traffic from `address` through ufw. Failure is only a warning.
pub async fn allow_from(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    address: Ipv4Addr,
) -> FirewallOutcome {
    reporter.step(&format!("configuring UFW for access from {address}..."));
    let ip = address.to_string();
    let applied = run_optional(runner, reporter, "sudo", &["ufw", "allow", "from", &ip]).await;
    if applied {
        reporter.success(&format!("UFW allows {address}"));
    }
    FirewallOutcome {
        allowed_from: address,
        applied,
    }
}

/// `docker compose -f <manifest> up -d`.
///
/// # Errors
///
/// Returns [`CommandError::Failed`] if compose exits non-zero.
pub async fn compose_up(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    manifest: &Path,
) -> Result<()> {
    let manifest = manifest.to_string_lossy().into_owned();
    reporter.begin_task("starting containers...");
    let result = run_required(
        runner,
        "docker",
        &["compose", "-f", &manifest, "up", "-d"],
        LONG_COMMAND_TIMEOUT,
    )
    .await;
    reporter.end_task(
        result.is_ok(),
        if result.is_ok() { "containers started" } else { "containers failed to start" },
    );
    result.map(|_| ())
}

/// Run a command that must succeed.
///
/// # Errors
///
/// Returns an error if the command cannot be spawned, times out, or exits
/// non-zero ([`CommandError::Failed`]).
pub async fn run_required(
    runner: &impl CommandRunner,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Output> {
    let command = display_command(program, args);
    tracing::info!(%command, "running");
    let output = runner
        .run_with_timeout(program, args, timeout)
        .await
        .with_context(|| format!("running {command}"))?;
    if output.status.success() {
        return Ok(output);
    }
    Err(CommandError::Failed {
        command,
        code: output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string()),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
    .into())
}

/// Run a command whose failure is reported as a warning. Returns `true` on success.
pub async fn run_optional(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    program: &str,
    args: &[&str],
) -> bool {
    let command = display_command(program, args);
    tracing::info!(%command, "running (optional)");
    match runner.run(program, args).await {
        Ok(out) if out.status.success() => true,
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr);
            reporter.warn(&format!("{command} failed: {}", stderr.trim()));
            false
        }
        Err(e) => {
            reporter.warn(&format!("{command} failed: {e}"));
            false
        }
    }
}

fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
