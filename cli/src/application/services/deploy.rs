//! Deploy and render workflows.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{ArtifactWriter, CommandRunner, ProgressReporter, Prompter};
use crate::application::services::docker::{
    self, DockerInstall, DockerStatus, FirewallOutcome,
};
use crate::application::services::inputs::{self, InputOverrides, StackInputs};
use crate::domain::{
    COMPOSE_FILE, DeploymentVariant, HostPaths, MonitorTarget, StackSettings, SubscriptionKind,
    assemble,
};

/// What the operator asked for.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub variant: DeploymentVariant,
    pub overrides: InputOverrides,
    /// `false` under `--yes` / CI: never prompt.
    pub interactive: bool,
    pub output_dir: PathBuf,
    pub settings: StackSettings,
}

/// Ports the use-case talks through.
pub struct DeployPorts<'a, C, P, W, R, H> {
    pub runner: &'a C,
    pub prompter: &'a P,
    pub writer: &'a W,
    pub reporter: &'a R,
    pub paths: &'a H,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoint {
    pub name: &'static str,
    pub url: &'static str,
}

/// Result of a deploy or render run.
#[derive(Debug, Clone, Serialize)]
pub struct DeployOutcome {
    pub variant: DeploymentVariant,
    pub output_dir: PathBuf,
    pub artifacts: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionKind>,
    pub targets: Vec<MonitorTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker: Option<DockerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall: Option<FirewallOutcome>,
    pub launched: bool,
    pub endpoints: Vec<Endpoint>,
}

/// Full deployment: Docker check, inputs, artifacts, firewall, compose up.
///
/// # Errors
///
/// Returns an error if Docker cannot be installed, an input is invalid,
/// assembly or writing fails, or compose exits non-zero. Nothing is rolled
/// back.
pub async fn deploy<C, P, W, R, H>(
    ports: &DeployPorts<'_, C, P, W, R, H>,
    request: &DeployRequest,
    install: &DockerInstall,
) -> Result<DeployOutcome>
where
    C: CommandRunner,
    P: Prompter,
    W: ArtifactWriter,
    R: ProgressReporter,
    H: HostPaths,
{
    let reporter = ports.reporter;
    tracing::info!(variant = %request.variant, dir = %request.output_dir.display(), "deploy");
    precheck(request, ports.paths)?;
    reporter.step(&format!("deploying {}", request.variant));

    let docker = docker::ensure_docker(ports.runner, reporter, install).await?;
    let mut outcome = write_artifacts(ports, request)?;
    outcome.docker = Some(docker);

    if request.variant == DeploymentVariant::ExporterOnly {
        let master = inputs::collect_master_ip(
            &request.overrides,
            request.interactive,
            ports.prompter,
            reporter,
        )?;
        if let Some(address) = master {
            outcome.firewall = Some(docker::allow_from(ports.runner, reporter, address).await);
        }
    }

    let manifest = request.output_dir.join(COMPOSE_FILE);
    docker::compose_up(ports.runner, reporter, &manifest).await?;
    outcome.launched = true;
    outcome.endpoints = endpoints(request.variant);
    Ok(outcome)
}

/// Dry run: inputs and artifacts only, no external commands.
///
/// # Errors
///
/// Returns an error if an input is invalid or assembly/writing fails.
pub fn render<C, P, W, R, H>(
    ports: &DeployPorts<'_, C, P, W, R, H>,
    request: &DeployRequest,
) -> Result<DeployOutcome>
where
    P: Prompter,
    W: ArtifactWriter,
    R: ProgressReporter,
    H: HostPaths,
{
    tracing::info!(variant = %request.variant, dir = %request.output_dir.display(), "render");
    precheck(request, ports.paths)?;
    write_artifacts(ports, request)
}

/// Validate the command-line values before Docker is checked or installed.
///
/// # Errors
///
/// Returns an error for an invalid subscription, target or master IP, or
/// when a required subscription is missing and prompting is disabled.
pub fn precheck(request: &DeployRequest, paths: &impl HostPaths) -> Result<()> {
    inputs::check_overrides(
        request.variant,
        &request.overrides,
        request.interactive,
        paths,
    )
}

fn write_artifacts<C, P, W, R, H>(
    ports: &DeployPorts<'_, C, P, W, R, H>,
    request: &DeployRequest,
) -> Result<DeployOutcome>
where
    P: Prompter,
    W: ArtifactWriter,
    R: ProgressReporter,
    H: HostPaths,
{
    let reporter = ports.reporter;
    let StackInputs {
        subscription,
        targets,
    } = inputs::collect_inputs(
        request.variant,
        &request.overrides,
        request.interactive,
        ports.prompter,
        reporter,
        ports.paths,
    )?;

    let assembly = assemble(
        request.variant,
        subscription.as_ref(),
        &targets,
        &request.settings,
    )?;

    let mut written = Vec::new();
    for artifact in assembly.artifacts()? {
        let path = ports
            .writer
            .write_artifact(&request.output_dir, &artifact)
            .with_context(|| format!("writing {}", artifact.file_name))?;
        tracing::info!(path = %path.display(), bytes = artifact.contents.len(), "artifact written");
        reporter.success(&format!("{} written", path.display()));
        written.push(path);
    }

    Ok(DeployOutcome {
        variant: request.variant,
        output_dir: request.output_dir.clone(),
        artifacts: written,
        subscription: subscription.as_ref().map(|s| s.kind()),
        targets,
        docker: None,
        firewall: None,
        launched: false,
        endpoints: Vec::new(),
    })
}

fn endpoints(variant: DeploymentVariant) -> Vec<Endpoint> {
    variant
        .endpoints()
        .iter()
        .map(|&(name, url)| Endpoint { name, url })
        .collect()
}
