//! `monstack deploy`: bring a monitoring stack up on this host.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::deploy::{self, DeployOutcome, DeployPorts, DeployRequest};
use crate::application::services::docker::DockerInstall;
use crate::application::services::{config_service, inputs};
use crate::commands::StackArgs;
use crate::domain::DeploymentVariant;
use crate::output::json;

/// Arguments for the deploy command.
#[derive(Args, Debug, Default, Clone)]
pub struct DeployArgs {
    /// Stack to deploy; a menu is shown when omitted
    #[arg(value_enum)]
    pub variant: Option<DeploymentVariant>,

    #[command(flatten)]
    pub stack: StackArgs,
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if any deployment step fails.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let variant = resolve_variant(app, args.variant)?;
    let (overrides, output_dir) = args.stack.resolve(&config);
    let request = DeployRequest {
        variant,
        overrides,
        interactive: !app.non_interactive,
        output_dir,
        settings: config.stack_settings(),
    };
    let install = DockerInstall {
        install_url: config.docker.install_url.clone(),
        script_path: std::env::temp_dir().join("get-docker.sh"),
        user: invoking_user()?,
    };

    let reporter = app.reporter();
    let ports = DeployPorts {
        runner: &app.runner,
        prompter: &app.prompter,
        writer: &app.fs,
        reporter: &reporter,
        paths: &app.fs,
    };
    let outcome = deploy::deploy(&ports, &request, &install).await?;
    print_outcome(app, &outcome)?;
    Ok(ExitCode::SUCCESS)
}

/// Use the given variant, or ask for one.
///
/// # Errors
///
/// Returns an error when no variant is given and prompting is disabled.
pub fn resolve_variant(
    app: &AppContext,
    variant: Option<DeploymentVariant>,
) -> Result<DeploymentVariant> {
    match variant {
        Some(v) => Ok(v),
        None if app.non_interactive => anyhow::bail!(
            "No variant given. Pass one of: metrics-stack, uptime-stack, exporter-only"
        ),
        None => inputs::choose_variant(&app.prompter),
    }
}

/// Print the outcome in the active output mode.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_outcome(app: &AppContext, outcome: &DeployOutcome) -> Result<()> {
    if app.is_json() {
        json::print(outcome)
    } else {
        app.renderer().render_outcome(outcome);
        Ok(())
    }
}

/// The login user added to the `docker` group; the sudo caller when elevated.
fn invoking_user() -> Result<String> {
    std::env::var("SUDO_USER")
        .or_else(|_| std::env::var("USER"))
        .context("cannot determine the invoking user ($USER is not set)")
}
