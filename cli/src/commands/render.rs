//! `monstack render`: write the artifacts without touching Docker.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::deploy::{self, DeployPorts, DeployRequest};
use crate::commands::StackArgs;
use crate::commands::deploy::print_outcome;
use crate::domain::DeploymentVariant;

/// Arguments for the render command.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Stack to render
    #[arg(value_enum)]
    pub variant: DeploymentVariant,

    #[command(flatten)]
    pub stack: StackArgs,
}

/// Run the render command.
///
/// # Errors
///
/// Returns an error if an input is invalid or a file cannot be written.
pub fn run(app: &AppContext, args: RenderArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let (overrides, output_dir) = args.stack.resolve(&config);
    let request = DeployRequest {
        variant: args.variant,
        overrides,
        interactive: !app.non_interactive,
        output_dir,
        settings: config.stack_settings(),
    };
    let reporter = app.reporter();
    let ports = DeployPorts {
        runner: &(),
        prompter: &app.prompter,
        writer: &app.fs,
        reporter: &reporter,
        paths: &app.fs,
    };
    let outcome = deploy::render(&ports, &request)?;
    print_outcome(app, &outcome)?;
    Ok(ExitCode::SUCCESS)
}
