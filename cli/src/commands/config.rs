//! `monstack config`: show and set configuration values.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (e.g. grafana.admin_password)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config cannot be read, validated or saved.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    if app.is_json() {
        json::print(&config)?;
    } else {
        app.renderer().render_config(&config, &path);
    }
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    config_service::set_value(&app.config_store, key, value)?;
    let shown = if key == "grafana.admin_password" { "********" } else { value };
    if app.is_json() {
        json::print(&serde_json::json!({ "key": key, "value": shown }))?;
    } else {
        app.output.success(&format!("Set {key} = {shown}"));
    }
    Ok(ExitCode::SUCCESS)
}
