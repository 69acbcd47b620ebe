//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Provision monitoring and proxy-check stacks with Docker Compose
#[derive(Parser, Debug)]
#[command(
    name = "monstack",
    version,
    propagate_version = true,
    subcommand_negates_reqs = true
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Never prompt; values must come from flags
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    // Used when no subcommand is given.
    #[command(flatten)]
    pub deploy: commands::deploy::DeployArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy a stack on this host (default)
    Deploy(commands::deploy::DeployArgs),

    /// Write prometheus.yml / docker-compose.yml without running anything
    Render(commands::render::RenderArgs),

    /// Check a subscription string
    Validate(commands::validate::ValidateArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        init_tracing(self.verbose);
        let app = AppContext::new(&AppFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            json: self.json,
            yes: self.yes,
        });
        match self.command {
            None => commands::deploy::run(&app, self.deploy).await,
            Some(Command::Deploy(args)) => commands::deploy::run(&app, args).await,
            Some(Command::Render(args)) => commands::render::run(&app, args),
            Some(Command::Validate(args)) => commands::validate::run(&app, &args),
            Some(Command::Config(cmd)) => commands::config::run(&app, cmd),
            Some(Command::Version) => commands::version::run(&app),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "monstack_cli=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .try_init();
}
