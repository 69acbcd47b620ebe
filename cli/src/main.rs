//! monstack: monitoring and proxy-check stack provisioner

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;

use monstack_cli::cli::Cli;
use monstack_cli::output::json;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = cli.json;

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: cannot start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli.run()) {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match json::format_error(&message, json::error_code(&e)) {
                Ok(obj) if json_mode => println!("{obj}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}
