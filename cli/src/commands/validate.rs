//! `monstack validate`: classify a subscription without deploying.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::domain::{SubscriptionKind, classify};
use crate::output::json;

/// Arguments for the validate command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Subscription string to check
    pub subscription: String,
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    kind: SubscriptionKind,
    value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mount_path: Option<PathBuf>,
}

/// Run the validate command.
///
/// # Errors
///
/// Returns the classification error when the subscription is rejected.
pub fn run(app: &AppContext, args: &ValidateArgs) -> Result<ExitCode> {
    let descriptor = classify(&args.subscription, &app.fs)?;
    tracing::debug!(kind = ?descriptor.kind(), "classified");
    if app.is_json() {
        json::print(&ValidationReport {
            valid: true,
            kind: descriptor.kind(),
            value: descriptor.as_str(),
            mount_path: descriptor.mount_path().map(PathBuf::from),
        })?;
    } else {
        app.renderer().render_subscription(&descriptor);
    }
    Ok(ExitCode::SUCCESS)
}
