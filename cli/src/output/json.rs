//! JSON output helpers for `--json` mode.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{CommandError, ConfigError, ManifestError, SubscriptionError, TargetError};

/// Stable machine-readable code for the error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<SubscriptionError>().is_some() {
        "INVALID_SUBSCRIPTION"
    } else if err.downcast_ref::<TargetError>().is_some() {
        "INVALID_TARGET"
    } else if err.downcast_ref::<ManifestError>().is_some() {
        "MANIFEST_ERROR"
    } else if err.downcast_ref::<CommandError>().is_some() {
        "COMMAND_FAILED"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "INVALID_CONFIG"
    } else {
        "ERROR"
    }
}

/// Format the error object printed when a command fails under `--json`.
///
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Print a command result as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}
