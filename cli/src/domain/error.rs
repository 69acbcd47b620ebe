//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Subscription errors ───────────────────────────────────────────────────────

/// Rejections produced by subscription classification.
///
/// All variants are recoverable: the caller re-prompts for a new value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("Unrecognized subscription format. Expected an http(s) URL, base64 proxy URI, file:///path or folder:///path")]
    UnrecognizedFormat,

    #[error("File {} not found", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Directory {} not found", path.display())]
    DirectoryNotFound { path: PathBuf },
}

impl SubscriptionError {
    /// Returns `true` for the file/folder reference rejections.
    #[must_use]
    pub fn is_path_not_found(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::DirectoryNotFound { .. }
        )
    }
}

// ── Target errors ─────────────────────────────────────────────────────────────

/// Errors related to external monitoring targets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("Invalid IPv4 address: '{0}'")]
    InvalidIpLiteral(String),

    #[error(
        "Invalid target name '{0}': use 1-63 letters, digits, spaces, '.', '_' or '-', starting with a letter or digit"
    )]
    InvalidName(String),

    #[error("Target name '{0}' is already used")]
    DuplicateName(String),

    #[error("Invalid target '{0}': expected NAME=IP or IP")]
    Malformed(String),

    #[error("The {0} stack does not scrape external nodes; drop --target")]
    NotScraped(&'static str),
}

// ── Manifest errors ───────────────────────────────────────────────────────────

/// Assembly failures. Both are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    /// A block was spliced into a service the template does not declare.
    #[error("internal error: template has no insertion point for service '{service}'")]
    AnchorMissing { service: String },

    #[error("The {variant} stack requires a subscription")]
    SubscriptionRequired { variant: &'static str },
}

// ── Command errors ────────────────────────────────────────────────────────────

/// External command failures.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Command failed: {command} (exit code {code})\n{stderr}")]
    Failed {
        command: String,
        code: String,
        stderr: String,
    },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
