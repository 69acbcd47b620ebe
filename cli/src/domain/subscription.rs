//! Subscription classification. Pure except for the injected path probe.
//!
//! A subscription tells the proxy checker where its proxy definitions come
//! from. Four forms are recognised, tried in a fixed order; the first match
//! wins.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::domain::error::SubscriptionError;

/// Schemes a decoded base64 subscription must start with.
pub const PROXY_URI_SCHEMES: &[&str] = &["vmess://", "vless://", "trojan://"];

/// Prefix of a single-file subscription. The path keeps its leading `/`.
pub const FILE_PREFIX: &str = "file:///";

/// Prefix of a directory subscription. The path keeps its leading `/`.
pub const FOLDER_PREFIX: &str = "folder:///";

/// Host filesystem queries needed by [`classify`].
///
/// Kept as a trait so classification stays testable without touching disk.
pub trait HostPaths {
    /// `true` if `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;
    /// `true` if `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Which of the four forms a subscription took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    RemoteUrl,
    Base64Proxy,
    FileRef,
    DirRef,
}

/// A validated subscription.
///
/// Only [`classify`] builds one, so holding a descriptor means the input
/// already passed every check for its form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionDescriptor {
    RemoteUrl(String),
    Base64Proxy(String),
    FileRef { raw: String, path: PathBuf },
    DirRef { raw: String, path: PathBuf },
}

impl SubscriptionDescriptor {
    #[must_use]
    pub fn kind(&self) -> SubscriptionKind {
        match self {
            Self::RemoteUrl(_) => SubscriptionKind::RemoteUrl,
            Self::Base64Proxy(_) => SubscriptionKind::Base64Proxy,
            Self::FileRef { .. } => SubscriptionKind::FileRef,
            Self::DirRef { .. } => SubscriptionKind::DirRef,
        }
    }

    /// The string the user supplied; this is what the checker receives.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::RemoteUrl(raw) | Self::Base64Proxy(raw) => raw,
            Self::FileRef { raw, .. } | Self::DirRef { raw, .. } => raw,
        }
    }

    /// Host path that has to be visible inside the checker container.
    #[must_use]
    pub fn mount_path(&self) -> Option<&Path> {
        match self {
            Self::FileRef { path, .. } | Self::DirRef { path, .. } => Some(path),
            Self::RemoteUrl(_) | Self::Base64Proxy(_) => None,
        }
    }
}

/// Classify a subscription string.
///
/// Rules, in order:
/// 1. `http://` / `https://` → remote URL, no further checks.
/// 2. Valid base64 whose UTF-8 payload starts with a proxy URI scheme.
///    Decode failures fall through silently.
/// 3. `file:///path` → accepted only if `path` is a regular file.
/// 4. `folder:///path` → accepted only if `path` is a directory.
///
/// # Errors
///
/// Returns [`SubscriptionError`] when no rule accepts the input.
pub fn classify(input: &str, paths: &impl HostPaths) -> Result<SubscriptionDescriptor, SubscriptionError> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") {
        return Ok(SubscriptionDescriptor::RemoteUrl(input.to_string()));
    }

    if is_base64_proxy(input) {
        return Ok(SubscriptionDescriptor::Base64Proxy(input.to_string()));
    }

    if input.starts_with(FILE_PREFIX) {
        let path = PathBuf::from(&input[FILE_PREFIX.len() - 1..]);
        if paths.is_file(&path) {
            return Ok(SubscriptionDescriptor::FileRef {
                raw: input.to_string(),
                path,
            });
        }
        return Err(SubscriptionError::FileNotFound { path });
    }

    if input.starts_with(FOLDER_PREFIX) {
        let path = PathBuf::from(&input[FOLDER_PREFIX.len() - 1..]);
        if paths.is_dir(&path) {
            return Ok(SubscriptionDescriptor::DirRef {
                raw: input.to_string(),
                path,
            });
        }
        return Err(SubscriptionError::DirectoryNotFound { path });
    }

    Err(SubscriptionError::UnrecognizedFormat)
}

/// "Not base64" and "base64 of something else" are deliberately the same
/// answer here.
fn is_base64_proxy(input: &str) -> bool {
    let Ok(bytes) = STANDARD.decode(input) else {
        return false;
    };
    let Ok(text) = std::str::from_utf8(&bytes) else {
        return false;
    };
    PROXY_URI_SCHEMES.iter().any(|scheme| text.starts_with(scheme))
}
