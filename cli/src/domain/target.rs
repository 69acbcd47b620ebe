//! External monitoring targets: hosts running a node exporter on `:9100`.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::error::TargetError;
use crate::domain::scrape::RESERVED_JOBS;

/// Port every external node exporter listens on.
pub const NODE_EXPORTER_PORT: u16 = 9100;

/// Target names become Prometheus job names.
pub static TARGET_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._-]{0,62}$").expect("valid regex")
});

/// A named host whose node exporter gets scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorTarget {
    pub name: String,
    pub address: Ipv4Addr,
}

impl MonitorTarget {
    /// Build a target from user input.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::InvalidName`] or [`TargetError::InvalidIpLiteral`].
    pub fn new(name: &str, address: &str) -> Result<Self, TargetError> {
        let name = name.trim();
        if !TARGET_NAME_RE.is_match(name) {
            return Err(TargetError::InvalidName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            address: parse_ipv4(address)?,
        })
    }

    /// `address:9100`
    #[must_use]
    pub fn scrape_address(&self) -> String {
        format!("{}:{NODE_EXPORTER_PORT}", self.address)
    }

    /// Parse a command-line target: `NAME=IP`, or a bare `IP` which gets
    /// `default_name`.
    ///
    /// # Errors
    ///
    /// Returns a [`TargetError`] if either half is invalid.
    pub fn parse_arg(arg: &str, default_name: &str) -> Result<Self, TargetError> {
        match arg.split_once('=') {
            Some((name, address)) if !name.trim().is_empty() => Self::new(name, address),
            Some(_) => Err(TargetError::Malformed(arg.to_string())),
            None => Self::new(default_name, arg),
        }
    }
}

/// Parse a dotted-quad IPv4 literal.
///
/// # Errors
///
/// Returns [`TargetError::InvalidIpLiteral`] for anything else.
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr, TargetError> {
    input
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| TargetError::InvalidIpLiteral(input.trim().to_string()))
}

/// Default job name for the `n`-th (1-based) external node.
#[must_use]
pub fn default_target_name(n: usize) -> String {
    format!("External-node-{n}")
}

/// Accumulates targets while rejecting duplicate names.
#[derive(Debug, Default)]
pub struct TargetList {
    targets: Vec<MonitorTarget>,
}

impl TargetList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a target.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::DuplicateName`] if the name is taken, including
    /// by one of the built-in scrape jobs.
    pub fn push(&mut self, target: MonitorTarget) -> Result<(), TargetError> {
        if self.contains_name(&target.name) {
            return Err(TargetError::DuplicateName(target.name));
        }
        self.targets.push(target);
        Ok(())
    }

    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        RESERVED_JOBS.contains(&name) || self.targets.iter().any(|t| t.name == name)
    }

    /// Name the next target gets when the user supplies none.
    #[must_use]
    pub fn next_default_name(&self) -> String {
        let mut n = self.targets.len() + 1;
        while self.contains_name(&default_target_name(n)) {
            n += 1;
        }
        default_target_name(n)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<MonitorTarget> {
        self.targets
    }
}
