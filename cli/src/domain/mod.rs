//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod assemble;
pub mod config;
pub mod error;
pub mod manifest;
pub mod scrape;
pub mod stacks;
pub mod subscription;
pub mod target;
pub mod variant;

pub use assemble::{Artifact, Assembly, COMPOSE_FILE, PROMETHEUS_FILE, StackSettings, assemble};
pub use config::{MonstackConfig, validate_config_key, validate_config_value};
pub use error::{CommandError, ConfigError, ManifestError, SubscriptionError, TargetError};
pub use subscription::{HostPaths, SubscriptionDescriptor, SubscriptionKind, classify};
pub use target::{MonitorTarget, TargetList};
pub use variant::DeploymentVariant;
