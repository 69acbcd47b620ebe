//! Artifact assembly: turns validated inputs into `prometheus.yml` and
//! `docker-compose.yml` contents. Pure: no I/O, deterministic output.

use anyhow::Result;

use crate::domain::error::ManifestError;
use crate::domain::manifest::{ManifestDocument, list_item};
use crate::domain::scrape::ScrapeConfig;
use crate::domain::stacks::{self, CHECKER_SERVICE};
use crate::domain::subscription::SubscriptionDescriptor;
use crate::domain::target::MonitorTarget;
use crate::domain::variant::DeploymentVariant;

pub const PROMETHEUS_FILE: &str = "prometheus.yml";
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Values that come from configuration rather than from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSettings {
    pub grafana_admin_password: String,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            grafana_admin_password: "admin".to_string(),
        }
    }
}

/// Result of [`assemble`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub variant: DeploymentVariant,
    pub scrape: ScrapeConfig,
    pub manifest: ManifestDocument,
}

/// A file to write into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub contents: String,
}

impl Assembly {
    /// Serialized artifacts for this variant, in write order.
    ///
    /// # Errors
    ///
    /// Returns an error if the scrape config cannot be serialized.
    pub fn artifacts(&self) -> Result<Vec<Artifact>> {
        let mut out = Vec::with_capacity(2);
        if self.variant.has_prometheus() {
            out.push(Artifact {
                file_name: PROMETHEUS_FILE,
                contents: self.scrape.to_yaml()?,
            });
        }
        out.push(Artifact {
            file_name: COMPOSE_FILE,
            contents: self.manifest.render(),
        });
        Ok(out)
    }
}

/// Build the scrape config and compose manifest for `variant`.
///
/// File and folder subscriptions are mounted read-only at the same path
/// inside the checker container.
///
/// # Errors
///
/// Returns [`ManifestError::SubscriptionRequired`] when the variant needs a
/// subscription and none was given, and [`ManifestError::AnchorMissing`] if
/// the template lacks the checker service.
pub fn assemble(
    variant: DeploymentVariant,
    subscription: Option<&SubscriptionDescriptor>,
    targets: &[MonitorTarget],
    settings: &StackSettings,
) -> Result<Assembly, ManifestError> {
    if variant.has_checker() && subscription.is_none() && !variant.allows_empty_subscription() {
        return Err(ManifestError::SubscriptionRequired {
            variant: variant.as_str(),
        });
    }

    let subscription_value = subscription.map_or("", SubscriptionDescriptor::as_str);
    let mut manifest = match variant {
        DeploymentVariant::MetricsStack => {
            stacks::metrics_stack(subscription_value, &settings.grafana_admin_password)
        }
        DeploymentVariant::UptimeStack => stacks::uptime_stack(subscription_value),
        DeploymentVariant::ExporterOnly => stacks::exporter_only(),
    };

    if variant.has_checker() {
        let mounts = mount_block(subscription);
        if !mounts.is_empty() {
            manifest.splice_after_identity(CHECKER_SERVICE, mounts)?;
        }
    }

    let scrape = if variant.accepts_targets() {
        ScrapeConfig::build(targets)
    } else {
        ScrapeConfig::build(&[])
    };

    Ok(Assembly {
        variant,
        scrape,
        manifest,
    })
}

/// `volumes:` block for file/folder subscriptions; empty otherwise.
#[must_use]
pub fn mount_block(subscription: Option<&SubscriptionDescriptor>) -> Vec<String> {
    let Some(path) = subscription.and_then(SubscriptionDescriptor::mount_path) else {
        return Vec::new();
    };
    let path = path.to_string_lossy();
    vec![
        "volumes:".to_string(),
        format!("  {}", list_item(&format!("{path}:{path}:ro"))),
    ]
}
