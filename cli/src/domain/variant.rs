//! Deployment variants and the services each one brings up.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// The selectable service combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentVariant {
    /// Xray checker + Node Exporter + Prometheus + Grafana
    #[value(alias = "grafana")]
    MetricsStack,
    /// Xray checker + Uptime-Kuma
    #[value(alias = "kuma")]
    UptimeStack,
    /// Node Exporter only, for a monitored node
    #[value(alias = "node")]
    ExporterOnly,
}

impl DeploymentVariant {
    pub const ALL: [Self; 3] = [Self::MetricsStack, Self::UptimeStack, Self::ExporterOnly];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MetricsStack => "metrics-stack",
            Self::UptimeStack => "uptime-stack",
            Self::ExporterOnly => "exporter-only",
        }
    }

    /// Menu label for the interactive selector.
    #[must_use]
    pub fn menu_label(self) -> &'static str {
        match self {
            Self::MetricsStack => "Grafana stack (Xray checker + Node Exporter + Prometheus + Grafana)",
            Self::UptimeStack => "Uptime-Kuma stack (Xray checker + Uptime-Kuma)",
            Self::ExporterOnly => "Node Exporter (monitored node only)",
        }
    }

    /// Whether the stack includes the proxy checker.
    #[must_use]
    pub fn has_checker(self) -> bool {
        !matches!(self, Self::ExporterOnly)
    }

    /// Whether the checker may run with an empty subscription.
    #[must_use]
    pub fn allows_empty_subscription(self) -> bool {
        matches!(self, Self::MetricsStack)
    }

    /// Whether a `prometheus.yml` is part of the artifacts.
    #[must_use]
    pub fn has_prometheus(self) -> bool {
        matches!(self, Self::MetricsStack)
    }

    /// Whether external scrape targets can be attached.
    #[must_use]
    pub fn accepts_targets(self) -> bool {
        self.has_prometheus()
    }

    /// Local endpoints reported after a successful launch.
    #[must_use]
    pub fn endpoints(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::MetricsStack => &[
                ("Grafana", "http://localhost:3000"),
                ("Prometheus", "http://localhost:9090"),
                ("Node Exporter", "http://localhost:9100"),
                ("Xray Checker", "http://localhost:2112"),
            ],
            Self::UptimeStack => &[
                ("Uptime-Kuma", "http://localhost:3001"),
                ("Xray Checker", "http://localhost:2112"),
            ],
            Self::ExporterOnly => &[("Node Exporter", "http://localhost:9100")],
        }
    }
}

impl fmt::Display for DeploymentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
