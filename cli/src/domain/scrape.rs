//! Prometheus scrape configuration.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::target::MonitorTarget;

/// Job name of the node exporter running next to Prometheus.
pub const HOST_JOB: &str = "Host-node";
/// Container address of that exporter on the compose network.
pub const HOST_TARGET: &str = "nodeexp-node:9100";

const CHECKER_JOB: &str = "Xray Checker";
const CHECKER_TARGET: &str = "xray-checker:2112";

/// Job names external targets may not take.
pub const RESERVED_JOBS: &[&str] = &[CHECKER_JOB, HOST_JOB];

/// Top-level `prometheus.yml` document.
///
/// Field order is the serialization order; keep it alphabetical so the
/// output matches what operators already have on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeConfig {
    pub global: GlobalConfig,
    pub scrape_configs: Vec<ScrapeJob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalConfig {
    pub scrape_interval: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeJob {
    pub job_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_interval: Option<String>,
    pub static_configs: Vec<StaticConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticConfig {
    pub targets: Vec<String>,
}

impl ScrapeJob {
    fn node(job_name: &str, target: String) -> Self {
        Self {
            job_name: job_name.to_string(),
            metrics_path: None,
            scrape_interval: None,
            static_configs: vec![StaticConfig {
                targets: vec![target],
            }],
        }
    }

    fn checker() -> Self {
        Self {
            job_name: CHECKER_JOB.to_string(),
            metrics_path: Some("/metrics".to_string()),
            scrape_interval: Some("1m".to_string()),
            static_configs: vec![StaticConfig {
                targets: vec![CHECKER_TARGET.to_string()],
            }],
        }
    }
}

impl ScrapeConfig {
    /// Checker job, host exporter, then one job per external target in order.
    #[must_use]
    pub fn build(targets: &[MonitorTarget]) -> Self {
        let mut scrape_configs = vec![
            ScrapeJob::checker(),
            ScrapeJob::node(HOST_JOB, HOST_TARGET.to_string()),
        ];
        scrape_configs.extend(
            targets
                .iter()
                .map(|t| ScrapeJob::node(&t.name, t.scrape_address())),
        );
        Self {
            global: GlobalConfig {
                scrape_interval: "15s".to_string(),
            },
            scrape_configs,
        }
    }

    /// Node exporter entries: the host exporter plus the external targets.
    pub fn exporter_jobs(&self) -> impl Iterator<Item = &ScrapeJob> {
        self.scrape_configs.iter().filter(|j| j.job_name != CHECKER_JOB)
    }

    /// Serialize as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("cannot serialize prometheus config")
    }
}
