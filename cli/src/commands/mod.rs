//! Command implementations

pub mod config;
pub mod deploy;
pub mod render;
pub mod validate;
pub mod version;

use std::path::PathBuf;

use clap::Args;

use crate::application::services::inputs::InputOverrides;
use crate::domain::MonstackConfig;

/// Stack inputs shared by `deploy` and `render`.
#[derive(Args, Debug, Default, Clone)]
pub struct StackArgs {
    /// Subscription: https URL, base64 proxy URI, file:///path or folder:///path
    #[arg(long, value_name = "SUBSCRIPTION")]
    pub subscription: Option<String>,

    /// External node to scrape, as NAME=IP or IP (repeatable)
    #[arg(long = "target", value_name = "NAME=IP")]
    pub targets: Vec<String>,

    /// Master node allowed through UFW (exporter-only)
    #[arg(long, value_name = "IP")]
    pub master_ip: Option<String>,

    /// Directory for prometheus.yml and docker-compose.yml
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl StackArgs {
    /// Split into prompt overrides and the resolved output directory.
    #[must_use]
    pub fn resolve(self, config: &MonstackConfig) -> (InputOverrides, PathBuf) {
        let output_dir = self
            .output_dir
            .unwrap_or_else(|| PathBuf::from(&config.deploy.output_dir));
        let overrides = InputOverrides {
            subscription: self.subscription,
            targets: self.targets,
            master_ip: self.master_ip,
        };
        (overrides, output_dir)
    }
}
