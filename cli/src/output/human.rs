//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::deploy::DeployOutcome;
use crate::application::services::docker::DockerStatus;
use crate::domain::config::{CONFIG_ENV, VALID_CONFIG_KEYS};
use crate::domain::{COMPOSE_FILE, MonstackConfig, SubscriptionDescriptor, SubscriptionKind};
use crate::output::OutputContext;

/// Renders command results as human-readable terminal output.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Summary printed after `deploy` or `render`.
    pub fn render_outcome(&self, outcome: &DeployOutcome) {
        if self.ctx.quiet {
            return;
        }
        if outcome.launched {
            self.ctx.header("Deployment complete");
        } else {
            self.ctx.header("Artifacts rendered");
        }
        self.ctx.kv("Variant:", outcome.variant.as_str());
        if let Some(kind) = outcome.subscription {
            self.ctx.kv("Subscription:", kind_label(kind));
        }
        if !outcome.targets.is_empty() {
            let names: Vec<String> = outcome
                .targets
                .iter()
                .map(|t| format!("{} ({})", t.name, t.address))
                .collect();
            self.ctx.kv("Nodes:", &names.join(", "));
        }
        for path in &outcome.artifacts {
            self.ctx.kv("Wrote:", &path.display().to_string());
        }
        if let Some(DockerStatus::Installed) = outcome.docker {
            self.ctx
                .warn("Docker was just installed: re-login or run 'newgrp docker'");
        }
        if let Some(fw) = outcome.firewall.as_ref().filter(|fw| !fw.applied) {
            self.ctx.warn(&format!(
                "UFW rule for {} not applied; run: sudo ufw allow from {}",
                fw.allowed_from, fw.allowed_from
            ));
        }
        if !outcome.endpoints.is_empty() {
            println!();
            for ep in &outcome.endpoints {
                println!(
                    "  {:<16} {}",
                    format!("{}:", ep.name).style(self.ctx.styles.bold),
                    ep.url.style(self.ctx.styles.link)
                );
            }
        }
        if !outcome.launched {
            println!();
            println!(
                "  Start it with: docker compose -f {} up -d",
                outcome.output_dir.join(COMPOSE_FILE).display()
            );
        }
    }

    /// Result of `validate`.
    pub fn render_subscription(&self, descriptor: &SubscriptionDescriptor) {
        self.ctx.success(&format!(
            "Valid subscription: {}",
            kind_label(descriptor.kind())
        ));
        if let Some(path) = descriptor.mount_path() {
            self.ctx.kv(
                "Mount:",
                &format!("{}:{}:ro", path.display(), path.display()),
            );
        }
    }

    /// `config show`.
    pub fn render_config(&self, config: &MonstackConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for key in VALID_CONFIG_KEYS {
            let value = match *key {
                "grafana.admin_password" => "********",
                _ => config.get(key).unwrap_or_default(),
            };
            println!("  {:<24} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in [CONFIG_ENV, "NO_COLOR", "RUST_LOG"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// `version`.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("monstack {version}");
    }
}

/// Short human label for a subscription form.
#[must_use]
pub fn kind_label(kind: SubscriptionKind) -> &'static str {
    match kind {
        SubscriptionKind::RemoteUrl => "remote URL",
        SubscriptionKind::Base64Proxy => "base64 proxy URI",
        SubscriptionKind::FileRef => "JSON file",
        SubscriptionKind::DirRef => "folder of JSON files",
    }
}
