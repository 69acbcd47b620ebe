//! Compose templates for each deployment variant.

use crate::domain::manifest::{ManifestDocument, ServiceSection, list_item};

/// Compose key and container name of the proxy checker.
pub const CHECKER_SERVICE: &str = "xray-checker";

const CHECKER_IMAGE: &str = "image: kutovoys/xray-checker";
const RESTART: &str = "restart: unless-stopped";

fn monitoring_network() -> [&'static str; 2] {
    ["networks:", "  - monitoring"]
}

fn bridge_trailer() -> [&'static str; 3] {
    ["networks:", "  monitoring:", "    driver: bridge"]
}

fn exporter_mounts() -> [&'static str; 8] {
    [
        "volumes:",
        "  - /proc:/host/proc:ro",
        "  - /sys:/host/sys:ro",
        "  - /:/host:ro,rslave",
        "command:",
        "  - '--path.procfs=/host/proc'",
        "  - '--path.sysfs=/host/sys'",
        "  - '--path.rootfs=/host'",
    ]
}

fn subscription_env(subscription: &str) -> [String; 2] {
    [
        "environment:".to_string(),
        format!("  {}", list_item(&format!("SUBSCRIPTION_URL={subscription}"))),
    ]
}

/// Node Exporter + Prometheus + Grafana + proxy checker on a private bridge.
#[must_use]
pub fn metrics_stack(subscription: &str, grafana_admin_password: &str) -> ManifestDocument {
    let node_exporter = ServiceSection::new("node-exporter", "nodeexp-node")
        .before_identity(["image: prom/node-exporter:latest"])
        .after_identity([RESTART])
        .after_identity(monitoring_network())
        .after_identity(["ports:", "  - \"127.0.0.1:9100:9100\""])
        .after_identity(exporter_mounts());

    let prometheus = ServiceSection::new("prometheus", "prometheus")
        .before_identity(["image: prom/prometheus:latest"])
        .after_identity([RESTART])
        .after_identity(monitoring_network())
        .after_identity([
            "ports:",
            "  - \"127.0.0.1:9090:9090\"",
            "volumes:",
            "  - ./prometheus.yml:/etc/prometheus/prometheus.yml:ro",
            "  - prometheus_data:/prometheus",
        ]);

    let grafana = ServiceSection::new("grafana", "grafana")
        .before_identity(["image: grafana/grafana:latest"])
        .after_identity([RESTART])
        .after_identity(monitoring_network())
        .after_identity([
            "ports:",
            "  - \"127.0.0.1:3000:3000\"",
            "volumes:",
            "  - grafana_data:/var/lib/grafana",
            "environment:",
        ])
        .after_identity([
            format!(
                "  {}",
                list_item(&format!("GF_SECURITY_ADMIN_PASSWORD={grafana_admin_password}"))
            ),
            "  - GF_SECURITY_ALLOW_EMBEDDING=true".to_string(),
            "depends_on:".to_string(),
            "  - prometheus".to_string(),
        ]);

    let checker = ServiceSection::new(CHECKER_SERVICE, CHECKER_SERVICE)
        .before_identity([CHECKER_IMAGE])
        .before_identity(monitoring_network())
        .after_identity(subscription_env(subscription))
        .after_identity(["ports:", "  - \"127.0.0.1:2112:2112\""]);

    ManifestDocument::new()
        .with_preamble(["volumes:", "  prometheus_data:", "  grafana_data:", ""])
        .with_service(node_exporter)
        .with_service(prometheus)
        .with_service(grafana)
        .with_service(checker)
        .with_trailer(bridge_trailer())
}

/// Proxy checker + Uptime-Kuma.
#[must_use]
pub fn uptime_stack(subscription: &str) -> ManifestDocument {
    let checker = ServiceSection::new(CHECKER_SERVICE, CHECKER_SERVICE)
        .after_identity([RESTART, CHECKER_IMAGE])
        .after_identity(monitoring_network())
        .after_identity(subscription_env(subscription))
        .after_identity(["ports:", "  - \"127.0.0.1:2112:2112\""]);

    let kuma = ServiceSection::new("uptime-kuma", "uptime-kuma")
        .before_identity(["image: louislam/uptime-kuma:latest"])
        .after_identity([RESTART])
        .after_identity(monitoring_network())
        .after_identity([
            "ports:",
            "  - \"127.0.0.1:3001:3001\"",
            "volumes:",
            "  - uptime-kuma:/app/data",
        ]);

    ManifestDocument::new()
        .with_preamble(["volumes:", "  uptime-kuma:", ""])
        .with_service(checker)
        .with_service(kuma)
        .with_trailer(bridge_trailer())
}

/// A node exporter published on all interfaces for a remote Prometheus.
#[must_use]
pub fn exporter_only() -> ManifestDocument {
    let node_exporter = ServiceSection::new("node-exporter", "node-exporter")
        .before_identity(["image: prom/node-exporter:latest"])
        .after_identity([RESTART, "ports:", "  - \"9100:9100\""])
        .after_identity(exporter_mounts());

    ManifestDocument::new().with_service(node_exporter)
}
