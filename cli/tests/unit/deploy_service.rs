//! Unit tests for the deploy and render use-cases.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use monstack_cli::application::services::deploy::{
    self, DeployOutcome, DeployPorts, DeployRequest,
};
use monstack_cli::application::services::docker::{
    DockerInstall, DockerStatus, LONG_COMMAND_TIMEOUT,
};
use monstack_cli::application::services::inputs::InputOverrides;
use monstack_cli::domain::{
    CommandError, DeploymentVariant, ManifestError, StackSettings, SubscriptionKind, TargetError,
};

use crate::mocks::{
    Answer, FakePaths, MemoryWriter, RecordingReporter, RecordingRunner, ScriptedPrompter,
};

const OUT: &str = "/srv/monitoring";

fn install() -> DockerInstall {
    DockerInstall {
        install_url: "https://get.docker.com".to_string(),
        script_path: PathBuf::from("/tmp/get-docker.sh"),
        user: "ops".to_string(),
    }
}

fn request(variant: DeploymentVariant, overrides: InputOverrides) -> DeployRequest {
    DeployRequest {
        variant,
        overrides,
        interactive: false,
        output_dir: PathBuf::from(OUT),
        settings: StackSettings::default(),
    }
}

struct Harness {
    runner: RecordingRunner,
    prompter: ScriptedPrompter,
    writer: MemoryWriter,
    reporter: RecordingReporter,
    paths: FakePaths,
}

impl Harness {
    fn new(runner: RecordingRunner) -> Self {
        Self {
            runner,
            prompter: ScriptedPrompter::silent(),
            writer: MemoryWriter::default(),
            reporter: RecordingReporter::default(),
            paths: FakePaths::default(),
        }
    }

    fn ports(
        &self,
    ) -> DeployPorts<'_, RecordingRunner, ScriptedPrompter, MemoryWriter, RecordingReporter, FakePaths>
    {
        DeployPorts {
            runner: &self.runner,
            prompter: &self.prompter,
            writer: &self.writer,
            reporter: &self.reporter,
            paths: &self.paths,
        }
    }

    async fn deploy(&self, req: &DeployRequest) -> anyhow::Result<DeployOutcome> {
        deploy::deploy(&self.ports(), req, &install()).await
    }
}

fn compose_up_line() -> String {
    format!("docker compose -f {OUT}/docker-compose.yml up -d")
}

// ── metrics-stack ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_metrics_stack_writes_both_files_and_starts_compose() {
    let h = Harness::new(RecordingRunner::new());
    let req = request(
        DeploymentVariant::MetricsStack,
        InputOverrides {
            subscription: Some("https://sub.example.com/abc".into()),
            targets: vec!["fra-1=10.0.0.1".into(), "10.0.0.2".into()],
            master_ip: None,
        },
    );

    let outcome = h.deploy(&req).await.expect("deploy succeeds");

    assert_eq!(h.writer.file_names(), vec!["prometheus.yml", "docker-compose.yml"]);
    assert_eq!(h.runner.calls(), vec!["docker --version".to_string(), compose_up_line()]);
    assert!(outcome.launched);
    assert_eq!(outcome.subscription, Some(SubscriptionKind::RemoteUrl));
    assert_eq!(outcome.endpoints.len(), 4);
    assert_eq!(
        outcome.docker,
        Some(DockerStatus::AlreadyInstalled {
            version: "Docker version 27.3.1, build ce12230".into()
        })
    );
    let names: Vec<_> = outcome.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["fra-1", "External-node-2"]);

    let prom = h.writer.contents("prometheus.yml").unwrap();
    assert!(prom.contains("10.0.0.1:9100"));
    assert!(prom.contains("External-node-2"));
    assert_eq!(h.prompter.prompts.borrow().len(), 0, "non-interactive run prompted");
}

#[tokio::test]
async fn test_metrics_stack_without_subscription_emits_empty_value() {
    let h = Harness::new(RecordingRunner::new());
    let outcome = h
        .deploy(&request(DeploymentVariant::MetricsStack, InputOverrides::default()))
        .await
        .expect("deploy succeeds");
    assert!(outcome.subscription.is_none());
    let compose = h.writer.contents("docker-compose.yml").unwrap();
    assert!(compose.contains("- SUBSCRIPTION_URL=\n"), "got:\n{compose}");
}

#[tokio::test]
async fn test_compose_up_uses_long_timeout() {
    let h = Harness::new(RecordingRunner::new());
    h.deploy(&request(DeploymentVariant::MetricsStack, InputOverrides::default()))
        .await
        .unwrap();
    let timeouts = h.runner.timeouts.borrow();
    assert_eq!(timeouts.last().copied().flatten(), Some(LONG_COMMAND_TIMEOUT));
}

// ── Docker installation ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_docker_is_installed_before_artifacts() {
    let h = Harness::new(RecordingRunner::without_docker());
    let outcome = h
        .deploy(&request(DeploymentVariant::MetricsStack, InputOverrides::default()))
        .await
        .expect("deploy succeeds");

    assert_eq!(
        h.runner.calls(),
        vec![
            "docker --version".to_string(),
            "curl -fsSL https://get.docker.com -o /tmp/get-docker.sh".to_string(),
            "sh /tmp/get-docker.sh".to_string(),
            "sudo usermod -aG docker ops".to_string(),
            compose_up_line(),
        ]
    );
    assert_eq!(outcome.docker, Some(DockerStatus::Installed));
    assert!(h.reporter.warnings().iter().any(|w| w.contains("newgrp docker")));
}

#[tokio::test]
async fn test_docker_version_nonzero_exit_triggers_install() {
    let runner = RecordingRunner::default().fail("docker --version", 127, "not found");
    let h = Harness::new(runner);
    h.deploy(&request(DeploymentVariant::ExporterOnly, InputOverrides::default()))
        .await
        .unwrap();
    assert!(h.runner.called("curl -fsSL"));
}

#[tokio::test]
async fn test_failed_docker_install_stops_before_writing() {
    let runner = RecordingRunner::without_docker().fail("curl", 22, "404 Not Found");
    let h = Harness::new(runner);

    let err = h
        .deploy(&request(DeploymentVariant::MetricsStack, InputOverrides::default()))
        .await
        .unwrap_err();

    let failed = err.downcast_ref::<CommandError>().expect("command error");
    let CommandError::Failed { command, code, stderr } = failed;
    assert!(command.starts_with("curl -fsSL"));
    assert_eq!(code, "22");
    assert_eq!(stderr, "404 Not Found");
    assert!(h.writer.file_names().is_empty());
    assert!(!h.runner.called("sh "));
    assert!(!h.runner.called("docker compose"));
}

// ── uptime-stack ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_uptime_stack_without_subscription_fails_before_compose() {
    let h = Harness::new(RecordingRunner::new());
    let err = h
        .deploy(&request(DeploymentVariant::UptimeStack, InputOverrides::default()))
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ManifestError>(),
        Some(&ManifestError::SubscriptionRequired {
            variant: "uptime-stack"
        })
    );
    assert!(!h.runner.called("docker compose"));
    assert!(h.writer.file_names().is_empty());
}

#[tokio::test]
async fn test_uptime_stack_file_subscription_is_mounted() {
    let mut h = Harness::new(RecordingRunner::new());
    h.paths = FakePaths::with_file("/etc/xray/sub.json");
    let outcome = h
        .deploy(&request(
            DeploymentVariant::UptimeStack,
            InputOverrides {
                subscription: Some("file:///etc/xray/sub.json".into()),
                ..InputOverrides::default()
            },
        ))
        .await
        .unwrap();
    assert_eq!(h.writer.file_names(), vec!["docker-compose.yml"]);
    assert_eq!(outcome.endpoints.len(), 2);
    let compose = h.writer.contents("docker-compose.yml").unwrap();
    assert!(compose.contains("- /etc/xray/sub.json:/etc/xray/sub.json:ro"));
}

#[tokio::test]
async fn test_bad_subscription_flag_is_an_error_not_a_prompt() {
    let h = Harness::new(RecordingRunner::new());
    let mut req = request(
        DeploymentVariant::UptimeStack,
        InputOverrides {
            subscription: Some("file:///missing.json".into()),
            ..InputOverrides::default()
        },
    );
    req.interactive = true;
    let err = h.deploy(&req).await.unwrap_err();
    assert!(err.to_string().contains("not found"), "got: {err}");
    assert!(h.prompter.prompts.borrow().is_empty());
}

#[tokio::test]
async fn test_missing_subscription_file_fails_before_docker_install() {
    let h = Harness::new(RecordingRunner::without_docker());
    let err = h
        .deploy(&request(
            DeploymentVariant::UptimeStack,
            InputOverrides {
                subscription: Some("file:///missing.json".into()),
                ..InputOverrides::default()
            },
        ))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"), "got: {err}");
    assert!(!h.runner.called("curl"));
    assert!(h.runner.calls().is_empty(), "ran: {:?}", h.runner.calls());
}

#[tokio::test]
async fn test_uptime_stack_without_subscription_never_installs_docker() {
    let h = Harness::new(RecordingRunner::without_docker());
    let err = h
        .deploy(&request(DeploymentVariant::UptimeStack, InputOverrides::default()))
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<ManifestError>().is_some(), "got: {err}");
    assert!(!h.runner.called("curl"));
    assert!(!h.runner.called("sudo"));
}

#[tokio::test]
async fn test_bad_target_flag_fails_before_docker_install() {
    let h = Harness::new(RecordingRunner::without_docker());
    let err = h
        .deploy(&request(
            DeploymentVariant::MetricsStack,
            InputOverrides {
                targets: vec!["edge=10.0.0.256".into()],
                ..InputOverrides::default()
            },
        ))
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<TargetError>().is_some(), "got: {err}");
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn test_uptime_stack_prompts_for_subscription_after_docker_check() {
    let mut h = Harness::new(RecordingRunner::new());
    h.prompter = ScriptedPrompter::new([Answer::Text("https://sub.example.com/x")]);
    let mut req = request(DeploymentVariant::UptimeStack, InputOverrides::default());
    req.interactive = true;

    let outcome = h.deploy(&req).await.unwrap();

    assert_eq!(outcome.subscription, Some(SubscriptionKind::RemoteUrl));
    assert_eq!(h.runner.calls()[0], "docker --version");
    assert_eq!(h.prompter.remaining(), 0);
}

// ── exporter-only ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_exporter_only_opens_firewall_for_master() {
    let h = Harness::new(RecordingRunner::new());
    let outcome = h
        .deploy(&request(
            DeploymentVariant::ExporterOnly,
            InputOverrides {
                master_ip: Some("192.168.1.10".into()),
                subscription: Some("https://ignored".into()),
                ..InputOverrides::default()
            },
        ))
        .await
        .unwrap();

    assert_eq!(
        h.runner.calls(),
        vec![
            "docker --version".to_string(),
            "sudo ufw allow from 192.168.1.10".to_string(),
            compose_up_line(),
        ]
    );
    assert_eq!(h.writer.file_names(), vec!["docker-compose.yml"]);
    let fw = outcome.firewall.expect("firewall attempted");
    assert!(fw.applied);
    assert!(outcome.subscription.is_none());
}

#[tokio::test]
async fn test_firewall_failure_is_only_a_warning() {
    let runner = RecordingRunner::new().fail("sudo ufw", 1, "ufw: command not found");
    let h = Harness::new(runner);
    let outcome = h
        .deploy(&request(
            DeploymentVariant::ExporterOnly,
            InputOverrides {
                master_ip: Some("10.1.1.1".into()),
                ..InputOverrides::default()
            },
        ))
        .await
        .expect("deploy continues");
    assert!(!outcome.firewall.unwrap().applied);
    assert!(outcome.launched);
    assert!(h.reporter.warnings().iter().any(|w| w.contains("ufw: command not found")));
}

#[tokio::test]
async fn test_invalid_master_ip_flag_fails_before_any_command() {
    let h = Harness::new(RecordingRunner::new());
    let err = h
        .deploy(&request(
            DeploymentVariant::ExporterOnly,
            InputOverrides {
                master_ip: Some("10.0.0.300".into()),
                ..InputOverrides::default()
            },
        ))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid IPv4"), "got: {err}");
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn test_interactive_master_ip_reprompts_then_skips_on_empty() {
    let mut h = Harness::new(RecordingRunner::new());
    h.prompter = ScriptedPrompter::new([Answer::Text("not-an-ip"), Answer::Text("")]);
    let mut req = request(DeploymentVariant::ExporterOnly, InputOverrides::default());
    req.interactive = true;

    let outcome = h.deploy(&req).await.unwrap();

    assert!(outcome.firewall.is_none());
    assert!(!h.runner.called("sudo ufw"));
    assert_eq!(h.reporter.warnings().len(), 1);
    assert_eq!(h.prompter.remaining(), 0);
}

// ── Failures after writing ────────────────────────────────────────────────────

#[tokio::test]
async fn test_compose_failure_keeps_written_artifacts() {
    let runner = RecordingRunner::new().fail("docker compose", 1, "pull access denied");
    let h = Harness::new(runner);
    let err = h
        .deploy(&request(DeploymentVariant::MetricsStack, InputOverrides::default()))
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<CommandError>().is_some());
    assert_eq!(h.writer.file_names().len(), 2);
}

#[tokio::test]
async fn test_write_failure_skips_compose() {
    let mut h = Harness::new(RecordingRunner::new());
    h.writer = MemoryWriter::failing();
    let err = h
        .deploy(&request(DeploymentVariant::ExporterOnly, InputOverrides::default()))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("disk full"));
    assert!(!h.runner.called("docker compose"));
}

// ── render ────────────────────────────────────────────────────────────────────

#[test]
fn test_render_never_runs_commands() {
    let h = Harness::new(RecordingRunner::new());
    let req = request(
        DeploymentVariant::MetricsStack,
        InputOverrides {
            targets: vec!["edge=172.16.0.9".into()],
            ..InputOverrides::default()
        },
    );
    let outcome = deploy::render(&h.ports(), &req).expect("render succeeds");
    assert!(h.runner.calls().is_empty());
    assert!(!outcome.launched);
    assert!(outcome.endpoints.is_empty());
    assert_eq!(outcome.artifacts.len(), 2);
    assert_eq!(outcome.artifacts[0], PathBuf::from(OUT).join("prometheus.yml"));
}

#[test]
fn test_render_is_deterministic() {
    let req = request(
        DeploymentVariant::MetricsStack,
        InputOverrides {
            subscription: Some("folder:///srv/subs".into()),
            targets: vec!["a=10.0.0.1".into(), "b=10.0.0.2".into()],
            master_ip: None,
        },
    );
    let render_once = || {
        let mut h = Harness::new(RecordingRunner::new());
        h.paths = FakePaths::with_dir("/srv/subs");
        deploy::render(&h.ports(), &req).unwrap();
        h.writer.written.borrow().clone()
    };
    assert_eq!(render_once(), render_once());
}

#[test]
fn test_duplicate_target_flags_are_rejected() {
    let h = Harness::new(RecordingRunner::new());
    let req = request(
        DeploymentVariant::MetricsStack,
        InputOverrides {
            targets: vec!["edge=10.0.0.1".into(), "edge=10.0.0.2".into()],
            ..InputOverrides::default()
        },
    );
    let err = deploy::render(&h.ports(), &req).unwrap_err();
    assert!(err.to_string().contains("already used"), "got: {err}");
    assert!(h.writer.file_names().is_empty());
}

#[test]
fn test_target_flags_are_rejected_for_stacks_without_prometheus() {
    for variant in [DeploymentVariant::UptimeStack, DeploymentVariant::ExporterOnly] {
        let h = Harness::new(RecordingRunner::new());
        let req = request(
            variant,
            InputOverrides {
                subscription: Some("https://sub.example.com/x".into()),
                targets: vec!["garbage".into()],
                master_ip: None,
            },
        );
        let err = deploy::render(&h.ports(), &req).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TargetError>(),
            Some(&TargetError::NotScraped(variant.as_str()))
        );
        assert!(h.writer.file_names().is_empty());
    }
}
