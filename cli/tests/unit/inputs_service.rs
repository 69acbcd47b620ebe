//! Unit tests for interactive input collection.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use monstack_cli::application::services::inputs::{
    self, InputOverrides, choose_variant, collect_inputs,
};
use monstack_cli::domain::{DeploymentVariant, SubscriptionDescriptor};

use crate::mocks::{Answer, FakePaths, RecordingReporter, ScriptedPrompter};

#[test]
fn test_choose_variant_maps_menu_index() {
    let prompter = ScriptedPrompter::new([Answer::Pick(2)]);
    assert_eq!(
        choose_variant(&prompter).unwrap(),
        DeploymentVariant::ExporterOnly
    );
}

#[test]
fn test_subscription_loop_reprompts_until_valid() {
    let prompter = ScriptedPrompter::new([
        Answer::Text("ftp://nope"),
        Answer::Text("file:///etc/missing.json"),
        Answer::Text("  https://sub.example.com/x  "),
    ]);
    let reporter = RecordingReporter::default();
    let paths = FakePaths::default();

    let got = inputs::prompt_subscription(&prompter, &reporter, &paths).unwrap();

    assert_eq!(
        got,
        SubscriptionDescriptor::RemoteUrl("https://sub.example.com/x".into())
    );
    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("Unrecognized subscription format"));
    assert!(warnings[1].contains("/etc/missing.json"));
    assert!(
        warnings.iter().all(|w| w.ends_with(". Try again.") && !w.contains("..")),
        "got: {warnings:?}"
    );
}

#[test]
fn test_subscription_prompt_shows_formats_first() {
    let prompter = ScriptedPrompter::new([Answer::Text("https://x")]);
    let reporter = RecordingReporter::default();
    inputs::prompt_subscription(&prompter, &reporter, &FakePaths::default()).unwrap();
    let events = reporter.events.borrow();
    assert!(events[0].contains("folder:///path/to/configs"), "got: {events:?}");
}

#[test]
fn test_metrics_stack_declining_subscription_leaves_it_empty() {
    let prompter = ScriptedPrompter::new([Answer::No, Answer::No]);
    let got = collect_inputs(
        DeploymentVariant::MetricsStack,
        &InputOverrides::default(),
        true,
        &prompter,
        &RecordingReporter::default(),
        &FakePaths::default(),
    )
    .unwrap();
    assert!(got.subscription.is_none());
    assert!(got.targets.is_empty());
    assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_metrics_stack_full_interactive_session() {
    let prompter = ScriptedPrompter::new([
        // subscription
        Answer::Yes,
        Answer::Text("folder:///srv/subs"),
        // external nodes
        Answer::Yes,
        Answer::Text("999.1.1.1"),
        Answer::Text("10.0.0.1"),
        Answer::Text(""),
        Answer::Text("10.0.0.2"),
        Answer::Text("Host-node"),
        Answer::Text("edge"),
        Answer::Text("DONE"),
    ]);
    let reporter = RecordingReporter::default();
    let got = collect_inputs(
        DeploymentVariant::MetricsStack,
        &InputOverrides::default(),
        true,
        &prompter,
        &reporter,
        &FakePaths::with_dir("/srv/subs"),
    )
    .unwrap();

    assert!(matches!(got.subscription, Some(SubscriptionDescriptor::DirRef { .. })));
    let targets: Vec<_> = got
        .targets
        .iter()
        .map(|t| (t.name.as_str(), t.address.to_string()))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("External-node-1", "10.0.0.1".to_string()),
            ("edge", "10.0.0.2".to_string()),
        ]
    );
    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(warnings[0].contains("999.1.1.1"));
    assert!(warnings[1].contains("Host-node"));
    assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_empty_ip_answer_ends_node_loop() {
    let prompter = ScriptedPrompter::new([Answer::No, Answer::Yes, Answer::Text("")]);
    let got = collect_inputs(
        DeploymentVariant::MetricsStack,
        &InputOverrides::default(),
        true,
        &prompter,
        &RecordingReporter::default(),
        &FakePaths::default(),
    )
    .unwrap();
    assert!(got.targets.is_empty());
}

#[test]
fn test_target_flags_skip_node_prompts() {
    let prompter = ScriptedPrompter::new([Answer::No]);
    let got = collect_inputs(
        DeploymentVariant::MetricsStack,
        &InputOverrides {
            targets: vec!["10.9.9.9".into()],
            ..InputOverrides::default()
        },
        true,
        &prompter,
        &RecordingReporter::default(),
        &FakePaths::default(),
    )
    .unwrap();
    assert_eq!(got.targets.len(), 1);
    assert_eq!(got.targets[0].name, "External-node-1");
    assert_eq!(prompter.prompts.borrow().len(), 1);
}

#[test]
fn test_uptime_stack_asks_for_subscription_without_confirm() {
    let prompter = ScriptedPrompter::new([Answer::Text("https://s")]);
    let got = collect_inputs(
        DeploymentVariant::UptimeStack,
        &InputOverrides::default(),
        true,
        &prompter,
        &RecordingReporter::default(),
        &FakePaths::default(),
    )
    .unwrap();
    assert!(got.subscription.is_some());
    assert!(got.targets.is_empty());
}

#[test]
fn test_prompt_failure_propagates() {
    let prompter = ScriptedPrompter::silent();
    let err = collect_inputs(
        DeploymentVariant::UptimeStack,
        &InputOverrides::default(),
        true,
        &prompter,
        &RecordingReporter::default(),
        &FakePaths::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("unexpected prompt"));
}
