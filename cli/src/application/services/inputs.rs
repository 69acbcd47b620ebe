//! Operator input collection: variant menu, subscription and target loops.
//!
//! Values passed on the command line are validated like prompted ones, but a
//! bad value is returned as an error instead of being asked again.

use std::net::Ipv4Addr;

use anyhow::Result;

use crate::application::ports::{ProgressReporter, Prompter};
use crate::domain::target::parse_ipv4;
use crate::domain::{
    DeploymentVariant, HostPaths, ManifestError, MonitorTarget, SubscriptionDescriptor,
    TargetError, TargetList, classify,
};

/// Shown before the first subscription prompt.
pub const SUBSCRIPTION_FORMATS: &str = "Subscription formats:\n  \
    1. URL: https://sub.example.com/<uuid>\n  \
    2. BASE64: base64 of a vmess://, vless:// or trojan:// URI\n  \
    3. JSON file: file:///path/to/config.json\n  \
    4. Folder with JSON files: folder:///path/to/configs";

/// Words that end the external node loop.
const DONE_WORDS: &[&str] = &["done", ""];

/// Inputs given up front, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct InputOverrides {
    pub subscription: Option<String>,
    pub targets: Vec<String>,
    pub master_ip: Option<String>,
}

/// Everything the assembler needs from the operator.
#[derive(Debug, Clone, Default)]
pub struct StackInputs {
    pub subscription: Option<SubscriptionDescriptor>,
    pub targets: Vec<MonitorTarget>,
}

/// Ask which variant to deploy.
///
/// # Errors
///
/// Returns an error if the prompt fails.
pub fn choose_variant(prompter: &impl Prompter) -> Result<DeploymentVariant> {
    let labels: Vec<&str> = DeploymentVariant::ALL.iter().map(|v| v.menu_label()).collect();
    let idx = prompter.select("Select a deployment variant", &labels)?;
    DeploymentVariant::ALL
        .get(idx)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("invalid variant selection: {idx}"))
}

/// Gather the subscription and external targets `variant` needs.
///
/// # Errors
///
/// Returns an error for invalid command-line values, or if a prompt fails.
pub fn collect_inputs(
    variant: DeploymentVariant,
    overrides: &InputOverrides,
    interactive: bool,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    paths: &impl HostPaths,
) -> Result<StackInputs> {
    let subscription = if variant.has_checker() {
        collect_subscription(variant, overrides, interactive, prompter, reporter, paths)?
    } else {
        None
    };
    let targets = collect_targets(variant, overrides, interactive, prompter, reporter)?;
    Ok(StackInputs {
        subscription,
        targets,
    })
}

fn collect_subscription(
    variant: DeploymentVariant,
    overrides: &InputOverrides,
    interactive: bool,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    paths: &impl HostPaths,
) -> Result<Option<SubscriptionDescriptor>> {
    if let Some(raw) = &overrides.subscription {
        let descriptor = classify(raw, paths)?;
        tracing::debug!(kind = ?descriptor.kind(), "subscription accepted");
        return Ok(Some(descriptor));
    }
    if !interactive {
        return Ok(None);
    }
    if variant.allows_empty_subscription()
        && !prompter.confirm("Configure a subscription for the Xray checker?", true)?
    {
        return Ok(None);
    }
    prompt_subscription(prompter, reporter, paths).map(Some)
}

/// Ask for a subscription until one classifies.
///
/// # Errors
///
/// Returns an error only if the prompt itself fails.
pub fn prompt_subscription(
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    paths: &impl HostPaths,
) -> Result<SubscriptionDescriptor> {
    reporter.step(SUBSCRIPTION_FORMATS);
    loop {
        let answer = prompter.input("Xray subscription")?;
        match classify(&answer, paths) {
            Ok(descriptor) => {
                tracing::debug!(kind = ?descriptor.kind(), "subscription accepted");
                return Ok(descriptor);
            }
            Err(e) => {
                tracing::debug!(error = %e, "subscription rejected");
                reporter.warn(&format!("{e}. Try again."));
            }
        }
    }
}

/// Check every command-line value without prompting or touching the host.
///
/// Anything that would make the run fail later must fail here, before Docker
/// is checked or installed.
///
/// # Errors
///
/// Returns the first invalid value: subscription, target, master IP, or a
/// missing subscription that could not be prompted for.
pub fn check_overrides(
    variant: DeploymentVariant,
    overrides: &InputOverrides,
    interactive: bool,
    paths: &impl HostPaths,
) -> Result<()> {
    if let Some(raw) = &overrides.master_ip {
        parse_ipv4(raw)?;
    }
    if variant.has_checker() {
        match &overrides.subscription {
            Some(raw) => {
                classify(raw, paths)?;
            }
            None if !interactive && !variant.allows_empty_subscription() => {
                return Err(ManifestError::SubscriptionRequired {
                    variant: variant.as_str(),
                }
                .into());
            }
            None => {}
        }
    }
    flag_targets(variant, overrides)?;
    Ok(())
}

fn flag_targets(
    variant: DeploymentVariant,
    overrides: &InputOverrides,
) -> Result<TargetList, TargetError> {
    if !variant.accepts_targets() && !overrides.targets.is_empty() {
        return Err(TargetError::NotScraped(variant.as_str()));
    }
    let mut list = TargetList::new();
    for arg in &overrides.targets {
        let target = MonitorTarget::parse_arg(arg, &list.next_default_name())?;
        list.push(target)?;
    }
    Ok(list)
}

fn collect_targets(
    variant: DeploymentVariant,
    overrides: &InputOverrides,
    interactive: bool,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
) -> Result<Vec<MonitorTarget>> {
    let mut list = flag_targets(variant, overrides)?;
    if variant.accepts_targets()
        && interactive
        && overrides.targets.is_empty()
        && prompter.confirm("Add external nodes to monitor?", false)?
    {
        prompt_targets(&mut list, prompter, reporter)?;
    }
    Ok(list.into_vec())
}

/// Ask for node IPs until `done` (or an empty answer), naming each one.
fn prompt_targets(
    list: &mut TargetList,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    loop {
        let answer = prompter.input("Node IP address ('done' to finish)")?;
        if DONE_WORDS.contains(&answer.to_ascii_lowercase().as_str()) {
            return Ok(());
        }
        let address = match parse_ipv4(&answer) {
            Ok(address) => address,
            Err(e) => {
                reporter.warn(&e.to_string());
                continue;
            }
        };
        let target = prompt_target_name(list, address, prompter, reporter)?;
        tracing::debug!(name = %target.name, address = %target.address, "target added");
        list.push(target)?;
    }
}

fn prompt_target_name(
    list: &TargetList,
    address: Ipv4Addr,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
) -> Result<MonitorTarget> {
    loop {
        let default = list.next_default_name();
        let name = prompter.input_with_default("Node name", &default)?;
        match MonitorTarget::new(&name, &address.to_string()) {
            Ok(target) if list.contains_name(&target.name) => {
                reporter.warn(&format!("Target name '{}' is already used", target.name));
            }
            Ok(target) => return Ok(target),
            Err(e) => reporter.warn(&e.to_string()),
        }
    }
}

/// Resolve the master node allowed through the firewall on an exporter node.
///
/// An empty interactive answer skips the firewall step.
///
/// # Errors
///
/// Returns an error if the command-line value is not an IPv4 literal, or if
/// the prompt fails.
pub fn collect_master_ip(
    overrides: &InputOverrides,
    interactive: bool,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
) -> Result<Option<Ipv4Addr>> {
    if let Some(raw) = &overrides.master_ip {
        return Ok(Some(parse_ipv4(raw)?));
    }
    if !interactive {
        return Ok(None);
    }
    loop {
        let answer = prompter.input("Master node IP for UFW (empty to skip)")?;
        if answer.is_empty() {
            return Ok(None);
        }
        match parse_ipv4(&answer) {
            Ok(address) => return Ok(Some(address)),
            Err(e) => reporter.warn(&e.to_string()),
        }
    }
}
