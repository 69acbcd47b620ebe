//! Terminal implementation of the `Prompter` port.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};

use crate::application::ports::Prompter;

/// Asks questions on the controlling terminal via dialoguer.
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("prompt: {prompt}"))?;
        Ok(answer.trim().to_string())
    }

    fn input_with_default(&self, prompt: &str, default: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
            .with_context(|| format!("prompt: {prompt}"))?;
        Ok(answer.trim().to_string())
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .with_context(|| format!("prompt: {prompt}"))
    }

    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .with_context(|| format!("prompt: {prompt}"))
    }
}
