//! `config show` / `config set` against a `ConfigStore`.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::MonstackConfig;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the stored file exists but cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<MonstackConfig> {
    store.load()
}

/// Validate, assign and persist one setting. Returns the updated config.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or saving fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<MonstackConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    tracing::info!(%key, "setting saved");
    Ok(config)
}
