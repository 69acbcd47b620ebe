//! `~/.monstack/config.yaml` (or `$MONSTACK_CONFIG`) behind the `ConfigStore` port.

use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{CONFIG_ENV, MonstackConfig};

/// YAML settings file. The location is resolved on every call unless pinned
/// with [`YamlConfigStore::at`].
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    pinned: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store that always uses `path`, ignoring `MONSTACK_CONFIG`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            pinned: Some(path.into()),
        }
    }
}

fn default_location() -> Result<PathBuf> {
    if let Some(val) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(val));
    }
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".monstack").join("config.yaml"))
}

/// Write `content` next to `path` and rename it into place, so the file is
/// never visible half-written or with wider permissions than 0600.
fn replace_private(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("yaml.tmp");
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(&tmp)
        .with_context(|| format!("cannot write {}", tmp.display()))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("cannot write {}", tmp.display()))?;
    drop(file);
    std::fs::rename(&tmp, path)
        .with_context(|| format!("cannot replace {}", path.display()))
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<MonstackConfig> {
        let path = self.path()?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(MonstackConfig::default());
            }
            Err(e) => return Err(e).with_context(|| format!("cannot read {}", path.display())),
        };
        if content.trim().is_empty() {
            return Ok(MonstackConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &MonstackConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
        }
        let yaml = serde_yaml::to_string(config).context("cannot serialize config")?;
        replace_private(&path, &yaml)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        match &self.pinned {
            Some(path) => Ok(path.clone()),
            None => default_location(),
        }
    }
}
