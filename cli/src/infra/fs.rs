//! Local filesystem: artifact writes and subscription path probes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ArtifactWriter;
use crate::domain::{Artifact, HostPaths};

/// Production filesystem implementation of `ArtifactWriter` and `HostPaths`.
pub struct LocalFs;

impl ArtifactWriter for LocalFs {
    fn write_artifact(&self, dir: &Path, artifact: &Artifact) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        let path = dir.join(artifact.file_name);
        std::fs::write(&path, &artifact.contents)
            .with_context(|| format!("writing artifact {}", path.display()))?;
        Ok(path)
    }
}

impl HostPaths for LocalFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
