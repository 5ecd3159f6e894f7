//! Locates the `docguard` configuration for a check run.
//!
//! An explicit `--config` path always wins. Otherwise the checked directory
//! and its parents up to the Go module root (the nearest directory holding
//! `go.mod`) are searched for a config file, nearest first. Outside a module
//! only the checked directory itself is searched. Without a file the
//! defaults apply.

use anyhow::{Context, Result};
use docguard_core::{Config, ConfigFormat};
use std::path::{Path, PathBuf};

/// Config file names, checked in order within one directory.
pub const CONFIG_NAMES: &[&str] = &["docguard.yaml", ".docguard.yaml", "docguard.toml"];

/// Marks the root of a Go module.
const GO_MOD: &str = "go.mod";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config` or `DOCGUARD_CONFIG`; must exist.
    Explicit(PathBuf),
    /// Found next to the checked code.
    Discovered(PathBuf),
    /// No file; defaults apply.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Discovered(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads the file as YAML, or TOML for a `.toml` extension, and applies
    /// the minimums of its `tier`.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };

        let config = Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            format = ?ConfigFormat::from_path(path),
            tier = config.tier.as_deref().unwrap_or("none"),
            "config gathered from file"
        );
        Ok(config)
    }
}

/// Resolves the configuration for checking `target`.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    let target = target
        .canonicalize()
        .unwrap_or_else(|_| target.to_path_buf());

    search_dirs(&target)
        .into_iter()
        .find_map(|dir| {
            CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
        .map_or(ConfigSource::Default, |path| {
            tracing::debug!("Found config: {}", path.display());
            ConfigSource::Discovered(path)
        })
}

/// `target` and its parents up to the module root, nearest first.
fn search_dirs(target: &Path) -> Vec<&Path> {
    let mut dirs = Vec::new();
    for dir in target.ancestors() {
        dirs.push(dir);
        if dir.join(GO_MOD).is_file() {
            return dirs;
        }
    }
    dirs.truncate(1);
    dirs
}
