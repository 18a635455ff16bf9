//! Watcher configuration.
//!
//! Configuration is an explicit value handed to the pipeline and committer
//! at construction, never ambient global state. Flags win over the optional
//! TOML file; the repository path must come from one of the two.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default delay before the single property-resolution retry
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Resolved watcher configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Git repository the clippings are committed into
    pub repo_path: PathBuf,

    /// Icon shown with desktop notifications
    pub icon: Option<PathBuf>,

    /// Delay before the pipeline's property-resolution retry
    pub retry_delay: Duration,
}

/// Optional on-disk configuration, merged under the command line
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    repo_path: Option<PathBuf>,
    icon: Option<PathBuf>,
    retry_delay_ms: Option<u64>,
}

impl SyncConfig {
    /// Merge command-line values over an optional TOML file.
    pub fn resolve(
        file: Option<&Path>,
        repo_path: Option<PathBuf>,
        icon: Option<PathBuf>,
        retry_delay_ms: Option<u64>,
    ) -> Result<Self> {
        let file_config = match file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str::<FileConfig>(&content)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => FileConfig::default(),
        };

        let Some(repo_path) = repo_path.or(file_config.repo_path) else {
            bail!("no git repository path provided");
        };

        Ok(SyncConfig {
            repo_path,
            icon: icon.or(file_config.icon),
            retry_delay: Duration::from_millis(
                retry_delay_ms
                    .or(file_config.retry_delay_ms)
                    .unwrap_or(DEFAULT_RETRY_DELAY_MS),
            ),
        })
    }
}
