//! Watch for device mounts and commit clippings as they appear.

use crate::config::SyncConfig;
use crate::service::SyncService;
use anyhow::{Context, Result};
use clap::Parser;
use clipsync_device::{MountPipeline, PipelineConfig, UDisks2Resolver, UDisks2Source};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Watch for device mounts and commit clippings as they appear
///
/// Subscribes to the system's device-management bus, waits for the
/// e-reader's filesystem to finish mounting, and commits its clippings
/// file into the configured repository. Runs until interrupted.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    # Watch and commit into an existing repository
    clipsync watch --repo-path ~/clippings-repo

    # Same, with a notification icon and faster resolution retry
    clipsync watch --repo-path ~/clippings-repo --icon ~/.local/share/clipsync/icon.png --retry-delay-ms 250")]
pub struct WatchCmd {
    /// Path to the git repository that stores clippings
    #[arg(long, value_name = "PATH")]
    pub repo_path: Option<PathBuf>,

    /// Optional TOML config file (flags take precedence)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Icon shown with desktop notifications
    #[arg(long, value_name = "PATH")]
    pub icon: Option<PathBuf>,

    /// Delay before the single property-resolution retry
    #[arg(long, value_name = "MILLIS")]
    pub retry_delay_ms: Option<u64>,
}

impl WatchCmd {
    pub async fn execute(&self) -> Result<()> {
        let config = SyncConfig::resolve(
            self.config.as_deref(),
            self.repo_path.clone(),
            self.icon.clone(),
            self.retry_delay_ms,
        )?;
        info!("repository: {}", config.repo_path.display());

        let source = UDisks2Source::connect()
            .await
            .context("failed to connect to the system bus")?;
        let resolver = UDisks2Resolver::new(source.connection().clone());

        let (event_tx, event_rx) = mpsc::channel(64);
        let (identity_tx, mut identity_rx) = mpsc::channel(8);

        tokio::spawn(async move {
            if let Err(e) = source.run(event_tx).await {
                error!("event source terminated: {}", e);
            }
        });

        let pipeline = MountPipeline::with_config(
            resolver,
            PipelineConfig {
                retry_delay: config.retry_delay,
            },
        );
        tokio::spawn(pipeline.run(event_rx, identity_tx));

        let service = SyncService::new(&config);
        // draining one receiver serializes commit attempts per repository,
        // even when two devices mount in the same tick
        while let Some(identity) = identity_rx.recv().await {
            service.handle_mount(&identity).await;
        }

        Ok(())
    }
}
