//! One-shot extraction and commit from an already-mounted path.

use crate::output;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use clipsync_device::{clippings, DeviceError};
use clipsync_git::Committer;
use std::path::PathBuf;

/// Extract and commit once from an already-mounted path
///
/// Reads the clippings file under the given mount point and commits it for
/// the given serial, exactly as the watcher would. Useful when the device
/// was already plugged in before the watcher started.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    # Commit clippings from a mounted device
    clipsync sync --repo-path ~/clippings-repo --mount-point /media/kindle --serial B012ABCD1234")]
pub struct SyncCmd {
    /// Path to the git repository that stores clippings
    #[arg(long, value_name = "PATH")]
    pub repo_path: PathBuf,

    /// Mount point of the device's filesystem
    #[arg(long, value_name = "PATH")]
    pub mount_point: PathBuf,

    /// Device serial the clippings are stored under
    #[arg(long, value_name = "SERIAL")]
    pub serial: String,
}

impl SyncCmd {
    pub async fn execute(&self) -> Result<()> {
        let text = match clippings::extract(&self.mount_point).await {
            Ok(text) => text,
            Err(DeviceError::ClippingsNotFound(path)) => {
                output::warning(&format!("no clippings file at {}", path.display()));
                return Ok(());
            }
            Err(e) => return Err(anyhow!(e).context("failed to extract clippings")),
        };

        let committer = Committer::new(&self.repo_path);
        let serial = self.serial.clone();
        let outcome = tokio::task::spawn_blocking(move || committer.commit(&serial, &text))
            .await
            .context("commit task panicked")??;

        if outcome.committed {
            output::success("Added new clippings to repository");
            if let Some(id) = &outcome.commit_id {
                output::detail("Commit", id);
            }
        } else {
            output::info("No new clippings to add");
        }

        Ok(())
    }
}
