//! Per-mount sync handling.
//!
//! One confirmed mount flows extract → commit → notify. Failures stay
//! inside this component: an absent clippings file is an expected outcome,
//! read and commit faults are logged, and nothing here can take down the
//! watch loop or another in-flight device.

use crate::config::SyncConfig;
use clipsync_device::{clippings, DeviceError, DeviceIdentity};
use clipsync_git::{CommitOutcome, Committer};
use clipsync_observability::Notifier;
use tracing::{info, warn};

/// Notification title and application name
const APP_NAME: &str = "clipsync";

/// Extracts and commits clippings for each confirmed mount.
pub struct SyncService {
    committer: Committer,
    notifier: Notifier,
}

impl SyncService {
    /// Build the service from resolved configuration
    pub fn new(config: &SyncConfig) -> Self {
        SyncService {
            committer: Committer::new(&config.repo_path),
            notifier: Notifier::new(APP_NAME).with_icon(config.icon.clone()),
        }
    }

    /// Handle one confirmed mount to its terminal state.
    ///
    /// A desktop notification is shown exactly once per completed
    /// extraction, distinguishing new clippings from duplicate content;
    /// extraction failures only log.
    pub async fn handle_mount(&self, identity: &DeviceIdentity) {
        info!("device mounted: {}", identity);

        let text = match clippings::extract(&identity.mount_point).await {
            Ok(text) => text,
            Err(DeviceError::ClippingsNotFound(path)) => {
                info!("no clippings yet at {}", path.display());
                return;
            }
            Err(e) => {
                warn!("failed to extract clippings for {}: {}", identity.serial, e);
                return;
            }
        };

        let outcome = self.commit(identity.serial.clone(), text).await;
        match &outcome.commit_id {
            Some(id) => info!("new commit: {}", id),
            None => info!("no new clippings for {}", identity.serial),
        }

        let message = if outcome.committed {
            "Added new clippings to repository"
        } else {
            "No new clippings to add"
        };
        self.notifier.notify(APP_NAME, message);
    }

    /// Run the blocking commit protocol off the event loop.
    async fn commit(&self, serial: String, text: String) -> CommitOutcome {
        let committer = self.committer.clone();
        match tokio::task::spawn_blocking(move || committer.try_commit(&serial, &text)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("commit task failed for the current attempt: {}", e);
                CommitOutcome::unchanged()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(repo_path: PathBuf) -> SyncConfig {
        SyncConfig {
            repo_path,
            icon: None,
            retry_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_missing_clippings_attempts_no_commit() {
        let repo_dir = TempDir::new().unwrap();
        git2::Repository::init(repo_dir.path()).unwrap();
        let mount = TempDir::new().unwrap();

        let service = SyncService::new(&test_config(repo_dir.path().to_path_buf()));
        let identity = DeviceIdentity {
            serial: "B012ABCD1234".to_string(),
            drive_label: "Kindle_Internal_Storage_B012ABCD1234".to_string(),
            mount_point: mount.path().to_path_buf(),
        };
        service.handle_mount(&identity).await;

        // extraction failed before any repository mutation
        let repo = git2::Repository::open(repo_dir.path()).unwrap();
        assert!(repo.head().is_err());
        assert!(!repo_dir.path().join("B012ABCD1234").exists());
    }
}
