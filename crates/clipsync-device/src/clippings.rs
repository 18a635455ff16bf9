//! Clippings extraction.
//!
//! The e-reader keeps its highlights in a single well-known text file.
//! Absence of that file is an expected outcome (a fresh device has no
//! clippings yet), reported distinctly from genuine read faults.

use crate::error::{DeviceError, DeviceResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Relative location of the clippings file under a mount point
pub const CLIPPINGS_RELATIVE_PATH: &str = "documents/My Clippings.txt";

/// Full path of the clippings file for a mount point
pub fn clippings_path(mount_point: &Path) -> PathBuf {
    mount_point.join("documents").join("My Clippings.txt")
}

/// Read the clippings file under `mount_point` as UTF-8 text.
///
/// Fails with [`DeviceError::ClippingsNotFound`] when the file is absent or
/// unreadable, and with [`DeviceError::ClippingsRead`] on any other I/O
/// fault, including invalid UTF-8. No size limit is enforced here.
pub async fn extract(mount_point: &Path) -> DeviceResult<String> {
    let path = clippings_path(mount_point);

    // readability check before the read, so an absent file classifies as
    // the expected outcome rather than a read fault
    match tokio::fs::metadata(&path).await {
        Ok(_) => {}
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            return Err(DeviceError::ClippingsNotFound(path));
        }
        Err(e) => return Err(DeviceError::ClippingsRead { path, source: e }),
    }

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            return Err(DeviceError::ClippingsNotFound(path));
        }
        Err(e) => return Err(DeviceError::ClippingsRead { path, source: e }),
    };

    debug!("read {} bytes from {}", bytes.len(), path.display());
    String::from_utf8(bytes).map_err(|e| DeviceError::ClippingsRead {
        path,
        source: std::io::Error::new(ErrorKind::InvalidData, e),
    })
}
