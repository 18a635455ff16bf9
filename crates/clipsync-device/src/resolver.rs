//! Property resolution seam between the pipeline and its transport.

use crate::error::DeviceResult;
use async_trait::async_trait;
use serde_json::Value;

/// Block/filesystem properties resolved for a job's target object.
#[derive(Debug, Clone)]
pub struct ResolvedDevice {
    /// The drive's identifying string (vendor metadata)
    pub drive_id: String,

    /// Assigned mount points, buffer-encoded (see [`crate::props`])
    pub mount_points: Vec<Value>,
}

/// Asynchronous lookup of a job target's block-device and filesystem
/// properties against the owning subsystem.
///
/// `resolve` returns `Ok(None)` while the properties are not yet populated:
/// the lookup races with the job's own completion, and the pipeline retries
/// once before treating continued absence as a dropped event. Transport
/// failures surface as errors.
#[async_trait]
pub trait PropertyResolver: Send + Sync + 'static {
    /// Fetch drive identity and mount points for one object path
    async fn resolve(&self, object_path: &str) -> DeviceResult<Option<ResolvedDevice>>;
}
