//! Event and identity types flowing through the mount pipeline.

use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Kind of raw event produced by the watched subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountEventKind {
    /// A job object appeared (UDisks2 job namespace)
    JobAdded,

    /// A non-job object gained interfaces (block devices, drives, ...)
    InterfacesAdded,

    /// A directory appeared under a watched filesystem root
    ///
    /// Only produced by polling transports; the primary UDisks2 transport
    /// never emits this kind.
    DirAdded,
}

/// A raw attach/job-state event, consumed once by the pipeline.
///
/// The payload is opaque metadata in the transport's wire shape: a map of
/// interface names to property maps, with byte-valued properties encoded as
/// `{"type":"Buffer","data":[...]}` objects (see [`crate::props`]).
#[derive(Debug, Clone)]
pub struct MountEvent {
    /// Bus object path (or device path for polling transports)
    pub object_path: String,

    /// Event kind
    pub kind: MountEventKind,

    /// Opaque transport metadata
    pub payload: Value,
}

impl MountEvent {
    /// Create an event with the given path, kind and payload
    pub fn new(object_path: impl Into<String>, kind: MountEventKind, payload: Value) -> Self {
        MountEvent {
            object_path: object_path.into(),
            kind,
            payload,
        }
    }
}

/// A confirmed e-reader mount, emitted at most once per physical attach.
///
/// Immutable once constructed; uniquely keys one commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Serial number captured from the drive identifying string
    pub serial: String,

    /// Full drive identifying string the serial was extracted from
    pub drive_label: String,

    /// Absolute path the device's filesystem is mounted at
    pub mount_point: PathBuf,
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.serial, self.mount_point.display())
    }
}
