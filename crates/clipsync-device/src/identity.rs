// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! Device identity matching.
//!
//! Pure classification functions with no I/O: deciding whether a raw event
//! is the start of a filesystem-mount job, whether a drive identifying
//! string belongs to the target e-reader class, and extracting the serial
//! number from it.
//!
//! The identifying string is matched case-sensitively against
//! `Kindle_Internal_Storage_<serial>` with the serial restricted to
//! uppercase letters and digits, anchored at both ends.

use crate::error::{DeviceError, DeviceResult};
use crate::event::{MountEvent, MountEventKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Object path namespace of UDisks2 job objects
pub const JOB_PATH_PREFIX: &str = "/org/freedesktop/UDisks2/jobs/";

/// Interface name carrying job properties
pub const JOB_INTERFACE: &str = "org.freedesktop.UDisks2.Job";

/// Job operation tag for "filesystem mount begun"
pub const MOUNT_OPERATION: &str = "filesystem-mount";

static DRIVE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Kindle_Internal_Storage_([A-Z0-9]+)$").expect("drive id pattern is valid")
});

/// Access the job interface's property map inside an event payload.
///
/// Fails with [`DeviceError::InvalidMetadata`] when the payload is not an
/// interface map or carries no job interface; distinct from a non-match.
pub fn job_properties(payload: &Value) -> DeviceResult<&Map<String, Value>> {
    payload
        .as_object()
        .and_then(|interfaces| interfaces.get(JOB_INTERFACE))
        .and_then(Value::as_object)
        .ok_or_else(|| DeviceError::InvalidMetadata("invalid job interface map".to_string()))
}

/// The job's operation tag, e.g. `filesystem-mount`
pub fn job_operation(payload: &Value) -> DeviceResult<&str> {
    job_properties(payload)?
        .get("Operation")
        .and_then(Value::as_str)
        .ok_or_else(|| DeviceError::InvalidMetadata("job has no Operation property".to_string()))
}

/// Object paths the job operates on (the block devices being mounted)
pub fn job_objects(payload: &Value) -> DeviceResult<Vec<String>> {
    let objects = job_properties(payload)?
        .get("Objects")
        .and_then(Value::as_array)
        .ok_or_else(|| DeviceError::InvalidMetadata("job has no Objects property".to_string()))?;

    objects
        .iter()
        .map(|o| {
            o.as_str()
                .map(str::to_string)
                .ok_or_else(|| DeviceError::InvalidMetadata("job object path is not a string".to_string()))
        })
        .collect()
}

/// True only for events announcing the start of a filesystem-mount job.
///
/// The event's object path must fall under the job namespace and its
/// `Operation` property must equal [`MOUNT_OPERATION`]. Malformed payloads
/// classify as non-matching here; callers that need the distinction use
/// [`job_operation`] directly.
pub fn is_target_job(event: &MountEvent) -> bool {
    event.kind == MountEventKind::JobAdded
        && event.object_path.starts_with(JOB_PATH_PREFIX)
        && matches!(job_operation(&event.payload), Ok(op) if op == MOUNT_OPERATION)
}

/// True only if the drive identifying string matches the e-reader pattern
pub fn is_target_drive(drive_id: &str) -> bool {
    DRIVE_ID.is_match(drive_id)
}

/// Extract the serial number from a matching drive identifying string.
///
/// Callers must have gated with [`is_target_drive`]; a non-matching string
/// fails with [`DeviceError::MalformedIdentity`].
pub fn extract_serial(drive_id: &str) -> DeviceResult<String> {
    DRIVE_ID
        .captures(drive_id)
        .and_then(|captures| captures.get(1))
        .map(|serial| serial.as_str().to_string())
        .ok_or_else(|| DeviceError::MalformedIdentity(drive_id.to_string()))
}
