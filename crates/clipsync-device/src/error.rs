// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! Error types for the device layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Error types for event classification, property resolution and extraction
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Subsystem metadata is missing fields or nested in an unexpected shape
    #[error("invalid device metadata: {0}")]
    InvalidMetadata(String),

    /// A drive identifying string does not match the e-reader pattern
    #[error("drive identity does not match e-reader pattern: {0}")]
    MalformedIdentity(String),

    /// A property payload is not a well-formed null-terminated buffer
    #[error("invalid property buffer: {0}")]
    InvalidBuffer(String),

    /// The clippings file is absent or unreadable at the mount point
    #[error("no clippings file at {0}")]
    ClippingsNotFound(PathBuf),

    /// Unexpected I/O failure while reading the clippings file
    #[error("failed to read clippings at {path}: {source}")]
    ClippingsRead {
        /// Full path of the clippings file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// System bus failure during subscription or property resolution
    #[error("bus error: {0}")]
    Bus(#[from] zbus::Error),
}
