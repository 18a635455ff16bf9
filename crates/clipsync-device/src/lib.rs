// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! # Clipsync Device Layer
//!
//! This crate turns the high-volume, order-unconstrained event feed of the
//! host's device-management subsystem into a low-volume stream of confirmed
//! e-reader mounts, and reads the clippings file from a confirmed mount.
//!
//! ## Architecture
//!
//! - **Identity matching** ([`identity`]): pure functions that classify a raw
//!   event as a filesystem-mount job and match a drive's identifying string
//!   against the e-reader pattern, extracting its serial number
//! - **Property decoding** ([`props`]): helpers for the opaque metadata
//!   shapes the bus client delivers, including null-terminated byte buffers
//! - **Mount pipeline** ([`pipeline`]): the five-stage filter/transform chain
//!   that emits one [`DeviceIdentity`] per qualifying physical mount
//! - **UDisks2 transport** ([`udisks`]): the concrete event source and
//!   property resolver bound to the system D-Bus
//! - **Clippings extraction** ([`clippings`]): reads
//!   `documents/My Clippings.txt` under a confirmed mount point
//!
//! The pipeline itself performs no bus I/O; it consumes [`MountEvent`]s from
//! a channel and resolves properties through the [`PropertyResolver`] seam,
//! so alternative transports (or test fakes) plug in without touching the
//! filtering logic.

pub mod clippings;
pub mod error;
pub mod event;
pub mod identity;
pub mod pipeline;
pub mod props;
pub mod resolver;
pub mod udisks;

pub use error::{DeviceError, DeviceResult};
pub use event::{DeviceIdentity, MountEvent, MountEventKind};
pub use pipeline::{MountPipeline, PipelineConfig};
pub use resolver::{PropertyResolver, ResolvedDevice};
pub use udisks::{UDisks2Resolver, UDisks2Source};
