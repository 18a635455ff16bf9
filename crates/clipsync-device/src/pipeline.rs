// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! The mount event pipeline.
//!
//! Converts the raw event feed into a stream of confirmed e-reader mounts,
//! each appearing at most once per physical device-attach cycle:
//!
//! 1. Discard anything that is not the start of a filesystem-mount job
//! 2. Resolve the job target's block/filesystem properties, tolerating one
//!    race with job completion (single retry after a fixed delay, then the
//!    event is dropped)
//! 3. Decode the drive identifying string and the assigned mount point from
//!    the resolved properties (buffer decode failures drop the event)
//! 4. Drop drives that are not the target e-reader class; the subsystem
//!    observes mounts for all removable media
//! 5. Extract the serial and emit the [`DeviceIdentity`]
//!
//! Each qualifying event resolves on its own task, so one device's slow or
//! failing resolution never stalls another's. A single event's failure is
//! logged and never terminates the pipeline.

use crate::error::{DeviceError, DeviceResult};
use crate::event::{DeviceIdentity, MountEvent, MountEventKind};
use crate::identity;
use crate::props;
use crate::resolver::{PropertyResolver, ResolvedDevice};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Tunables for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Delay before the single property-resolution retry
    pub retry_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Terminal state of one event's trip through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Emitted(DeviceIdentity),
    Dropped(&'static str),
}

/// The composed filter/transform chain from raw events to confirmed mounts.
pub struct MountPipeline<R> {
    resolver: Arc<R>,
    config: PipelineConfig,
}

impl<R: PropertyResolver> MountPipeline<R> {
    /// Create a pipeline over the given resolver with default tuning
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, PipelineConfig::default())
    }

    /// Create a pipeline with explicit tuning
    pub fn with_config(resolver: R, config: PipelineConfig) -> Self {
        MountPipeline {
            resolver: Arc::new(resolver),
            config,
        }
    }

    /// Consume raw events until the channel closes, emitting one
    /// [`DeviceIdentity`] per qualifying mount.
    ///
    /// Resolution runs on a task per in-flight event; emission order across
    /// concurrently mounting devices is unspecified.
    pub async fn run(self, mut events: mpsc::Receiver<MountEvent>, identities: mpsc::Sender<DeviceIdentity>) {
        while let Some(event) = events.recv().await {
            if event.kind != MountEventKind::JobAdded
                || !event.object_path.starts_with(identity::JOB_PATH_PREFIX)
            {
                continue;
            }
            match identity::job_operation(&event.payload) {
                Ok(identity::MOUNT_OPERATION) => {}
                Ok(_) => continue,
                Err(e) => {
                    debug!("dropped {}: {}", event.object_path, e);
                    continue;
                }
            }

            debug!("mount job started: {}", event.object_path);
            let resolver = Arc::clone(&self.resolver);
            let config = self.config.clone();
            let identities = identities.clone();
            tokio::spawn(async move {
                match correlate(resolver.as_ref(), &config, &event).await {
                    Ok(Outcome::Emitted(identity)) => {
                        info!("confirmed mount: {}", identity);
                        if identities.send(identity).await.is_err() {
                            warn!("identity receiver closed, mount discarded");
                        }
                    }
                    Ok(Outcome::Dropped(reason)) => {
                        debug!("dropped {}: {}", event.object_path, reason);
                    }
                    Err(e) => {
                        warn!("failed to resolve {}: {}", event.object_path, e);
                    }
                }
            });
        }
    }
}

/// Stages 2-5 for one in-flight correlation.
async fn correlate<R: PropertyResolver>(
    resolver: &R,
    config: &PipelineConfig,
    event: &MountEvent,
) -> DeviceResult<Outcome> {
    let objects = match identity::job_objects(&event.payload) {
        Ok(objects) => objects,
        Err(e @ DeviceError::InvalidMetadata(_)) => {
            debug!("{}: {}", event.object_path, e);
            return Ok(Outcome::Dropped("malformed job metadata"));
        }
        Err(e) => return Err(e),
    };

    let Some(object_path) = objects.first() else {
        return Ok(Outcome::Dropped("job has no target objects"));
    };

    let Some(resolved) = resolve_with_retry(resolver, config, object_path).await? else {
        return Ok(Outcome::Dropped("properties never populated"));
    };

    let Some(mount_point) = resolved.mount_points.first() else {
        return Ok(Outcome::Dropped("no mount point assigned"));
    };

    let mount_point = match props::decode_path(mount_point) {
        Ok(path) => path,
        Err(e @ DeviceError::InvalidBuffer(_)) => {
            debug!("{}: {}", object_path, e);
            return Ok(Outcome::Dropped("undecodable mount point"));
        }
        Err(e) => return Err(e),
    };

    if !identity::is_target_drive(&resolved.drive_id) {
        return Ok(Outcome::Dropped("not a target drive"));
    }

    let serial = identity::extract_serial(&resolved.drive_id)?;
    Ok(Outcome::Emitted(DeviceIdentity {
        serial,
        drive_label: resolved.drive_id,
        mount_point,
    }))
}

/// Stage 2: lookup with a single bounded retry, never unbounded polling.
async fn resolve_with_retry<R: PropertyResolver>(
    resolver: &R,
    config: &PipelineConfig,
    object_path: &str,
) -> DeviceResult<Option<ResolvedDevice>> {
    if let Some(resolved) = resolver.resolve(object_path).await? {
        return Ok(Some(resolved));
    }

    debug!("{}: properties not yet populated, retrying once", object_path);
    tokio::time::sleep(config.retry_delay).await;
    resolver.resolve(object_path).await
}
