//! Integration tests for the mount event pipeline
//!
//! Drives the pipeline through its channels with a scripted resolver,
//! covering emission, silent drops, the bounded resolution retry, and
//! independence of concurrent correlations.

use async_trait::async_trait;
use clipsync_device::{
    props, DeviceIdentity, DeviceResult, MountEvent, MountEventKind, MountPipeline, PipelineConfig,
    PropertyResolver, ResolvedDevice,
};
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Resolver scripted per object path; unknown paths resolve to "not yet
/// populated" on every call.
struct ScriptedResolver {
    devices: HashMap<String, ResolvedDevice>,
    delay: Duration,
}

impl ScriptedResolver {
    fn new() -> Self {
        ScriptedResolver {
            devices: HashMap::new(),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn device(mut self, object_path: &str, device: ResolvedDevice) -> Self {
        self.devices.insert(object_path.to_string(), device);
        self
    }
}

#[async_trait]
impl PropertyResolver for ScriptedResolver {
    async fn resolve(&self, object_path: &str) -> DeviceResult<Option<ResolvedDevice>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.devices.get(object_path).cloned())
    }
}

fn kindle(mount: &str) -> ResolvedDevice {
    ResolvedDevice {
        drive_id: "Kindle_Internal_Storage_B012ABCD1234".to_string(),
        mount_points: vec![props::encode_buffer(mount.as_bytes())],
    }
}

fn mount_job(job: &str, block: &str) -> MountEvent {
    MountEvent::new(
        format!("/org/freedesktop/UDisks2/jobs/{job}"),
        MountEventKind::JobAdded,
        json!({
            "org.freedesktop.UDisks2.Job": {
                "Operation": "filesystem-mount",
                "Objects": [format!("/org/freedesktop/UDisks2/block_devices/{block}")],
            }
        }),
    )
}

fn unrelated_event() -> MountEvent {
    MountEvent::new(
        "/org/freedesktop/UDisks2/drives/Generic",
        MountEventKind::InterfacesAdded,
        json!({ "org.freedesktop.UDisks2.Drive": { "Id": "Generic_USB_Drive_1" } }),
    )
}

async fn run_pipeline(
    resolver: ScriptedResolver,
    events: Vec<MountEvent>,
) -> mpsc::Receiver<DeviceIdentity> {
    let (event_tx, event_rx) = mpsc::channel(16);
    let (identity_tx, identity_rx) = mpsc::channel(16);

    let pipeline = MountPipeline::with_config(
        resolver,
        PipelineConfig {
            retry_delay: Duration::from_millis(5),
        },
    );
    tokio::spawn(pipeline.run(event_rx, identity_tx));

    for event in events {
        event_tx.send(event).await.expect("pipeline receiver alive");
    }
    drop(event_tx);

    identity_rx
}

#[tokio::test]
async fn test_emits_one_identity_per_qualifying_mount() {
    let resolver = ScriptedResolver::new().device(
        "/org/freedesktop/UDisks2/block_devices/sdb1",
        kindle("/media/kindle"),
    );

    let mut identities = run_pipeline(resolver, vec![unrelated_event(), mount_job("1", "sdb1")]).await;

    let identity = timeout(Duration::from_secs(1), identities.recv())
        .await
        .expect("identity within deadline")
        .expect("one identity emitted");
    assert_eq!(identity.serial, "B012ABCD1234");
    assert_eq!(identity.mount_point, PathBuf::from("/media/kindle"));

    // channel closes without a second emission
    assert!(timeout(Duration::from_secs(1), identities.recv()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_non_target_media_dropped_silently() {
    let resolver = ScriptedResolver::new().device(
        "/org/freedesktop/UDisks2/block_devices/sdc1",
        ResolvedDevice {
            drive_id: "Generic_USB_Drive_1".to_string(),
            mount_points: vec![props::encode_buffer(b"/media/usb")],
        },
    );

    let mut identities = run_pipeline(resolver, vec![mount_job("2", "sdc1")]).await;
    assert!(timeout(Duration::from_secs(1), identities.recv()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unresolved_properties_dropped_after_retry() {
    let resolver = ScriptedResolver::new(); // resolves to None forever

    let mut identities = run_pipeline(resolver, vec![mount_job("3", "sdd1")]).await;
    assert!(timeout(Duration::from_secs(1), identities.recv()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_slow_device_does_not_block_another() {
    // sdb1 resolves (slowly, via the scripted delay); sde1 never resolves.
    // Both are in flight concurrently and the resolvable one still emits.
    let resolver = ScriptedResolver::new()
        .with_delay(Duration::from_millis(20))
        .device(
            "/org/freedesktop/UDisks2/block_devices/sdb1",
            kindle("/media/kindle"),
        );

    let mut identities =
        run_pipeline(resolver, vec![mount_job("4", "sde1"), mount_job("5", "sdb1")]).await;

    let identity = timeout(Duration::from_secs(2), identities.recv())
        .await
        .expect("identity within deadline")
        .expect("resolvable device emitted");
    assert_eq!(identity.serial, "B012ABCD1234");
    assert!(timeout(Duration::from_secs(1), identities.recv()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_distinct_devices_both_emit() {
    let second = ResolvedDevice {
        drive_id: "Kindle_Internal_Storage_C098WXYZ7654".to_string(),
        mount_points: vec![props::encode_buffer(b"/media/kindle2")],
    };
    let resolver = ScriptedResolver::new()
        .device(
            "/org/freedesktop/UDisks2/block_devices/sdb1",
            kindle("/media/kindle"),
        )
        .device("/org/freedesktop/UDisks2/block_devices/sdf1", second);

    let mut identities =
        run_pipeline(resolver, vec![mount_job("6", "sdb1"), mount_job("7", "sdf1")]).await;

    let mut serials = Vec::new();
    while let Ok(Some(identity)) = timeout(Duration::from_secs(1), identities.recv()).await {
        serials.push(identity.serial);
    }
    serials.sort();
    assert_eq!(serials, vec!["B012ABCD1234", "C098WXYZ7654"]);
}
