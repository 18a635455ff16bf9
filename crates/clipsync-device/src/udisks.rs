// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! UDisks2 transport binding.
//!
//! The primary, job-event-based transport: subscribes to `InterfacesAdded`
//! notifications from the UDisks2 object manager on the system bus and
//! resolves block/drive/filesystem properties for job targets. Bus property
//! values are translated into the opaque JSON metadata shape the matcher
//! and pipeline consume, byte arrays as `{"type":"Buffer","data":[...]}`.

use crate::error::{DeviceError, DeviceResult};
use crate::event::{MountEvent, MountEventKind};
use crate::identity::JOB_PATH_PREFIX;
use crate::resolver::{PropertyResolver, ResolvedDevice};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};
use zbus::fdo::{self, ObjectManagerProxy};
use zbus::zvariant::{OwnedObjectPath, Value as ZValue};
use zbus::{Connection, Proxy};

/// Bus name of the UDisks2 daemon
pub const UDISKS_SERVICE: &str = "org.freedesktop.UDisks2";

/// Object manager path of the UDisks2 daemon
pub const UDISKS_PATH: &str = "/org/freedesktop/UDisks2";

const BLOCK_INTERFACE: &str = "org.freedesktop.UDisks2.Block";
const FILESYSTEM_INTERFACE: &str = "org.freedesktop.UDisks2.Filesystem";
const DRIVE_INTERFACE: &str = "org.freedesktop.UDisks2.Drive";

/// Event source subscribed to UDisks2 attach/job notifications.
pub struct UDisks2Source {
    conn: Connection,
}

impl UDisks2Source {
    /// Connect to the system bus
    pub async fn connect() -> DeviceResult<Self> {
        let conn = Connection::system().await?;
        Ok(UDisks2Source { conn })
    }

    /// The underlying bus connection, shared with resolvers
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Forward raw events into the pipeline's channel until the bus stream
    /// ends or the receiver closes.
    pub async fn run(&self, events: mpsc::Sender<MountEvent>) -> DeviceResult<()> {
        let object_manager = ObjectManagerProxy::builder(&self.conn)
            .destination(UDISKS_SERVICE)?
            .path(UDISKS_PATH)?
            .build()
            .await?;

        let mut added = object_manager.receive_interfaces_added().await?;
        info!("subscribed to UDisks2 interface notifications");

        while let Some(signal) = added.next().await {
            let args = match signal.args() {
                Ok(args) => args,
                Err(e) => {
                    debug!("undecodable InterfacesAdded signal: {}", e);
                    continue;
                }
            };

            let object_path = args.object_path().to_string();
            let kind = if object_path.starts_with(JOB_PATH_PREFIX) {
                MountEventKind::JobAdded
            } else {
                MountEventKind::InterfacesAdded
            };
            let payload = interfaces_to_json(args.interfaces_and_properties());

            if events.send(MountEvent::new(object_path, kind, payload)).await.is_err() {
                break;
            }
        }

        Ok(())
    }
}

/// Property resolver backed by the UDisks2 daemon.
pub struct UDisks2Resolver {
    conn: Connection,
}

impl UDisks2Resolver {
    /// Resolve against the given bus connection
    pub fn new(conn: Connection) -> Self {
        UDisks2Resolver { conn }
    }
}

#[async_trait]
impl PropertyResolver for UDisks2Resolver {
    async fn resolve(&self, object_path: &str) -> DeviceResult<Option<ResolvedDevice>> {
        let block = Proxy::new(&self.conn, UDISKS_SERVICE, object_path, BLOCK_INTERFACE).await?;
        let Some(drive_path) = absent_on_fdo(block.get_property::<OwnedObjectPath>("Drive").await)? else {
            return Ok(None);
        };
        // UDisks2 publishes "/" while the block has no drive association yet
        if drive_path.as_str() == "/" {
            return Ok(None);
        }

        let filesystem = Proxy::new(&self.conn, UDISKS_SERVICE, object_path, FILESYSTEM_INTERFACE).await?;
        let Some(mount_points) =
            absent_on_fdo(filesystem.get_property::<Vec<Vec<u8>>>("MountPoints").await)?
        else {
            return Ok(None);
        };
        if mount_points.is_empty() {
            return Ok(None);
        }

        let drive = Proxy::new(&self.conn, UDISKS_SERVICE, drive_path.as_str(), DRIVE_INTERFACE).await?;
        let Some(drive_id) = absent_on_fdo(drive.get_property::<String>("Id").await)? else {
            return Ok(None);
        };

        Ok(Some(ResolvedDevice {
            drive_id,
            mount_points: mount_points.iter().map(|bytes| raw_buffer(bytes)).collect(),
        }))
    }
}

/// Map "object/interface/property does not exist (yet)" onto `None`, keeping
/// genuine bus failures as errors.
fn absent_on_fdo<T>(result: zbus::Result<T>) -> DeviceResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(zbus::Error::FDO(e)) => match *e {
            fdo::Error::UnknownObject(_)
            | fdo::Error::UnknownInterface(_)
            | fdo::Error::UnknownProperty(_)
            | fdo::Error::InvalidArgs(_) => Ok(None),
            e => Err(DeviceError::Bus(zbus::Error::FDO(Box::new(e)))),
        },
        Err(e) => Err(DeviceError::Bus(e)),
    }
}

/// Buffer wire shape for bytes that already carry their terminator
fn raw_buffer(bytes: &[u8]) -> Value {
    serde_json::json!({
        "type": "Buffer",
        "data": bytes.iter().map(|b| Value::from(*b)).collect::<Vec<Value>>(),
    })
}

fn interfaces_to_json(map: &HashMap<&str, HashMap<&str, ZValue<'_>>>) -> Value {
    let mut interfaces = serde_json::Map::new();
    for (interface, properties) in map {
        let mut object = serde_json::Map::new();
        for (name, value) in properties {
            object.insert((*name).to_string(), value_to_json(value));
        }
        interfaces.insert(interface.to_string(), Value::Object(object));
    }
    Value::Object(interfaces)
}

/// Best-effort translation of bus property values into JSON metadata.
///
/// Covers the value shapes the pipeline inspects; anything exotic maps to
/// null and classifies as malformed metadata downstream.
fn value_to_json(value: &ZValue<'_>) -> Value {
    match value {
        ZValue::U8(v) => Value::from(*v),
        ZValue::Bool(v) => Value::from(*v),
        ZValue::I16(v) => Value::from(*v),
        ZValue::U16(v) => Value::from(*v),
        ZValue::I32(v) => Value::from(*v),
        ZValue::U32(v) => Value::from(*v),
        ZValue::I64(v) => Value::from(*v),
        ZValue::U64(v) => Value::from(*v),
        ZValue::F64(v) => Value::from(*v),
        ZValue::Str(s) => Value::from(s.as_str()),
        ZValue::ObjectPath(p) => Value::from(p.as_str()),
        ZValue::Value(inner) => value_to_json(inner),
        ZValue::Array(array) => {
            let items: Vec<Value> = array.iter().map(value_to_json).collect();
            // byte arrays keep the buffer wire shape
            if array.element_signature().as_str() == "y" {
                serde_json::json!({ "type": "Buffer", "data": items })
            } else {
                Value::Array(items)
            }
        }
        _ => Value::Null,
    }
}
