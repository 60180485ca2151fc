//! Read models returned when listing the devices linked to a service.
//!
//! These are the wire shapes; they are built from a populated
//! [`Device`](crate::device::Device) rather than by masking fields at query
//! time.

use serde::Serialize;
use serde_json::Value;

use crate::device::{Device, PubSub};
use crate::id::DeviceId;

/// Placeholder shown when a device has no (resolvable) location.
pub const UNKNOWN_LOCATION: &str = "-";

/// Owner contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OwnerContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Summary of a device linked to a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThingSummary {
    pub id: DeviceId,
    pub name: String,
    pub owner: OwnerContact,
    pub pubsub: PubSub,
    pub config: Vec<Value>,
}

/// Detailed view of a device linked to a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub name: String,
    pub owner: OwnerContact,
    pub location: LocationName,
    pub pubsub: PubSub,
    pub config: Vec<Value>,
    pub status: StatusMessage,
}

impl ThingSummary {
    /// Project `device`, exposing its link config only when `reveal_config`.
    #[must_use]
    pub fn project(device: Device, reveal_config: bool) -> Self {
        let owner = contact(&device);
        let config = config(&device, reveal_config);
        Self {
            id: device.id,
            name: device.name,
            owner,
            pubsub: device.pubsub,
            config,
        }
    }
}

impl DeviceInfo {
    /// Project `device`, exposing its link config only when `reveal_config`.
    ///
    /// Location and link status are never redacted.
    #[must_use]
    pub fn project(device: Device, reveal_config: bool) -> Self {
        let owner = contact(&device);
        let config = config(&device, reveal_config);
        let location = LocationName {
            name: device
                .location
                .as_ref()
                .map_or_else(|| UNKNOWN_LOCATION.to_string(), |loc| loc.name.clone()),
        };
        let status = StatusMessage {
            message: device
                .matched_link()
                .map(|link| link.status.message.clone())
                .unwrap_or_default(),
        };
        Self {
            id: device.id,
            name: device.name,
            owner,
            location,
            pubsub: device.pubsub,
            config,
            status,
        }
    }
}

fn contact(device: &Device) -> OwnerContact {
    device
        .owner
        .as_ref()
        .map(|owner| OwnerContact {
            name: owner.name.clone(),
            email: owner.email.clone(),
        })
        .unwrap_or_default()
}

fn config(device: &Device, reveal: bool) -> Vec<Value> {
    if !reveal {
        return Vec::new();
    }
    device
        .matched_link()
        .map(|link| link.config.clone())
        .unwrap_or_default()
}
