//! Device: a physical thing that links to services, as read with its
//! references populated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::{DeviceId, LocationId, ServiceId, UserId};
use crate::user::Owner;

/// Messaging endpoint a device listens on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubSub {
    pub protocol: String,
    pub endpoint: String,
}

/// Where a device is installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

/// Status reported for one device/service link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub message: String,
}

/// One entry of a device's (or template's) `linked_services`.
///
/// Each link carries its own configuration and status, independent of the
/// device's other links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedService {
    pub service_id: ServiceId,
    pub config: Vec<Value>,
    pub status: LinkStatus,
}

/// A device with `owner` and `location` populated.
///
/// When read through a service filter, `linked_services` holds only the first
/// entry matching that service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub owner: Option<Owner>,
    pub pubsub: PubSub,
    pub location: Option<Location>,
    pub linked_services: Vec<LinkedService>,
}

impl Device {
    /// The link selected by a service-filtered query.
    #[must_use]
    pub fn matched_link(&self) -> Option<&LinkedService> {
        self.linked_services.first()
    }

    /// Whether `user` owns this device. A dangling owner reference owns nothing.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner.as_ref().is_some_and(|owner| owner.id == user)
    }
}
