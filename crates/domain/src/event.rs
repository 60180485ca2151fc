//! Events published when a service changes in a way devices must react to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::ServiceId;
use crate::time::{Timestamp, now};

/// A service's `properties` were replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesUpdated {
    pub service_id: ServiceId,
    pub properties: Vec<Value>,
    pub published_at: Timestamp,
}

impl PropertiesUpdated {
    #[must_use]
    pub fn new(service_id: ServiceId, properties: Vec<Value>) -> Self {
        Self {
            service_id,
            properties,
            published_at: now(),
        }
    }

    /// Topic the event is published on.
    #[must_use]
    pub fn topic(&self) -> String {
        format!("services/{}/properties", self.service_id)
    }
}

/// Outcome of publishing a [`PropertiesUpdated`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAck {
    pub service_id: ServiceId,
    pub topic: String,
    /// Number of subscribers the event was delivered to.
    pub receivers: usize,
    pub published_at: Timestamp,
}
