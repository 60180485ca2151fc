//! In-process property bus backed by a tokio broadcast channel.

use std::future::Future;

use serde_json::Value;
use tokio::sync::broadcast;

use servicehub_domain::error::ServiceHubError;
use servicehub_domain::event::{PropertiesUpdated, PublishAck};
use servicehub_domain::service::Service;

use crate::ports::PropertyPublisher;

/// In-process pub/sub for [`PropertiesUpdated`] events using a tokio
/// [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped and the ack reports zero receivers).
pub struct InProcessPropertyBus {
    sender: broadcast::Sender<PropertiesUpdated>,
}

impl InProcessPropertyBus {
    /// Create a new bus with the given channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to property updates.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PropertiesUpdated> {
        self.sender.subscribe()
    }
}

impl PropertyPublisher for InProcessPropertyBus {
    fn publish_update_properties(
        &self,
        service: &Service,
        properties: &[Value],
    ) -> impl Future<Output = Result<PublishAck, ServiceHubError>> + Send {
        let event = PropertiesUpdated::new(service.id, properties.to_vec());
        let ack = PublishAck {
            service_id: event.service_id,
            topic: event.topic(),
            receivers: 0,
            published_at: event.published_at,
        };
        // send fails only when there are zero receivers
        let receivers = self.sender.send(event).unwrap_or(0);
        tracing::debug!(topic = %ack.topic, receivers, "published property update");
        async move { Ok(PublishAck { receivers, ..ack }) }
    }
}
