//! Property publisher port: notifies subscribers of service property updates.

use std::future::Future;

use serde_json::Value;
use servicehub_domain::error::ServiceHubError;
use servicehub_domain::event::PublishAck;
use servicehub_domain::service::Service;

/// Publishes property-update events for a service.
pub trait PropertyPublisher {
    /// Announce that `service` now exposes `properties`.
    fn publish_update_properties(
        &self,
        service: &Service,
        properties: &[Value],
    ) -> impl Future<Output = Result<PublishAck, ServiceHubError>> + Send;
}

impl<T: PropertyPublisher + Send + Sync> PropertyPublisher for std::sync::Arc<T> {
    fn publish_update_properties(
        &self,
        service: &Service,
        properties: &[Value],
    ) -> impl Future<Output = Result<PublishAck, ServiceHubError>> + Send {
        (**self).publish_update_properties(service, properties)
    }
}
