//! Token manager port: credentials issued to devices and services.

use std::future::Future;

use servicehub_domain::error::ServiceHubError;
use servicehub_domain::id::ThingId;

/// Manages the access tokens issued per thing.
pub trait TokenManager {
    /// Revoke the token issued to `thing_id`. Succeeds when none exists.
    fn delete_token_by_thing_id(
        &self,
        thing_id: ThingId,
    ) -> impl Future<Output = Result<(), ServiceHubError>> + Send;
}
