//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod linked_devices;
#[allow(clippy::missing_errors_doc)]
pub mod services;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, put};

use servicehub_app::ports::{
    Authorizer, DeviceRepository, DeviceTemplateRepository, PropertyPublisher,
    ServiceRepository, TokenManager,
};
use servicehub_domain::id::ServiceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<SR, PP, DR, TR, TK, AZ>() -> Router<AppState<SR, PP, DR, TR, TK, AZ>>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    Router::new()
        // Services
        .route(
            "/services",
            get(services::list::<SR, PP, DR, TR, TK, AZ>)
                .post(services::create::<SR, PP, DR, TR, TK, AZ>),
        )
        .route(
            "/services/{id}",
            get(services::get::<SR, PP, DR, TR, TK, AZ>)
                .patch(services::update::<SR, PP, DR, TR, TK, AZ>)
                .delete(services::delete::<SR, PP, DR, TR, TK, AZ>),
        )
        .route(
            "/services/{id}/status",
            put(services::update_status::<SR, PP, DR, TR, TK, AZ>),
        )
        .route(
            "/me/services",
            get(services::list_mine::<SR, PP, DR, TR, TK, AZ>),
        )
        // Linked devices
        .route(
            "/services/{id}/things",
            get(linked_devices::things::<SR, PP, DR, TR, TK, AZ>),
        )
        .route(
            "/services/{id}/devices",
            get(linked_devices::devices::<SR, PP, DR, TR, TK, AZ>),
        )
}

/// Parse the `{id}` path segment of a service route.
fn parse_service_id(raw: &str) -> Result<ServiceId, ApiError> {
    ServiceId::from_str(raw).map_err(|_| ApiError::invalid_id(raw))
}
