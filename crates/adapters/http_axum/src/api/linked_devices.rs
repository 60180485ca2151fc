//! JSON REST handlers for the devices linked to a service.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use servicehub_app::ports::{
    Authorizer, DeviceRepository, DeviceTemplateRepository, PropertyPublisher,
    ServiceRepository, TokenManager,
};
use servicehub_domain::linked_device::{DeviceInfo, ThingSummary};

use super::parse_service_id;
use crate::caller::AuthenticatedCaller;
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the things endpoint.
pub enum ThingsResponse {
    Ok(Json<Vec<ThingSummary>>),
}

impl IntoResponse for ThingsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the devices endpoint.
pub enum DevicesResponse {
    Ok(Json<Vec<DeviceInfo>>),
}

impl IntoResponse for DevicesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/services/{id}/things`
pub async fn things<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> Result<ThingsResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let service_id = parse_service_id(&id)?;
    state.service_manager.get_service(service_id).await?;
    let things = state
        .linked_devices
        .get_things(service_id, &caller)
        .await?;
    Ok(ThingsResponse::Ok(Json(things)))
}

/// `GET /api/services/{id}/devices`
pub async fn devices<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> Result<DevicesResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let service_id = parse_service_id(&id)?;
    state.service_manager.get_service(service_id).await?;
    let devices = state
        .linked_devices
        .get_device_info(service_id, &caller)
        .await?;
    Ok(DevicesResponse::Ok(Json(devices)))
}
