//! JSON REST handlers for services.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;

use servicehub_app::ports::{
    Authorizer, DeviceRepository, DeviceTemplateRepository, PropertyPublisher,
    ServiceRepository, TokenManager,
};
use servicehub_app::services::service_manager::ServiceUpdate;
use servicehub_domain::event::PublishAck;
use servicehub_domain::id::UserId;
use servicehub_domain::service::{Service, ServiceDetails, ServicePatch};

use super::parse_service_id;
use crate::caller::AuthenticatedCaller;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a service.
///
/// An `owner` in the payload is accepted but always replaced by the caller.
#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config_required: Vec<Value>,
    #[serde(default)]
    pub device_permission: Value,
    #[serde(default)]
    pub properties: Vec<Value>,
    #[serde(default)]
    pub status: String,
    pub owner: Option<UserId>,
}

/// Request body for the status endpoint.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Query string of the owner listing.
#[derive(Deserialize)]
pub struct OwnerQuery {
    pub name: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ServiceDetails>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the owner listing endpoint.
pub enum ListMineResponse {
    Ok(Json<Vec<Service>>),
}

impl IntoResponse for ListMineResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<ServiceDetails>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<ServiceDetails>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    Saved(Json<Service>),
    Published(Json<PublishAck>),
}

impl From<ServiceUpdate> for UpdateResponse {
    fn from(update: ServiceUpdate) -> Self {
        match update {
            ServiceUpdate::Saved(service) => Self::Saved(Json(service)),
            ServiceUpdate::PropertiesPublished(ack) => Self::Published(Json(ack)),
        }
    }
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Saved(json) => json.into_response(),
            Self::Published(json) => json.into_response(),
        }
    }
}

/// Possible responses from the status endpoint.
///
/// Carries the service as it was before the update, `null` when unknown.
pub enum UpdateStatusResponse {
    Ok(Json<Option<Service>>),
}

impl IntoResponse for UpdateStatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/services`
pub async fn list<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
) -> Result<ListResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let services = state.service_manager.list_services().await?;
    Ok(ListResponse::Ok(Json(services)))
}

/// `POST /api/services`
pub async fn create<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(req): Json<CreateServiceRequest>,
) -> Result<CreateResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let mut builder = Service::builder()
        .name(req.name)
        .description(req.description)
        .config_required(req.config_required)
        .device_permission(req.device_permission)
        .properties(req.properties)
        .status(req.status);
    if let Some(owner) = req.owner {
        builder = builder.owner(owner);
    }

    let service = builder.build()?;
    let created = state
        .service_manager
        .create_service(caller.id, service)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /api/services/{id}`
pub async fn get<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let service_id = parse_service_id(&id)?;
    let service = state.service_manager.get_service(service_id).await?;
    Ok(GetResponse::Ok(Json(service)))
}

/// `PATCH /api/services/{id}`
pub async fn update<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
    Path(id): Path<String>,
    Json(patch): Json<ServicePatch>,
) -> Result<UpdateResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let service_id = parse_service_id(&id)?;
    let existing = state.service_manager.get_service(service_id).await?;
    let update = state
        .service_manager
        .update_service(existing.into_service(), patch)
        .await?;
    Ok(update.into())
}

/// `PUT /api/services/{id}/status`
pub async fn update_status<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<UpdateStatusResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let service_id = parse_service_id(&id)?;
    let previous = state
        .service_manager
        .update_status(service_id, req.status)
        .await?;
    Ok(UpdateStatusResponse::Ok(Json(previous)))
}

/// `DELETE /api/services/{id}`
pub async fn delete<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let service_id = parse_service_id(&id)?;
    let existing = state.service_manager.get_service(service_id).await?;
    state
        .service_manager
        .delete_service(&existing.into_service())
        .await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/me/services?name=`
pub async fn list_mine<SR, PP, DR, TR, TK, AZ>(
    State(state): State<AppState<SR, PP, DR, TR, TK, AZ>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Query(query): Query<OwnerQuery>,
) -> Result<ListMineResponse, ApiError>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    let services = state
        .service_manager
        .list_services_by_owner(caller.id, query.name.as_deref())
        .await?;
    Ok(ListMineResponse::Ok(Json(services)))
}
