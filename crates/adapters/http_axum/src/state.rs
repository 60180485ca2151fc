//! Shared application state for axum handlers.

use std::sync::Arc;

use servicehub_app::ports::{
    Authorizer, DeviceRepository, DeviceTemplateRepository, PropertyPublisher,
    ServiceRepository, TokenManager,
};
use servicehub_app::services::linked_device_service::LinkedDeviceService;
use servicehub_app::services::service_manager::ServiceManager;

/// Application state shared across all axum handlers.
///
/// Generic over the service repository, property publisher, device and
/// device-template repositories, token manager and authorizer to avoid
/// dynamic dispatch. The device repository type is shared by both services.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<SR, PP, DR, TR, TK, AZ> {
    /// Service CRUD, ownership and status.
    pub service_manager: Arc<ServiceManager<SR, PP, DR, TR, TK>>,
    /// Projections of the devices linked to a service.
    pub linked_devices: Arc<LinkedDeviceService<DR, AZ>>,
}

impl<SR, PP, DR, TR, TK, AZ> Clone for AppState<SR, PP, DR, TR, TK, AZ> {
    fn clone(&self) -> Self {
        Self {
            service_manager: Arc::clone(&self.service_manager),
            linked_devices: Arc::clone(&self.linked_devices),
        }
    }
}

impl<SR, PP, DR, TR, TK, AZ> AppState<SR, PP, DR, TR, TK, AZ>
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        service_manager: ServiceManager<SR, PP, DR, TR, TK>,
        linked_devices: LinkedDeviceService<DR, AZ>,
    ) -> Self {
        Self {
            service_manager: Arc::new(service_manager),
            linked_devices: Arc::new(linked_devices),
        }
    }
}
