//! Storage port: repository traits for persistence.

use std::future::Future;
use std::sync::Arc;

use servicehub_domain::device::Device;
use servicehub_domain::error::ServiceHubError;
use servicehub_domain::id::{ServiceId, UserId};
use servicehub_domain::service::{Service, ServiceDetails};

/// Repository for [`Service`] records.
pub trait ServiceRepository {
    /// Persist a new service.
    fn create(&self, service: Service)
    -> impl Future<Output = Result<Service, ServiceHubError>> + Send;

    /// Get a service by id with its owner populated.
    fn get_details(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<ServiceDetails>, ServiceHubError>> + Send;

    /// Get every service with its owner populated.
    fn get_all_details(
        &self,
    ) -> impl Future<Output = Result<Vec<ServiceDetails>, ServiceHubError>> + Send;

    /// Get the services owned by `owner`.
    ///
    /// When `text` is given, only services whose name or description matches
    /// at least one of its whitespace-separated terms are returned.
    fn find_by_owner(
        &self,
        owner: UserId,
        text: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Service>, ServiceHubError>> + Send;

    /// Save the editable fields of a stored service: name, description,
    /// `config_required`, `device_permission` and properties.
    ///
    /// `owner` and `status` are left as stored. Returns the stored record.
    fn update(&self, service: Service)
    -> impl Future<Output = Result<Service, ServiceHubError>> + Send;

    /// Atomically set the `status` field.
    ///
    /// Returns the record as it was **before** the update, or `None` when no
    /// service has that id.
    fn set_status(
        &self,
        id: ServiceId,
        status: String,
    ) -> impl Future<Output = Result<Option<Service>, ServiceHubError>> + Send;

    /// Remove a service.
    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<(), ServiceHubError>> + Send;
}

/// Repository for devices, seen from the services they link to.
pub trait DeviceRepository {
    /// Find the devices linked to `service_id`, owner and location populated.
    ///
    /// Each returned device carries only its first link to that service.
    fn find_linked_to_service(
        &self,
        service_id: ServiceId,
    ) -> impl Future<Output = Result<Vec<Device>, ServiceHubError>> + Send;

    /// Remove every link to `service_id` from every device.
    ///
    /// Returns the number of links removed.
    fn unlink_service(
        &self,
        service_id: ServiceId,
    ) -> impl Future<Output = Result<u64, ServiceHubError>> + Send;
}

impl<T: DeviceRepository + Send + Sync> DeviceRepository for Arc<T> {
    fn find_linked_to_service(
        &self,
        service_id: ServiceId,
    ) -> impl Future<Output = Result<Vec<Device>, ServiceHubError>> + Send {
        (**self).find_linked_to_service(service_id)
    }

    fn unlink_service(
        &self,
        service_id: ServiceId,
    ) -> impl Future<Output = Result<u64, ServiceHubError>> + Send {
        (**self).unlink_service(service_id)
    }
}

/// Repository for device templates.
pub trait DeviceTemplateRepository {
    /// Remove every link to `service_id` from every template.
    ///
    /// Returns the number of links removed.
    fn unlink_service(
        &self,
        service_id: ServiceId,
    ) -> impl Future<Output = Result<u64, ServiceHubError>> + Send;
}
