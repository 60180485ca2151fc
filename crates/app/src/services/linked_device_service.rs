//! Linked-device service: projections of the devices linked to a service.

use servicehub_domain::caller::Caller;
use servicehub_domain::device::Device;
use servicehub_domain::error::ServiceHubError;
use servicehub_domain::id::ServiceId;
use servicehub_domain::linked_device::{DeviceInfo, ThingSummary};

use crate::ports::{Authorizer, DeviceRepository};

/// Read-side service listing the devices linked to a service.
///
/// Per-link configuration is revealed only to privileged callers and to the
/// owner of each device.
pub struct LinkedDeviceService<D, A> {
    devices: D,
    authorizer: A,
}

impl<D, A> LinkedDeviceService<D, A>
where
    D: DeviceRepository,
    A: Authorizer,
{
    pub fn new(devices: D, authorizer: A) -> Self {
        Self {
            devices,
            authorizer,
        }
    }

    /// Summaries of the devices linked to `service_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn get_things(
        &self,
        service_id: ServiceId,
        caller: &Caller,
    ) -> Result<Vec<ThingSummary>, ServiceHubError> {
        self.project(service_id, caller, ThingSummary::project).await
    }

    /// Detailed views (location and link status included) of the devices
    /// linked to `service_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn get_device_info(
        &self,
        service_id: ServiceId,
        caller: &Caller,
    ) -> Result<Vec<DeviceInfo>, ServiceHubError> {
        self.project(service_id, caller, DeviceInfo::project).await
    }

    async fn project<O>(
        &self,
        service_id: ServiceId,
        caller: &Caller,
        build: fn(Device, bool) -> O,
    ) -> Result<Vec<O>, ServiceHubError> {
        let authorized = self.authorizer.is_authorized(caller);
        let devices = self.devices.find_linked_to_service(service_id).await?;

        Ok(devices
            .into_iter()
            .map(|device| {
                let reveal = authorized || device.is_owned_by(caller.id);
                build(device, reveal)
            })
            .collect())
    }
}
