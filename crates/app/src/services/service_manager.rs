//! Service manager: use-cases for managing services and their ownership.

use servicehub_domain::error::{NotFoundError, ServiceHubError};
use servicehub_domain::event::PublishAck;
use servicehub_domain::id::{ServiceId, UserId};
use servicehub_domain::service::{Service, ServiceDetails, ServicePatch};

use crate::ports::{
    DeviceRepository, DeviceTemplateRepository, PropertyPublisher, ServiceRepository,
    TokenManager,
};
use crate::services::link_cleanup::LinkCleanup;

/// Result of [`ServiceManager::update_service`].
///
/// Updating `properties` yields the publish acknowledgement rather than the
/// saved record.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceUpdate {
    Saved(Service),
    PropertiesPublished(PublishAck),
}

/// Application service for service CRUD, ownership and status.
pub struct ServiceManager<R, P, D, T, K> {
    repo: R,
    publisher: P,
    cleanup: LinkCleanup<D, T, K>,
}

impl<R, P, D, T, K> ServiceManager<R, P, D, T, K>
where
    R: ServiceRepository,
    P: PropertyPublisher,
    D: DeviceRepository,
    T: DeviceTemplateRepository,
    K: TokenManager,
{
    /// Create a new manager from its collaborators.
    pub fn new(repo: R, publisher: P, cleanup: LinkCleanup<D, T, K>) -> Self {
        Self {
            repo,
            publisher,
            cleanup,
        }
    }

    /// List every service with its owner populated.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_services(&self) -> Result<Vec<ServiceDetails>, ServiceHubError> {
        self.repo.get_all_details().await
    }

    /// Create a service owned by `owner`.
    ///
    /// Any owner already set on `service` is overwritten. The stored record is
    /// read back with its owner populated.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceHubError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, service), fields(service_name = %service.name))]
    pub async fn create_service(
        &self,
        owner: UserId,
        mut service: Service,
    ) -> Result<ServiceDetails, ServiceHubError> {
        service.owner = owner;
        service.validate()?;
        let created = self.repo.create(service).await?;
        self.get_service(created.id).await
    }

    /// Look up a service by id, owner populated.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceHubError::NotFound`] when no service with `id`
    /// exists, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_service(&self, id: ServiceId) -> Result<ServiceDetails, ServiceHubError> {
        self.repo.get_details(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "service",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Apply `patch` to `existing` and save it.
    ///
    /// When the patch carries `properties`, a property-update event is
    /// published after the save and its acknowledgement is returned instead
    /// of the saved record.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceHubError::Validation`] if the patched service breaks
    /// invariants, a storage error from the repository, or a publish error.
    #[tracing::instrument(skip(self, existing, patch), fields(service_id = %existing.id))]
    pub async fn update_service(
        &self,
        mut existing: Service,
        patch: ServicePatch,
    ) -> Result<ServiceUpdate, ServiceHubError> {
        let properties_changed = existing.apply(patch);
        existing.validate()?;
        let saved = self.repo.update(existing).await?;

        if properties_changed {
            let ack = self
                .publisher
                .publish_update_properties(&saved, &saved.properties)
                .await?;
            return Ok(ServiceUpdate::PropertiesPublished(ack));
        }
        Ok(ServiceUpdate::Saved(saved))
    }

    /// Set the status of a service.
    ///
    /// Returns the service as it was before the update, or `None` when no
    /// service has that id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: ServiceId,
        status: String,
    ) -> Result<Option<Service>, ServiceHubError> {
        self.repo.set_status(id, status).await
    }

    /// List the services owned by `owner`, optionally text-searched by name.
    ///
    /// A blank `name` is treated as no filter.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_services_by_owner(
        &self,
        owner: UserId,
        name: Option<&str>,
    ) -> Result<Vec<Service>, ServiceHubError> {
        let name = name.map(str::trim).filter(|name| !name.is_empty());
        self.repo.find_by_owner(owner, name).await
    }

    /// Delete a service, then clean up what referenced it.
    ///
    /// Only a failure to remove the service itself is returned; cleanup is
    /// best effort.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the removal fails.
    #[tracing::instrument(skip(self, existing), fields(service_id = %existing.id))]
    pub async fn delete_service(&self, existing: &Service) -> Result<(), ServiceHubError> {
        self.repo.delete(existing.id).await?;
        self.cleanup.post_delete_cleanup(existing.id).await;
        Ok(())
    }
}
