//! Service: a registered third-party capability that devices can link to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ServiceHubError, ValidationError};
use crate::id::{ServiceId, UserId};
use crate::user::Owner;

/// A registered service.
///
/// `config_required`, `device_permission` and `properties` are opaque JSON
/// documents defined by the service author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub config_required: Vec<Value>,
    pub device_permission: Value,
    pub properties: Vec<Value>,
    pub owner: UserId,
    pub status: String,
}

impl Service {
    /// Create a builder for constructing a [`Service`].
    #[must_use]
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceHubError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), ServiceHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Apply the fields present in `patch`, leaving the others untouched.
    ///
    /// Returns `true` when the patch carried `properties`.
    pub fn apply(&mut self, patch: ServicePatch) -> bool {
        let ServicePatch {
            name,
            description,
            config_required,
            device_permission,
            properties,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(config_required) = config_required {
            self.config_required = config_required;
        }
        if let Some(device_permission) = device_permission {
            self.device_permission = device_permission;
        }
        match properties {
            Some(properties) => {
                self.properties = properties;
                true
            }
            None => false,
        }
    }
}

/// Step-by-step builder for [`Service`].
#[derive(Debug, Default)]
pub struct ServiceBuilder {
    id: Option<ServiceId>,
    name: Option<String>,
    description: Option<String>,
    config_required: Vec<Value>,
    device_permission: Option<Value>,
    properties: Vec<Value>,
    owner: Option<UserId>,
    status: Option<String>,
}

impl ServiceBuilder {
    #[must_use]
    pub fn id(mut self, id: ServiceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn config_required(mut self, config_required: Vec<Value>) -> Self {
        self.config_required = config_required;
        self
    }

    #[must_use]
    pub fn device_permission(mut self, device_permission: Value) -> Self {
        self.device_permission = Some(device_permission);
        self
    }

    #[must_use]
    pub fn properties(mut self, properties: Vec<Value>) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Consume the builder, validate, and return a [`Service`].
    ///
    /// A missing owner defaults to a fresh id; the application layer always
    /// overwrites it with the creating caller.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceHubError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Service, ServiceHubError> {
        let service = Service {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            config_required: self.config_required,
            device_permission: self.device_permission.unwrap_or(Value::Null),
            properties: self.properties,
            owner: self.owner.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        };
        service.validate()?;
        Ok(service)
    }
}

/// Partial update of a [`Service`]. Absent fields are left unchanged.
///
/// Only this whitelist can be changed through an update; `owner` and
/// `status` have their own flows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub config_required: Option<Vec<Value>>,
    pub device_permission: Option<Value>,
    pub properties: Option<Vec<Value>>,
}

/// A [`Service`] with its owner populated.
///
/// `owner` is `None` when the referenced user record no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDetails {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub config_required: Vec<Value>,
    pub device_permission: Value,
    pub properties: Vec<Value>,
    pub owner: Option<Owner>,
    pub status: String,
    #[serde(skip)]
    owner_id: UserId,
}

impl ServiceDetails {
    /// Populate `service` with its owner record.
    #[must_use]
    pub fn new(service: Service, owner: Option<Owner>) -> Self {
        Self {
            id: service.id,
            name: service.name,
            description: service.description,
            config_required: service.config_required,
            device_permission: service.device_permission,
            properties: service.properties,
            owner,
            status: service.status,
            owner_id: service.owner,
        }
    }

    /// Reference to the owning user, known even when the record is gone.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Drop the populated owner, keeping only its reference.
    #[must_use]
    pub fn into_service(self) -> Service {
        Service {
            id: self.id,
            name: self.name,
            description: self.description,
            config_required: self.config_required,
            device_permission: self.device_permission,
            properties: self.properties,
            owner: self.owner_id,
            status: self.status,
        }
    }
}
