//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ServiceHubError`] via `From`.

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum ServiceHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("publish error")]
    Publish(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Payload or identifier rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

/// A lookup by id matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not find a {entity} with id: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
