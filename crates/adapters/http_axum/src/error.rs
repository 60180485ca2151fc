//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use servicehub_domain::error::{ServiceHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors an API endpoint can answer with.
#[derive(Debug)]
pub enum ApiError {
    /// An error raised by the application or domain layer.
    Domain(ServiceHubError),
    /// The request carries no usable caller identity.
    Unauthenticated(&'static str),
}

impl ApiError {
    /// Reject a path segment that is not a valid identifier.
    #[must_use]
    pub fn invalid_id(raw: &str) -> Self {
        Self::Domain(ValidationError::InvalidId(raw.to_string()).into())
    }
}

impl From<ServiceHubError> for ApiError {
    fn from(err: ServiceHubError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthenticated(reason) => (StatusCode::UNAUTHORIZED, (*reason).to_string()),
            Self::Domain(ServiceHubError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(ServiceHubError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(ServiceHubError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::Domain(ServiceHubError::Publish(err)) => {
                tracing::error!(error = %err, "publish error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
