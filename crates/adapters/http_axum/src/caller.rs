//! Caller identity extracted from gateway-provided headers.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use servicehub_domain::caller::Caller;
use servicehub_domain::id::UserId;

use crate::error::ApiError;

/// Header carrying the id of the authenticated user.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the role of the authenticated user, if any.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor yielding the [`Caller`] a request is made on behalf of.
///
/// Rejects with `401 Unauthorized` when the user id header is missing or is
/// not a valid id.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub Caller);

impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated("missing x-user-id header"))?;
        let id = UserId::from_str(raw.trim())
            .map_err(|_| ApiError::Unauthenticated("invalid x-user-id header"))?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|role| !role.is_empty());

        let caller = match role {
            Some(role) => Caller::new(id).with_role(role),
            None => Caller::new(id),
        };
        Ok(Self(caller))
    }
}
