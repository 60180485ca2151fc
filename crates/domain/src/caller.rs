//! Caller: the authenticated user a request is made on behalf of.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Identity of the requesting user, as established by the upstream gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: UserId,
    pub role: Option<String>,
}

impl Caller {
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self { id, role: None }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}
