//! User references as populated into services and devices.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// The subset of a user record exposed when an `owner` reference is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: UserId,
    pub name: String,
    pub email: String,
}
