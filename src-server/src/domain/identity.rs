//! Authenticated caller
//!
//! Identity provisioning happens upstream; commands only receive the
//! provider's user id and scope every board query by it.

use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    /// Build an identity from the session's user id, if any
    pub fn require(user_id: Option<&str>) -> DomainResult<Self> {
        match user_id.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self { user_id: id.to_string() }),
            _ => Err(DomainError::Unauthenticated),
        }
    }
}
