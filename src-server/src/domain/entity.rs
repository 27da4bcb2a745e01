//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities must have a unique ID and be thread-safe.

use serde::{Deserialize, Serialize};

use super::container::Container;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    /// Malformed user input (empty name, empty title)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A reorder or move referenced an id that is not a child of the container
    #[error("Unknown child {id} in {container}")]
    UnknownChild { container: Container, id: u32 },

    /// The store rejected a write
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// A stored row is missing a required field or has the wrong type
    #[error("Malformed {table} row: {detail}")]
    MalformedRow { table: String, detail: String },

    #[error("User must be authenticated to access this resource")]
    Unauthenticated,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("AI request failed: {0}")]
    AiFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn malformed(table: &str, detail: impl ToString) -> Self {
        DomainError::MalformedRow {
            table: table.to_string(),
            detail: detail.to_string(),
        }
    }
}
