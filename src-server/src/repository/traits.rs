//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{ChildKind, ChildRow, Container, DomainResult, Entity, EntityRef};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID (cascades to descendants)
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Storage operations the reorder engine runs against.
///
/// Rows are always read fresh; nothing here caches positions.
#[async_trait]
pub trait OrderingStore: Send + Sync {
    /// Children of `container`, ascending by position
    async fn list_children(&self, container: Container) -> DomainResult<Vec<ChildRow>>;

    /// Rows of the given kind by id, whatever their parent. Unknown ids are absent.
    async fn find_rows(&self, kind: ChildKind, ids: &[u32]) -> DomainResult<Vec<ChildRow>>;

    /// Upsert by primary key, replacing parent, position and carried fields.
    /// Fails with `Persistence` when the write is rejected.
    async fn upsert_batch(&self, kind: ChildKind, rows: &[ChildRow]) -> DomainResult<()>;

    /// Remove the entity and all its descendants
    async fn delete_cascade(&self, entity: EntityRef) -> DomainResult<()>;
}
