//! Column Repository Module
//!
//! This module provides column repository functionality split into specialized sub-modules:
//! - column_repo: Core CRUD operations
//! - column_positioning: Position management within a board

mod column_repo;
mod column_positioning;

pub use column_repo::ColumnRepository;
pub(crate) use column_repo::row_to_column;

// Re-export the operation trait so it can be used by importing ColumnRepository
pub use column_positioning::ColumnPositioningOperations;
