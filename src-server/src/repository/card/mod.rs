//! Card Repository Module
//!
//! This module provides card repository functionality split into specialized sub-modules:
//! - card_repo: Core CRUD operations
//! - card_positioning: Position management within and across columns

mod card_repo;
mod card_positioning;

pub use card_repo::CardRepository;
pub(crate) use card_repo::row_to_card;

// Re-export the operation trait so it can be used by importing CardRepository
pub use card_positioning::CardPositioningOperations;
