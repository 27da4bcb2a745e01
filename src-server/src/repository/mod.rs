//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod cascade;
mod board_repo;
pub mod column;
pub mod card;
mod ordering_store;


pub use traits::{OrderingStore, Repository};
pub use db::{init_db, DbState, SharedConnection};
pub use board_repo::BoardRepository;
pub use column::{ColumnPositioningOperations, ColumnRepository};
pub use card::{CardPositioningOperations, CardRepository};
pub use ordering_store::SqliteOrderingStore;
