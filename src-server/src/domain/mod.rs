//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO storage dependencies.

mod entity;
mod board;
mod column;
mod card;
mod container;
mod identity;
mod position;

pub use entity::{Entity, DomainError, DomainResult};
pub use board::{Board, BoardWithColumns, ColumnWithCards, DashboardSummary, LatestBoard};
pub use column::Column;
pub use card::Card;
pub use container::{CarriedFields, ChildKind, ChildRow, Container, EntityRef};
pub use identity::Identity;
pub use position::{allocate, next_position, Position, PositionMap, POSITION_STEP};
