//! Column Entity

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::position::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: u32,
    pub board_id: u32,
    pub name: String,
    /// Sparse key, ascending = display order within the board
    pub position: Position,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Column {
    pub fn new(board_id: u32, name: String, position: Position) -> Self {
        Self {
            id: 0,
            board_id,
            name,
            position,
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl Entity for Column {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
