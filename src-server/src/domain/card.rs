//! Card Entity

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::position::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub column_id: u32,
    pub title: String,
    /// Free-form notes
    pub content: Option<String>,
    /// Sparse key, ascending = display order within the column
    pub position: Position,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Card {
    pub fn new(column_id: u32, title: String, content: Option<String>, position: Position) -> Self {
        Self {
            id: 0,
            column_id,
            title,
            content,
            position,
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl Entity for Card {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
