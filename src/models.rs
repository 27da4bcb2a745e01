//! Client Models
//!
//! Board mirror data structures. They deserialize from the backend's board
//! detail payload; fields the client does not use are ignored.

use serde::{Deserialize, Serialize};

/// Card data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub column_id: u32,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    pub position: i64,
}

/// Column with its cards in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: u32,
    pub board_id: u32,
    pub name: String,
    pub position: i64,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn card_ids(&self) -> Vec<u32> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn card_index(&self, card_id: u32) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}

/// Board with its columns in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    pub fn column(&self, column_id: u32) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: u32) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    pub fn column_ids(&self) -> Vec<u32> {
        self.columns.iter().map(|c| c.id).collect()
    }

    /// Column currently holding `card_id`
    pub fn column_of_card(&self, card_id: u32) -> Option<u32> {
        self.columns
            .iter()
            .find(|c| c.cards.iter().any(|card| card.id == card_id))
            .map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_backend_payload() {
        let payload = serde_json::json!({
            "id": 1,
            "name": "Sprint 1",
            "description": null,
            "user_id": "user_1",
            "created_at": 1700000000000i64,
            "updated_at": 1700000000000i64,
            "columns": [{
                "id": 10,
                "board_id": 1,
                "name": "Todo",
                "position": 1000,
                "created_at": 0,
                "updated_at": 0,
                "cards": [{ "id": 100, "column_id": 10, "title": "Fix bug", "content": null, "position": 1000 }]
            }]
        });

        let board: Board = serde_json::from_value(payload).unwrap();
        assert_eq!(board.column_ids(), vec![10]);
        assert_eq!(board.column_of_card(100), Some(10));
        assert_eq!(board.column(10).unwrap().card_index(100), Some(0));
    }
}
