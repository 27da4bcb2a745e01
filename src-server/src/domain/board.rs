//! Board Entity
//!
//! A board owned by one user; owns an ordered set of columns.

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::column::Column;
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    /// Owner's user id from the identity provider
    pub user_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Board {
    /// New unsaved board (id and timestamps assigned by the store)
    pub fn new(name: String, description: Option<String>, user_id: String) -> Self {
        Self {
            id: 0,
            name,
            description,
            user_id,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl Entity for Board {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Column together with its cards, position ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnWithCards {
    #[serde(flatten)]
    pub column: Column,
    pub cards: Vec<Card>,
}

/// Board detail view: columns and cards sorted by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardWithColumns {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<ColumnWithCards>,
}

impl BoardWithColumns {
    /// Group flat column and card lists into the nested, position-sorted view
    pub fn assemble(board: Board, mut columns: Vec<Column>, mut cards: Vec<Card>) -> Self {
        columns.sort_by_key(|c| (c.position, c.id));
        cards.sort_by_key(|c| (c.position, c.id));

        let columns = columns
            .into_iter()
            .map(|column| {
                let cards = cards
                    .iter()
                    .filter(|card| card.column_id == column.id)
                    .cloned()
                    .collect();
                ColumnWithCards { column, cards }
            })
            .collect();

        Self { board, columns }
    }

    pub fn column(&self, column_id: u32) -> Option<&ColumnWithCards> {
        self.columns.iter().find(|c| c.column.id == column_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBoard {
    pub id: u32,
    pub name: String,
    pub created_at: i64,
}

/// Per-owner totals shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_boards: u32,
    pub total_columns: u32,
    pub total_cards: u32,
    pub latest_board: Option<LatestBoard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_sorts_and_groups() {
        let board = Board::new("Sprint".to_string(), None, "u1".to_string());
        let columns = vec![Column::new(1, "Doing".to_string(), 2000), Column::new(1, "Todo".to_string(), 1000)]
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                c.id = i as u32 + 1;
                c
            })
            .collect();
        let mut card_a = Card::new(2, "A".to_string(), None, 2000);
        card_a.id = 10;
        let mut card_b = Card::new(2, "B".to_string(), None, 1000);
        card_b.id = 11;

        let view = BoardWithColumns::assemble(board, columns, vec![card_a, card_b]);

        assert_eq!(view.columns[0].column.name, "Todo");
        assert_eq!(view.columns[1].column.name, "Doing");
        assert!(view.columns[1].cards.is_empty());
        let todo_cards: Vec<u32> = view.columns[0].cards.iter().map(|c| c.id).collect();
        assert_eq!(todo_cards, vec![11, 10]);
    }
}
