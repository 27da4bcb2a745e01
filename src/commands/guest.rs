//! Guest Backend
//!
//! Keeps a local-only board in memory and applies the same renormalization
//! as the server: requested order first, omitted siblings after, positions
//! 1000, 2000, ...

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{BoardBackend, MoveCardArgs, ReorderCardsArgs, ReorderColumnsArgs};
use crate::models::{Board, Column};
use crate::ordering::renormalize;

pub struct GuestBackend {
    board: Mutex<Board>,
}

impl GuestBackend {
    pub fn new(board: Board) -> Self {
        Self { board: Mutex::new(board) }
    }

    /// Copy of the stored board
    pub async fn snapshot(&self) -> Board {
        self.board.lock().await.clone()
    }
}

/// Put the ids of `ordered` first, then the rest in their current order
fn reorder_by_ids<T>(items: &mut Vec<T>, ordered: &[u32], id_of: impl Fn(&T) -> u32) {
    let mut rest = std::mem::take(items);
    for id in ordered {
        if let Some(index) = rest.iter().position(|item| id_of(item) == *id) {
            items.push(rest.remove(index));
        }
    }
    items.append(&mut rest);
}

fn check_board(board: &Board, board_id: u32) -> Result<(), String> {
    if board.id != board_id {
        return Err(format!("Board {} not found", board_id));
    }
    Ok(())
}

fn column_mut(board: &mut Board, column_id: u32) -> Result<&mut Column, String> {
    board
        .columns
        .iter_mut()
        .find(|c| c.id == column_id)
        .ok_or_else(|| format!("Column {} not found", column_id))
}

#[async_trait]
impl BoardBackend for GuestBackend {
    async fn reorder_columns(&self, args: ReorderColumnsArgs) -> Result<(), String> {
        let mut board = self.board.lock().await;
        check_board(&board, args.board_id)?;

        if let Some(id) = args.column_ids.iter().find(|id| board.column(**id).is_none()) {
            return Err(format!("Unknown column {} in board {}", id, board.id));
        }

        reorder_by_ids(&mut board.columns, &args.column_ids, |c| c.id);
        renormalize(&mut board.columns, |c, p| c.position = p);
        Ok(())
    }

    async fn reorder_cards(&self, args: ReorderCardsArgs) -> Result<(), String> {
        let mut board = self.board.lock().await;
        check_board(&board, args.board_id)?;
        let column = column_mut(&mut board, args.column_id)?;

        if let Some(id) = args.card_ids.iter().find(|id| column.card_index(**id).is_none()) {
            return Err(format!("Unknown card {} in column {}", id, column.id));
        }

        reorder_by_ids(&mut column.cards, &args.card_ids, |c| c.id);
        renormalize(&mut column.cards, |c, p| c.position = p);
        Ok(())
    }

    async fn move_card(&self, args: MoveCardArgs) -> Result<(), String> {
        let mut board = self.board.lock().await;
        check_board(&board, args.board_id)?;
        column_mut(&mut board, args.target_column_id)?;

        let mut seen = HashSet::new();
        let mut ordered: Vec<u32> = args.ordered_card_ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if !seen.contains(&args.card_id) {
            ordered.push(args.card_id);
        }

        let source = board
            .column_of_card(args.card_id)
            .ok_or_else(|| format!("Unknown card {}", args.card_id))?;
        if source == args.target_column_id {
            drop(board);
            return self
                .reorder_cards(ReorderCardsArgs {
                    board_id: args.board_id,
                    column_id: args.target_column_id,
                    card_ids: ordered,
                })
                .await;
        }

        let target = column_mut(&mut board, args.target_column_id)?;
        if let Some(id) = ordered
            .iter()
            .find(|id| **id != args.card_id && target.card_index(**id).is_none())
        {
            return Err(format!("Card {} is not in column {}", id, args.target_column_id));
        }

        let column = column_mut(&mut board, source)?;
        let Some(index) = column.card_index(args.card_id) else {
            return Err(format!("Unknown card {}", args.card_id));
        };
        let mut card = column.cards.remove(index);
        card.column_id = args.target_column_id;

        // Listed cards first, then the rest of the target; the source column keeps its gap
        let target = column_mut(&mut board, args.target_column_id)?;
        target.cards.push(card);
        reorder_by_ids(&mut target.cards, &ordered, |c| c.id);
        renormalize(&mut target.cards, |c, p| c.position = p);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Card;

    fn board() -> Board {
        let card = |id: u32, column_id: u32, position: i64| Card {
            id,
            column_id,
            title: format!("card {}", id),
            content: None,
            position,
        };
        Board {
            id: 1,
            name: "Guest board".to_string(),
            description: None,
            columns: vec![
                Column {
                    id: 10,
                    board_id: 1,
                    name: "Todo".to_string(),
                    position: 1000,
                    cards: vec![card(1, 10, 1000), card(2, 10, 2000), card(3, 10, 3000)],
                },
                Column {
                    id: 20,
                    board_id: 1,
                    name: "Done".to_string(),
                    position: 2000,
                    cards: vec![card(4, 20, 1000), card(5, 20, 2000)],
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_reorder_columns() {
        let guest = GuestBackend::new(board());
        guest
            .reorder_columns(ReorderColumnsArgs { board_id: 1, column_ids: vec![20] })
            .await
            .unwrap();

        let stored = guest.snapshot().await;
        assert_eq!(stored.column_ids(), vec![20, 10]);
        assert_eq!(stored.columns[0].position, 1000);
        assert_eq!(stored.columns[1].position, 2000);
    }

    #[tokio::test]
    async fn test_reorder_cards_unknown_id() {
        let guest = GuestBackend::new(board());
        let result = guest
            .reorder_cards(ReorderCardsArgs { board_id: 1, column_id: 10, card_ids: vec![4] })
            .await;
        assert!(result.is_err());
        assert_eq!(guest.snapshot().await.column(10).unwrap().card_ids(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_move_card_rejects_card_outside_target() {
        let guest = GuestBackend::new(board());
        let result = guest
            .move_card(MoveCardArgs {
                board_id: 1,
                card_id: 2,
                target_column_id: 20,
                ordered_card_ids: vec![2, 3, 4],
            })
            .await;

        assert!(result.is_err());
        assert_eq!(guest.snapshot().await, board());
    }

    #[tokio::test]
    async fn test_move_card_appends_omitted_target_cards() {
        let guest = GuestBackend::new(board());
        guest
            .move_card(MoveCardArgs {
                board_id: 1,
                card_id: 1,
                target_column_id: 20,
                ordered_card_ids: vec![1],
            })
            .await
            .unwrap();

        let done = guest.snapshot().await.column(20).unwrap().clone();
        assert_eq!(done.card_ids(), vec![1, 4, 5]);
        let positions: Vec<i64> = done.cards.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1000, 2000, 3000]);
    }

    #[tokio::test]
    async fn test_move_card_keeps_source_gap() {
        let guest = GuestBackend::new(board());
        guest
            .move_card(MoveCardArgs {
                board_id: 1,
                card_id: 2,
                target_column_id: 20,
                ordered_card_ids: vec![4, 2, 5],
            })
            .await
            .unwrap();

        let stored = guest.snapshot().await;
        let todo = stored.column(10).unwrap();
        assert_eq!(todo.card_ids(), vec![1, 3]);
        assert_eq!(todo.cards[1].position, 3000);

        let done = stored.column(20).unwrap();
        assert_eq!(done.card_ids(), vec![4, 2, 5]);
        let positions: Vec<i64> = done.cards.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1000, 2000, 3000]);
        assert_eq!(done.cards[1].column_id, 20);
    }
}
