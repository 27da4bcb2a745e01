//! Ownership checks and input validation shared by the commands.

use crate::domain::{Board, Card, Column, DomainError, DomainResult, Identity};
use crate::repository::Repository;
use crate::AppState;

/// Board owned by the caller. Boards of other users read as missing.
pub(crate) async fn owned_board(state: &AppState, identity: &Identity, board_id: u32) -> DomainResult<Board> {
    state
        .boards
        .find_by_id(board_id)
        .await?
        .filter(|board| board.is_owned_by(&identity.user_id))
        .ok_or_else(|| DomainError::NotFound(format!("Board {} not found", board_id)))
}

/// Column on an owned board
pub(crate) async fn owned_column(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    column_id: u32,
) -> DomainResult<Column> {
    owned_board(state, identity, board_id).await?;
    state
        .columns
        .find_by_id(column_id)
        .await?
        .filter(|column| column.board_id == board_id)
        .ok_or_else(|| DomainError::NotFound(format!("Column {} not found", column_id)))
}

/// Card on an owned board
pub(crate) async fn owned_card(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    card_id: u32,
) -> DomainResult<Card> {
    owned_board(state, identity, board_id).await?;
    let not_found = || DomainError::NotFound(format!("Card {} not found", card_id));

    if state.cards.board_id_of(card_id).await? != Some(board_id) {
        return Err(not_found());
    }
    state.cards.find_by_id(card_id).await?.ok_or_else(not_found)
}

/// Trimmed, non-empty text
pub(crate) fn required(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Blank optional text becomes `None`
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("Name", "  Todo ").unwrap(), "Todo");
        assert_eq!(
            required("Name", "   "),
            Err(DomainError::Validation("Name is required".to_string()))
        );
        assert_eq!(optional(Some(" ".to_string())), None);
    }
}
