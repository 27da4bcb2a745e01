//! Commands for Card CRUD, reordering and cross-column moves

use crate::commands::access::{optional, owned_card, owned_column, required};
use crate::domain::{Card, Container, DomainResult, Identity};
use crate::engine::ReorderOutcome;
use crate::repository::{CardPositioningOperations, Repository};
use crate::AppState;

/// Append a card to the column
pub async fn create_card(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    column_id: u32,
    title: &str,
    content: Option<String>,
) -> DomainResult<Card> {
    owned_column(state, identity, board_id, column_id).await?;
    let card = Card::new(column_id, required("Card title", title)?, optional(content), 0);
    let created = state.cards.create(&card).await?;

    state.revalidator.mark_board(board_id);
    Ok(created)
}

/// Edit title/content. A different `column_id` appends the card to that column.
pub async fn update_card(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    card_id: u32,
    title: &str,
    content: Option<String>,
    column_id: Option<u32>,
) -> DomainResult<Card> {
    let existing = owned_card(state, identity, board_id, card_id).await?;
    let title = required("Card title", title)?;

    let (column_id, position) = match column_id {
        Some(target) if target != existing.column_id => {
            owned_column(state, identity, board_id, target).await?;
            (target, state.cards.get_next_position(target).await?)
        }
        _ => (existing.column_id, existing.position),
    };

    let updated = Card {
        title,
        content: optional(content),
        column_id,
        position,
        ..existing
    };

    let card = state.cards.update(&updated).await?;
    state.revalidator.mark_board(board_id);
    Ok(card)
}

pub async fn delete_card(state: &AppState, identity: &Identity, board_id: u32, card_id: u32) -> DomainResult<()> {
    owned_card(state, identity, board_id, card_id).await?;
    state.cards.delete(card_id).await?;

    state.revalidator.mark_board(board_id);
    Ok(())
}

/// Persist a new card order within one column
pub async fn reorder_cards(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    column_id: u32,
    card_ids: &[u32],
) -> DomainResult<ReorderOutcome> {
    owned_column(state, identity, board_id, column_id).await?;
    let outcome = state.engine.reorder_siblings(Container::Column(column_id), card_ids).await?;

    state.revalidator.mark_board(board_id);
    Ok(outcome)
}

/// Move a card into `target_column_id`, which then reads `ordered_card_ids`
pub async fn move_card(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    card_id: u32,
    target_column_id: u32,
    ordered_card_ids: &[u32],
) -> DomainResult<ReorderOutcome> {
    let card = owned_card(state, identity, board_id, card_id).await?;
    owned_column(state, identity, board_id, target_column_id).await?;

    let outcome = state
        .engine
        .move_across_containers(card_id, card.column_id, target_column_id, ordered_card_ids)
        .await?;

    state.revalidator.mark_board(board_id);
    Ok(outcome)
}
