//! Commands for Column CRUD and column reordering

use crate::commands::access::{owned_board, owned_column, required};
use crate::domain::{Column, Container, DomainResult, Identity};
use crate::engine::ReorderOutcome;
use crate::repository::Repository;
use crate::AppState;

/// Append a column to the board
pub async fn create_column(state: &AppState, identity: &Identity, board_id: u32, name: &str) -> DomainResult<Column> {
    owned_board(state, identity, board_id).await?;
    // Position 0 = append
    let column = Column::new(board_id, required("Column name", name)?, 0);
    let created = state.columns.create(&column).await?;

    state.revalidator.mark_board(board_id);
    Ok(created)
}

/// Rename a column; its position is untouched
pub async fn update_column(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    column_id: u32,
    name: &str,
) -> DomainResult<Column> {
    let existing = owned_column(state, identity, board_id, column_id).await?;
    let updated = Column {
        name: required("Column name", name)?,
        ..existing
    };

    let column = state.columns.update(&updated).await?;
    state.revalidator.mark_board(board_id);
    Ok(column)
}

/// Delete a column and its cards
pub async fn delete_column(state: &AppState, identity: &Identity, board_id: u32, column_id: u32) -> DomainResult<()> {
    owned_column(state, identity, board_id, column_id).await?;
    state.columns.delete(column_id).await?;

    state.revalidator.mark_board(board_id);
    Ok(())
}

/// Persist a new column order for the board
pub async fn reorder_columns(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    column_ids: &[u32],
) -> DomainResult<ReorderOutcome> {
    owned_board(state, identity, board_id).await?;
    let outcome = state.engine.reorder_siblings(Container::Board(board_id), column_ids).await?;

    state.revalidator.mark_board(board_id);
    Ok(outcome)
}
