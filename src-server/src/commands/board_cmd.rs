//! Commands for Board CRUD and the dashboard

use crate::commands::access::{optional, owned_board, required};
use crate::domain::{Board, BoardWithColumns, DashboardSummary, DomainError, DomainResult, Identity};
use crate::repository::Repository;
use crate::revalidate::{board_path, DASHBOARD_PATH};
use crate::AppState;

/// Create a board owned by the caller
pub async fn create_board(
    state: &AppState,
    identity: &Identity,
    name: &str,
    description: Option<String>,
) -> DomainResult<Board> {
    let board = Board::new(required("Board name", name)?, optional(description), identity.user_id.clone());
    let created = state.boards.create(&board).await?;

    log::info!("Board {} created by {}", created.id, identity.user_id);
    state.revalidator.mark_board(created.id);
    Ok(created)
}

/// Caller's boards, oldest first
pub async fn list_boards(state: &AppState, identity: &Identity) -> DomainResult<Vec<Board>> {
    state.boards.list_by_owner(&identity.user_id).await
}

/// Board with its columns and cards in display order
pub async fn get_board(state: &AppState, identity: &Identity, board_id: u32) -> DomainResult<BoardWithColumns> {
    owned_board(state, identity, board_id).await?;
    let view = state
        .boards
        .find_with_relations(board_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Board {} not found", board_id)))?;

    state.revalidator.take_stale(&board_path(board_id));
    Ok(view)
}

/// Rename a board or change its description
pub async fn update_board(
    state: &AppState,
    identity: &Identity,
    board_id: u32,
    name: Option<String>,
    description: Option<String>,
) -> DomainResult<Board> {
    let existing = owned_board(state, identity, board_id).await?;

    let updated = Board {
        name: match name {
            Some(name) => required("Board name", &name)?,
            None => existing.name.clone(),
        },
        description: match description {
            Some(description) => optional(Some(description)),
            None => existing.description.clone(),
        },
        ..existing
    };

    let board = state.boards.update(&updated).await?;
    state.revalidator.mark_board(board_id);
    Ok(board)
}

/// Delete a board with its columns and cards
pub async fn delete_board(state: &AppState, identity: &Identity, board_id: u32) -> DomainResult<()> {
    owned_board(state, identity, board_id).await?;
    state.boards.delete(board_id).await?;

    log::info!("Board {} deleted", board_id);
    state.revalidator.mark_board(board_id);
    Ok(())
}

pub async fn dashboard_summary(state: &AppState, identity: &Identity) -> DomainResult<DashboardSummary> {
    let summary = state.boards.summary(&identity.user_id).await?;
    state.revalidator.take_stale(DASHBOARD_PATH);
    Ok(summary)
}
