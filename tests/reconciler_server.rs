//! Reconciler against the real server commands on an in-memory database.

use std::sync::Arc;

use async_trait::async_trait;
use kanban_board_lib::commands as server;
use kanban_board_lib::config::AppConfig;
use kanban_board_lib::domain::Identity;
use kanban_board_lib::AppState;
use kanban_board_ui::{
    Board, BoardBackend, DragItem, DropEffect, DropTarget, MoveCardArgs, Reconciler, ReconcilerOptions,
    ReorderCardsArgs, ReorderColumnsArgs,
};

struct ServerBackend {
    state: AppState,
    identity: Identity,
}

#[async_trait]
impl BoardBackend for ServerBackend {
    async fn reorder_columns(&self, args: ReorderColumnsArgs) -> Result<(), String> {
        server::reorder_columns(&self.state, &self.identity, args.board_id, &args.column_ids)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn reorder_cards(&self, args: ReorderCardsArgs) -> Result<(), String> {
        server::reorder_cards(&self.state, &self.identity, args.board_id, args.column_id, &args.card_ids)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn move_card(&self, args: MoveCardArgs) -> Result<(), String> {
        server::move_card(
            &self.state,
            &self.identity,
            args.board_id,
            args.card_id,
            args.target_column_id,
            &args.ordered_card_ids,
        )
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
    }
}

async fn load(backend: &ServerBackend, board_id: u32) -> Board {
    let view = server::get_board(&backend.state, &backend.identity, board_id).await.unwrap();
    serde_json::from_value(serde_json::to_value(view).unwrap()).unwrap()
}

#[tokio::test]
async fn test_drops_persist_and_resync() {
    let state = AppState::init(AppConfig::in_memory()).await.unwrap();
    let identity = Identity::require(Some("user_1")).unwrap();

    let board = server::create_board(&state, &identity, "Sprint 1", None).await.unwrap();
    let todo = server::create_column(&state, &identity, board.id, "Todo").await.unwrap();
    let doing = server::create_column(&state, &identity, board.id, "Doing").await.unwrap();
    let done = server::create_column(&state, &identity, board.id, "Done").await.unwrap();
    let fix = server::create_card(&state, &identity, board.id, todo.id, "Fix bug", None).await.unwrap();
    let docs = server::create_card(&state, &identity, board.id, todo.id, "Write docs", None).await.unwrap();

    let backend = Arc::new(ServerBackend { state, identity });
    let initial = load(&backend, board.id).await;
    let mut rec = Reconciler::new(initial, backend.clone(), ReconcilerOptions::default());

    // Done to the front
    let effect = rec.handle_drop(DragItem::Column(done.id), DropTarget::Column(todo.id));
    assert!(matches!(effect, DropEffect::Applied { .. }));
    // "Fix bug" onto the Doing column
    rec.handle_drop(
        DragItem::Card { card_id: fix.id, column_id: todo.id },
        DropTarget::Column(doing.id),
    );
    rec.settle().await;
    assert!(rec.take_notices().is_empty());

    let server_board = load(&backend, board.id).await;
    assert_eq!(server_board.column_ids(), rec.board().column_ids());
    assert_eq!(server_board.column_ids(), vec![done.id, todo.id, doing.id]);
    assert_eq!(server_board.column(doing.id).unwrap().card_ids(), vec![fix.id]);
    assert_eq!(server_board.column(todo.id).unwrap().card_ids(), vec![docs.id]);

    // Positions only settle on the server; resync picks them up
    rec.sync(server_board.clone());
    assert_eq!(rec.board(), &server_board);
    let positions: Vec<i64> = rec.board().columns.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![1000, 2000, 3000]);
}

#[tokio::test]
async fn test_server_rejection_becomes_notice() {
    let state = AppState::init(AppConfig::in_memory()).await.unwrap();
    let identity = Identity::require(Some("user_1")).unwrap();
    let board = server::create_board(&state, &identity, "Sprint 1", None).await.unwrap();
    let todo = server::create_column(&state, &identity, board.id, "Todo").await.unwrap();
    let doing = server::create_column(&state, &identity, board.id, "Doing").await.unwrap();

    let backend = Arc::new(ServerBackend { state, identity });
    let mut stale = load(&backend, board.id).await;
    // Column deleted elsewhere; the mirror still shows it
    server::delete_column(&backend.state, &backend.identity, board.id, doing.id).await.unwrap();
    stale.columns.reverse();

    let mut rec = Reconciler::new(stale, backend.clone(), ReconcilerOptions::default());
    rec.handle_drop(DragItem::Column(todo.id), DropTarget::Column(doing.id));
    rec.settle().await;

    let notices = rec.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Failed to save column order");
}
