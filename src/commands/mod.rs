//! Backend Command Bindings
//!
//! The three persistence calls a board view issues, behind a trait so the
//! same reconciler drives a server session or a local guest board.

mod guest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use guest::GuestBackend;

// ========================
// Argument Structs
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderColumnsArgs {
    pub board_id: u32,
    pub column_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderCardsArgs {
    pub board_id: u32,
    pub column_id: u32,
    pub card_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardArgs {
    pub board_id: u32,
    pub card_id: u32,
    pub target_column_id: u32,
    /// Full card order of the target column after the move
    pub ordered_card_ids: Vec<u32>,
}

// ========================
// Backend Trait
// ========================

/// Persistence calls for board ordering. Errors are user-facing messages.
#[async_trait]
pub trait BoardBackend: Send + Sync {
    async fn reorder_columns(&self, args: ReorderColumnsArgs) -> Result<(), String>;

    async fn reorder_cards(&self, args: ReorderCardsArgs) -> Result<(), String>;

    async fn move_card(&self, args: MoveCardArgs) -> Result<(), String>;
}
