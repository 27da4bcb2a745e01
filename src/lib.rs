//! Kanban Board Client
//!
//! Board view state without the rendering:
//! - models: Board mirror data structures
//! - ordering: Local list moves
//! - commands: Backend bindings and the in-memory guest backend
//! - store: The board mirror
//! - dispatch: Per-container persistence queue
//! - reconciler: Drag/drop handling with optimistic updates

pub mod commands;
pub mod dispatch;
pub mod models;
pub mod ordering;
pub mod reconciler;
pub mod store;


pub use commands::{BoardBackend, GuestBackend, MoveCardArgs, ReorderCardsArgs, ReorderColumnsArgs};
pub use dispatch::{Completion, CompletionOrdering, ContainerKey, Mutation, MutationQueue};
pub use kanban_dragdrop::{DragItem, DropTarget};
pub use models::{Board, Card, Column};
pub use reconciler::{DropEffect, Notice, NoticeLevel, Reconciler, ReconcilerOptions, RollbackPolicy};
pub use store::BoardMirror;
