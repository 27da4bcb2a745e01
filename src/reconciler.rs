//! Optimistic Client Reconciler
//!
//! Applies drops to the board mirror immediately, hands the resulting order
//! to the mutation queue and folds completions back in according to the
//! rollback policy.

use std::collections::HashMap;
use std::sync::Arc;

use kanban_dragdrop::{DragError, DragItem, DragSession, DropOutcome, DropTarget};
use serde::{Deserialize, Serialize};

use crate::commands::{BoardBackend, MoveCardArgs, ReorderCardsArgs, ReorderColumnsArgs};
use crate::dispatch::{Completion, CompletionOrdering, ContainerKey, Mutation, MutationQueue};
use crate::models::Board;
use crate::ordering::{array_move, move_card_locally};
use crate::store::BoardMirror;

/// What happens to the mirror when a persistence call fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollbackPolicy {
    /// Notify only; the mirror keeps the optimistic order until the next sync
    #[default]
    KeepOptimistic,
    /// Restore the mirror as it was before that change
    RevertToSnapshot,
    /// Notify and refuse further drops until the next sync
    MarkDirty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcilerOptions {
    pub ordering: CompletionOrdering,
    pub rollback: RollbackPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible message for the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// What a drop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    /// Click, cancel, no-op move or unknown column
    Ignored,
    /// The mirror is dirty; sync before reordering again
    Blocked,
    /// Mirror updated and a mutation dispatched
    Applied { key: ContainerKey, seq: u64 },
}

pub struct Reconciler<B: BoardBackend + 'static> {
    mirror: BoardMirror,
    drag: DragSession,
    queue: MutationQueue<B>,
    rollback: RollbackPolicy,
    /// Mirror before each in-flight change, kept only for `RevertToSnapshot`
    snapshots: HashMap<(ContainerKey, u64), Board>,
    notices: Vec<Notice>,
}

impl<B: BoardBackend + 'static> Reconciler<B> {
    pub fn new(board: Board, backend: Arc<B>, options: ReconcilerOptions) -> Self {
        Self {
            mirror: BoardMirror::new(board),
            drag: DragSession::new(),
            queue: MutationQueue::new(backend, options.ordering),
            rollback: options.rollback,
            snapshots: HashMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        self.mirror.board()
    }

    pub fn is_dirty(&self) -> bool {
        self.mirror.is_dirty()
    }

    pub fn in_flight(&self) -> usize {
        self.queue.in_flight()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    // ========================
    // Pointer Events
    // ========================

    pub fn press(&mut self, item: DragItem, x: i32, y: i32) -> Result<(), DragError> {
        self.drag.press(item, x, y)
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        self.drag.pointer_move(x, y)
    }

    pub fn hover(&mut self, target: Option<DropTarget>) {
        self.drag.hover(target);
    }

    /// Pointer released: apply the drop, if any
    pub fn release(&mut self) -> DropEffect {
        match self.drag.release() {
            DropOutcome::Dropped { item, target } => self.handle_drop(item, target),
            DropOutcome::None | DropOutcome::Click(_) | DropOutcome::Cancelled(_) => DropEffect::Ignored,
        }
    }

    pub fn cancel(&mut self) {
        self.drag.cancel();
    }

    // ========================
    // Drops
    // ========================

    pub fn handle_drop(&mut self, item: DragItem, target: DropTarget) -> DropEffect {
        if self.mirror.is_dirty() {
            self.notify(NoticeLevel::Info, "Board is out of sync; reload before reordering");
            return DropEffect::Blocked;
        }

        match item {
            DragItem::Column(column_id) => self.drop_column(column_id, target.column_id()),
            DragItem::Card { card_id, .. } => {
                let over_card = match target {
                    DropTarget::Card { card_id, .. } => Some(card_id),
                    DropTarget::Column(_) => None,
                };
                self.drop_card(card_id, target.column_id(), over_card)
            }
        }
    }

    fn drop_column(&mut self, column_id: u32, over_column_id: u32) -> DropEffect {
        if column_id == over_column_id {
            return DropEffect::Ignored;
        }
        let board = self.mirror.board();
        let (Some(from), Some(to)) = (board.column_index(column_id), board.column_index(over_column_id)) else {
            return DropEffect::Ignored;
        };

        let snapshot = self.mirror.snapshot();
        array_move(self.mirror.columns_mut(), from, to);

        let args = ReorderColumnsArgs {
            board_id: self.mirror.board_id(),
            column_ids: self.mirror.board().column_ids(),
        };
        self.dispatch(Mutation::ReorderColumns(args), snapshot)
    }

    fn drop_card(&mut self, card_id: u32, target_column_id: u32, over_card: Option<u32>) -> DropEffect {
        let board = self.mirror.board();
        // The mirror, not the drag payload, says where the card is now
        let Some(source_column_id) = board.column_of_card(card_id) else {
            return DropEffect::Ignored;
        };
        let Some(target) = board.column(target_column_id) else {
            return DropEffect::Ignored;
        };

        if source_column_id == target_column_id {
            if over_card == Some(card_id) {
                return DropEffect::Ignored;
            }
            let Some(from) = target.card_index(card_id) else {
                return DropEffect::Ignored;
            };
            let to = over_card
                .and_then(|over| target.card_index(over))
                .unwrap_or(target.cards.len() - 1);
            if from == to {
                return DropEffect::Ignored;
            }

            let snapshot = self.mirror.snapshot();
            let Some(index) = self.mirror.board().column_index(target_column_id) else {
                return DropEffect::Ignored;
            };
            let card_ids = {
                let column = &mut self.mirror.columns_mut()[index];
                array_move(&mut column.cards, from, to);
                column.card_ids()
            };

            let args = ReorderCardsArgs {
                board_id: self.mirror.board_id(),
                column_id: target_column_id,
                card_ids,
            };
            return self.dispatch(Mutation::ReorderCards(args), snapshot);
        }

        let Some(columns) = move_card_locally(&board.columns, card_id, source_column_id, target_column_id, over_card)
        else {
            return DropEffect::Ignored;
        };
        let ordered_card_ids = columns
            .iter()
            .find(|c| c.id == target_column_id)
            .map(|c| c.card_ids())
            .unwrap_or_default();

        let snapshot = self.mirror.snapshot();
        self.mirror.set_columns(columns);

        let args = MoveCardArgs {
            board_id: self.mirror.board_id(),
            card_id,
            target_column_id,
            ordered_card_ids,
        };
        self.dispatch(
            Mutation::MoveCard {
                source_column_id,
                args,
            },
            snapshot,
        )
    }

    fn dispatch(&mut self, mutation: Mutation, snapshot: Board) -> DropEffect {
        let key = mutation.key();
        let seq = self.queue.dispatch(mutation);
        if self.rollback == RollbackPolicy::RevertToSnapshot {
            self.snapshots.insert((key, seq), snapshot);
        }
        DropEffect::Applied { key, seq }
    }

    // ========================
    // Completions
    // ========================

    /// Apply every completion already received. Returns how many were handled.
    pub fn process_completions(&mut self) -> usize {
        let mut handled = 0;
        while let Some(completion) = self.queue.try_next() {
            self.apply_completion(completion);
            handled += 1;
        }
        handled
    }

    /// Wait for and apply the next completion. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let completion = self.queue.next().await?;
        self.apply_completion(completion.clone());
        Some(completion)
    }

    /// Wait until every dispatched mutation has completed
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    fn apply_completion(&mut self, completion: Completion) {
        let snapshot = self.snapshots.remove(&(completion.key, completion.seq));

        if self.queue.is_stale(&completion) {
            log::debug!("[RECONCILE] stale {:?}#{} discarded", completion.key, completion.seq);
            return;
        }

        let Err(error) = &completion.result else {
            log::debug!("[RECONCILE] {:?}#{} persisted", completion.key, completion.seq);
            return;
        };

        log::warn!("[RECONCILE] {:?}#{} failed: {}", completion.key, completion.seq, error);
        self.notify(NoticeLevel::Error, completion.mutation.failure_message());

        match self.rollback {
            RollbackPolicy::KeepOptimistic => {}
            RollbackPolicy::RevertToSnapshot => {
                if let Some(snapshot) = snapshot {
                    self.mirror.restore(snapshot);
                }
            }
            RollbackPolicy::MarkDirty => self.mirror.mark_dirty(),
        }
    }

    // ========================
    // Sync & Notices
    // ========================

    /// Replace the mirror with server state, dropping optimistic edits
    pub fn sync(&mut self, board: Board) {
        self.mirror.replace(board);
        self.snapshots.clear();
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push(Notice {
            level,
            message: message.to_string(),
        });
    }
}
