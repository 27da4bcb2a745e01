//! Board Mirror
//!
//! Client-local copy of one board. Owned by the reconciler; every optimistic
//! change goes through here.

use crate::models::{Board, Column};

#[derive(Debug, Clone)]
pub struct BoardMirror {
    board: Board,
    /// A write failed under the mark-dirty policy; cleared by `replace`
    dirty: bool,
}

impl BoardMirror {
    pub fn new(board: Board) -> Self {
        Self { board, dirty: false }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_id(&self) -> u32 {
        self.board.id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Deep copy for rollback
    pub fn snapshot(&self) -> Board {
        self.board.clone()
    }

    /// Put a snapshot back. The dirty flag is left alone.
    pub fn restore(&mut self, snapshot: Board) {
        self.board = snapshot;
    }

    /// Resync with server state: optimistic edits and the dirty flag are dropped
    pub fn replace(&mut self, board: Board) {
        self.board = board;
        self.dirty = false;
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.board.columns = columns;
    }

    pub fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.board.columns
    }
}
