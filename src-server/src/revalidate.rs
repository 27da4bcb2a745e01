//! Revalidation signal
//!
//! Mutations mark read paths stale; the next fetch of a path consumes the mark.

use std::collections::BTreeSet;
use std::sync::Mutex;

pub const DASHBOARD_PATH: &str = "/dashboard";

pub fn board_path(board_id: u32) -> String {
    format!("/boards/{}", board_id)
}

#[derive(Debug, Default)]
pub struct Revalidator {
    stale: Mutex<BTreeSet<String>>,
}

impl Revalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, path: impl Into<String>) {
        if let Ok(mut stale) = self.stale.lock() {
            stale.insert(path.into());
        }
    }

    /// Dashboard and the board page
    pub fn mark_board(&self, board_id: u32) {
        self.mark(DASHBOARD_PATH);
        self.mark(board_path(board_id));
    }

    pub fn is_stale(&self, path: &str) -> bool {
        self.stale.lock().map(|s| s.contains(path)).unwrap_or(false)
    }

    /// Clear the mark for `path`; true when it was stale
    pub fn take_stale(&self, path: &str) -> bool {
        self.stale.lock().map(|mut s| s.remove(path)).unwrap_or(false)
    }

    pub fn stale_paths(&self) -> Vec<String> {
        self.stale
            .lock()
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }
}
