//! Kanban DragDrop
//!
//! Pointer-driven drag-and-drop gesture tracking for board columns and cards.
//! Uses a movement threshold to distinguish click from drag.

use serde::{Deserialize, Serialize};

/// Movement in pixels before a pressed item starts dragging
pub const DRAG_THRESHOLD_PX: i32 = 8;

/// What is being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragItem {
    Column(u32),
    Card { card_id: u32, column_id: u32 },
}

/// What the pointer is currently over
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// Column header or column background
    Column(u32),
    /// A card inside a column
    Card { card_id: u32, column_id: u32 },
}

impl DropTarget {
    /// Column the target lives in
    pub fn column_id(&self) -> u32 {
        match *self {
            DropTarget::Column(id) => id,
            DropTarget::Card { column_id, .. } => column_id,
        }
    }
}

/// Gesture state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// Pressed but not moved past the threshold yet
    Pending { item: DragItem, start_x: i32, start_y: i32 },
    Dragging { item: DragItem, over: Option<DropTarget> },
}

/// Result of releasing the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing was pressed
    None,
    /// Released before the threshold: a plain click on the item
    Click(DragItem),
    /// Released outside any valid target
    Cancelled(DragItem),
    Dropped { item: DragItem, target: DropTarget },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DragError {
    #[error("a drag gesture is already in progress")]
    Busy,
}

/// Drag session for one board view
#[derive(Clone, Debug)]
pub struct DragSession {
    state: DragState,
    threshold: i32,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DragSession {
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD_PX)
    }

    pub fn with_threshold(threshold: i32) -> Self {
        Self {
            state: DragState::Idle,
            threshold: threshold.max(0),
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Item being dragged (not merely pressed)
    pub fn dragging(&self) -> Option<DragItem> {
        match self.state {
            DragState::Dragging { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Pointer pressed on a draggable item. Records a pending drag with start position.
    pub fn press(&mut self, item: DragItem, x: i32, y: i32) -> Result<(), DragError> {
        if self.state != DragState::Idle {
            return Err(DragError::Busy);
        }
        self.state = DragState::Pending { item, start_x: x, start_y: y };
        Ok(())
    }

    /// Pointer moved. Returns true when this move started the drag.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        if let DragState::Pending { item, start_x, start_y } = self.state {
            let dx = (x - start_x).abs();
            let dy = (y - start_y).abs();
            if dx > self.threshold || dy > self.threshold {
                log::debug!("[DND] drag started: {:?}", item);
                self.state = DragState::Dragging { item, over: None };
                return true;
            }
        }
        false
    }

    /// Pointer entered a target (or left all targets with `None`)
    pub fn hover(&mut self, target: Option<DropTarget>) {
        if let DragState::Dragging { item, .. } = self.state {
            // Don't allow dropping on self
            let target = target.filter(|t| !is_self(item, *t));
            self.state = DragState::Dragging { item, over: target };
        }
    }

    /// Pointer released. Always returns the session to `Idle`.
    pub fn release(&mut self) -> DropOutcome {
        let outcome = match self.state {
            DragState::Idle => DropOutcome::None,
            DragState::Pending { item, .. } => DropOutcome::Click(item),
            DragState::Dragging { item, over: Some(target) } => DropOutcome::Dropped { item, target },
            DragState::Dragging { item, over: None } => DropOutcome::Cancelled(item),
        };
        self.state = DragState::Idle;
        outcome
    }

    /// Abort the gesture (e.g. Escape)
    pub fn cancel(&mut self) -> DropOutcome {
        let outcome = match self.state {
            DragState::Idle => DropOutcome::None,
            DragState::Pending { item, .. } | DragState::Dragging { item, .. } => {
                DropOutcome::Cancelled(item)
            }
        };
        self.state = DragState::Idle;
        outcome
    }
}

fn is_self(item: DragItem, target: DropTarget) -> bool {
    match (item, target) {
        (DragItem::Card { card_id, .. }, DropTarget::Card { card_id: over, .. }) => card_id == over,
        _ => false,
    }
}
