//! Containers and the rows the ordering store moves around.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::position::Position;

/// An entity owning an ordered set of children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Container {
    /// Board holding columns
    Board(u32),
    /// Column holding cards
    Column(u32),
}

impl Container {
    pub fn id(&self) -> u32 {
        match *self {
            Container::Board(id) | Container::Column(id) => id,
        }
    }

    pub fn child_kind(&self) -> ChildKind {
        match self {
            Container::Board(_) => ChildKind::Column,
            Container::Column(_) => ChildKind::Card,
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Board(id) => write!(f, "board {}", id),
            Container::Column(id) => write!(f, "column {}", id),
        }
    }
}

/// Kind of ordered child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildKind {
    Column,
    Card,
}

impl ChildKind {
    pub fn table(&self) -> &'static str {
        match self {
            ChildKind::Column => "columns",
            ChildKind::Card => "cards",
        }
    }
}

/// Target of a cascading delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Board(u32),
    Column(u32),
    Card(u32),
}

/// Non-ordering columns carried through a full-row upsert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarriedFields {
    Column { name: String },
    Card { title: String, content: Option<String> },
}

impl CarriedFields {
    pub fn kind(&self) -> ChildKind {
        match self {
            CarriedFields::Column { .. } => ChildKind::Column,
            CarriedFields::Card { .. } => ChildKind::Card,
        }
    }
}

/// One ordered child as seen by the ordering store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRow {
    pub id: u32,
    pub parent_id: u32,
    pub position: Position,
    pub fields: CarriedFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_child_kind() {
        assert_eq!(Container::Board(1).child_kind(), ChildKind::Column);
        assert_eq!(Container::Column(1).child_kind(), ChildKind::Card);
        assert_eq!(Container::Column(4).to_string(), "column 4");
    }
}
