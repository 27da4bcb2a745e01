//! Position Allocator
//!
//! Sparse integer position keys for ordered siblings. Positions step by
//! 1000 starting at 1000; every reorder renormalizes the whole container.

use std::collections::HashSet;
use std::hash::Hash;

use super::entity::{DomainError, DomainResult};

pub type Position = i64;

/// Gap between consecutive siblings after renormalization
pub const POSITION_STEP: Position = 1000;

/// Ordered id -> position assignments, in the order they were allocated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMap<I> {
    entries: Vec<(I, Position)>,
}

impl<I: Copy + Eq> PositionMap<I> {
    pub fn get(&self, id: I) -> Option<Position> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, p)| *p)
    }

    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.entries.iter().map(|(i, _)| *i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(I, Position)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<(I, Position)> {
        self.entries
    }
}

/// Assign `(i + 1) * 1000` to the i-th id of `ordered`.
///
/// Duplicates keep their first occurrence. An empty input is rejected;
/// callers skip persistence for empty reorders instead.
pub fn allocate<I: Copy + Eq + Hash>(ordered: &[I]) -> DomainResult<PositionMap<I>> {
    if ordered.is_empty() {
        return Err(DomainError::InvalidInput("cannot allocate positions for an empty order".to_string()));
    }

    let mut seen = HashSet::with_capacity(ordered.len());
    let entries = ordered
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .enumerate()
        .map(|(index, id)| (id, (index as Position + 1) * POSITION_STEP))
        .collect();

    Ok(PositionMap { entries })
}

/// Append position for a new sibling: current max + 1000, or 1000 when empty
pub fn next_position(current_max: Option<Position>) -> Position {
    current_max.map_or(POSITION_STEP, |max| max + POSITION_STEP)
}
