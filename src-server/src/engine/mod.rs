//! Reorder/Move Engine
//!
//! Turns a requested order into renormalized positions and writes the rows
//! that changed through an `OrderingStore`.

mod reorder;

#[cfg(test)]
mod tests;

pub use reorder::{ReorderEngine, ReorderOutcome};
