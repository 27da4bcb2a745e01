//! Commands Layer
//!
//! One async handler per user action. Each takes the shared `AppState` and the
//! authenticated caller, checks board ownership and marks read paths stale.

mod access;
mod board_cmd;
mod column_cmd;
mod card_cmd;
mod ai_cmd;


pub use board_cmd::*;
pub use column_cmd::*;
pub use card_cmd::*;
pub use ai_cmd::*;
