//! Cascading deletes
//!
//! Board → Columns → Cards and Column → Cards, in one transaction.
//! Foreign keys also cascade, but descendants are removed explicitly so the
//! result does not depend on the `foreign_keys` pragma.

use rusqlite::{params, Connection};

use super::db::{not_initialized, persistence, SharedConnection};
use crate::domain::{DomainResult, EntityRef};

/// Delete `entity` and its descendants. Returns how many rows of the entity itself were removed.
fn delete_in(conn: &Connection, entity: EntityRef) -> rusqlite::Result<usize> {
    match entity {
        EntityRef::Board(id) => {
            conn.execute(
                "DELETE FROM cards WHERE column_id IN (SELECT id FROM columns WHERE board_id = ?)",
                params![id],
            )?;
            conn.execute("DELETE FROM columns WHERE board_id = ?", params![id])?;
            conn.execute("DELETE FROM boards WHERE id = ?", params![id])
        }
        EntityRef::Column(id) => {
            conn.execute("DELETE FROM cards WHERE column_id = ?", params![id])?;
            conn.execute("DELETE FROM columns WHERE id = ?", params![id])
        }
        EntityRef::Card(id) => conn.execute("DELETE FROM cards WHERE id = ?", params![id]),
    }
}

pub(crate) async fn delete_cascade(conn: &SharedConnection, entity: EntityRef) -> DomainResult<usize> {
    let mut guard = conn.lock().await;
    let conn = guard.as_mut().ok_or_else(not_initialized)?;

    let tx = conn.transaction().map_err(persistence)?;
    let removed = delete_in(&tx, entity).map_err(persistence)?;
    tx.commit().map_err(persistence)?;

    log::debug!("Deleted {:?} ({} row)", entity, removed);
    Ok(removed)
}
