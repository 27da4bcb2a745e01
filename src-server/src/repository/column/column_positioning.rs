//! Column Positioning Operations
//!
//! Operations for managing column positions within their board.

use async_trait::async_trait;
use rusqlite::{params, params_from_iter};

use super::super::db::{internal, not_initialized, now_millis, persistence, placeholders};
use crate::domain::{next_position, CarriedFields, ChildRow, DomainError, DomainResult, Position};

/// Trait for column positioning operations
#[async_trait]
pub trait ColumnPositioningOperations {
    /// Append position for a new column on `board_id`
    async fn get_next_position(&self, board_id: u32) -> DomainResult<Position>;

    /// Columns of a board as ordering rows, ascending by position
    async fn list_ordered_rows(&self, board_id: u32) -> DomainResult<Vec<ChildRow>>;

    /// Ordering rows for the given column ids
    async fn find_rows(&self, ids: &[u32]) -> DomainResult<Vec<ChildRow>>;

    /// Upsert rows by id in one transaction
    async fn upsert_rows(&self, rows: &[ChildRow]) -> DomainResult<()>;
}

#[async_trait]
impl ColumnPositioningOperations for super::column_repo::ColumnRepository {
    async fn get_next_position(&self, board_id: u32) -> DomainResult<Position> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let max: Option<Position> = conn
            .query_row(
                "SELECT MAX(position) FROM columns WHERE board_id = ?",
                params![board_id],
                |row| row.get(0),
            )
            .map_err(internal)?;
        Ok(next_position(max))
    }

    async fn list_ordered_rows(&self, board_id: u32) -> DomainResult<Vec<ChildRow>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, board_id, position, name FROM columns WHERE board_id = ? ORDER BY position, id")
            .map_err(internal)?;
        let mut rows = stmt.query(params![board_id]).map_err(internal)?;

        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(internal)? {
            result.push(row_to_child(row)?);
        }
        Ok(result)
    }

    async fn find_rows(&self, ids: &[u32]) -> DomainResult<Vec<ChildRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let sql = format!(
            "SELECT id, board_id, position, name FROM columns WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut stmt = conn.prepare(&sql).map_err(internal)?;
        let mut rows = stmt.query(params_from_iter(ids.iter())).map_err(internal)?;

        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(internal)? {
            result.push(row_to_child(row)?);
        }
        Ok(result)
    }

    async fn upsert_rows(&self, rows: &[ChildRow]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let now = now_millis();
        let tx = conn.transaction().map_err(persistence)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO columns (id, board_id, name, position, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                        board_id = excluded.board_id,
                        name = excluded.name,
                        position = excluded.position,
                        updated_at = excluded.updated_at",
                )
                .map_err(persistence)?;

            for row in rows {
                let CarriedFields::Column { name } = &row.fields else {
                    return Err(DomainError::InvalidInput(format!("row {} is not a column", row.id)));
                };
                stmt.execute(params![row.id, row.parent_id, name, row.position, now])
                    .map_err(persistence)?;
            }
        }
        tx.commit().map_err(persistence)?;

        Ok(())
    }
}

fn row_to_child(row: &rusqlite::Row) -> DomainResult<ChildRow> {
    let malformed = |e: rusqlite::Error| DomainError::malformed("columns", e);
    Ok(ChildRow {
        id: row.get(0).map_err(malformed)?,
        parent_id: row.get(1).map_err(malformed)?,
        position: row.get(2).map_err(malformed)?,
        fields: CarriedFields::Column {
            name: row.get(3).map_err(malformed)?,
        },
    })
}
