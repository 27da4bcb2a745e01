//! Card Positioning Operations
//!
//! Operations for managing card positions within a column and the
//! full-row upsert used by reorders and cross-column moves.

use async_trait::async_trait;
use rusqlite::{params, params_from_iter};

use super::super::db::{internal, not_initialized, now_millis, persistence, placeholders};
use crate::domain::{next_position, CarriedFields, ChildRow, DomainError, DomainResult, Position};

/// Trait for card positioning operations
#[async_trait]
pub trait CardPositioningOperations {
    /// Append position for a new card in `column_id`
    async fn get_next_position(&self, column_id: u32) -> DomainResult<Position>;

    /// Cards of a column as ordering rows, ascending by position
    async fn list_ordered_rows(&self, column_id: u32) -> DomainResult<Vec<ChildRow>>;

    /// Ordering rows for the given card ids, regardless of column
    async fn find_rows(&self, ids: &[u32]) -> DomainResult<Vec<ChildRow>>;

    /// Upsert rows by id in one transaction; title and content are carried along
    async fn upsert_rows(&self, rows: &[ChildRow]) -> DomainResult<()>;
}

#[async_trait]
impl CardPositioningOperations for super::card_repo::CardRepository {
    async fn get_next_position(&self, column_id: u32) -> DomainResult<Position> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let max: Option<Position> = conn
            .query_row(
                "SELECT MAX(position) FROM cards WHERE column_id = ?",
                params![column_id],
                |row| row.get(0),
            )
            .map_err(internal)?;
        Ok(next_position(max))
    }

    async fn list_ordered_rows(&self, column_id: u32) -> DomainResult<Vec<ChildRow>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, column_id, position, title, content FROM cards
                 WHERE column_id = ? ORDER BY position, id",
            )
            .map_err(internal)?;
        let mut rows = stmt.query(params![column_id]).map_err(internal)?;

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
            "SELECT id, column_id, position, title, content FROM cards WHERE id IN ({})",
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
                    "INSERT INTO cards (id, column_id, title, content, position, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                     ON CONFLICT(id) DO UPDATE SET
                        column_id = excluded.column_id,
                        title = excluded.title,
                        content = excluded.content,
                        position = excluded.position,
                        updated_at = excluded.updated_at",
                )
                .map_err(persistence)?;

            for row in rows {
                let CarriedFields::Card { title, content } = &row.fields else {
                    return Err(DomainError::InvalidInput(format!("row {} is not a card", row.id)));
                };
                stmt.execute(params![row.id, row.parent_id, title, content, row.position, now])
                    .map_err(persistence)?;
            }
        }
        tx.commit().map_err(persistence)?;

        Ok(())
    }
}

fn row_to_child(row: &rusqlite::Row) -> DomainResult<ChildRow> {
    let malformed = |e: rusqlite::Error| DomainError::malformed("cards", e);
    Ok(ChildRow {
        id: row.get(0).map_err(malformed)?,
        parent_id: row.get(1).map_err(malformed)?,
        position: row.get(2).map_err(malformed)?,
        fields: CarriedFields::Card {
            title: row.get(3).map_err(malformed)?,
            content: row.get(4).map_err(malformed)?,
        },
    })
}
