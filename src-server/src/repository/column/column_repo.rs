//! Column Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Column CRUD operations.
//! Position management lives in column_positioning.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use super::super::cascade::delete_cascade;
use super::super::db::{internal, not_initialized, now_millis, persistence, SharedConnection};
use super::super::traits::Repository;
use crate::domain::{next_position, Column, DomainError, DomainResult, EntityRef};

pub(super) const COLUMN_FIELDS: &str = "id, board_id, name, position, created_at, updated_at";

/// SQLite implementation of Column repository
#[derive(Clone)]
pub struct ColumnRepository {
    pub(super) conn: SharedConnection,
}

impl ColumnRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Columns of a board ordered by position
    pub async fn list_by_board(&self, board_id: u32) -> DomainResult<Vec<Column>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM columns WHERE board_id = ? ORDER BY position, id",
                COLUMN_FIELDS
            ))
            .map_err(internal)?;
        let mut rows = stmt.query(params![board_id]).map_err(internal)?;

        let mut columns = Vec::new();
        while let Some(row) = rows.next().map_err(internal)? {
            columns.push(row_to_column(row)?);
        }
        Ok(columns)
    }
}

#[async_trait]
impl Repository<Column> for ColumnRepository {
    /// Insert a column. A zero position means "append".
    async fn create(&self, entity: &Column) -> DomainResult<Column> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Calculate position in same connection
        let position = if entity.position == 0 {
            let max: Option<i64> = conn
                .query_row(
                    "SELECT MAX(position) FROM columns WHERE board_id = ?",
                    params![entity.board_id],
                    |row| row.get(0),
                )
                .map_err(internal)?;
            next_position(max)
        } else {
            entity.position
        };

        let now = now_millis();
        conn.execute(
            "INSERT INTO columns (board_id, name, position, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![entity.board_id, entity.name, position, now, now],
        )
        .map_err(persistence)?;

        let mut column = entity.clone();
        column.id = conn.last_insert_rowid() as u32;
        column.position = position;
        column.created_at = now;
        column.updated_at = now;
        Ok(column)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Column>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!("SELECT {} FROM columns WHERE id = ?", COLUMN_FIELDS),
            params![id],
            |row| Ok(row_to_column(row)),
        )
        .optional()
        .map_err(internal)?
        .transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Column>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM columns ORDER BY board_id, position, id", COLUMN_FIELDS))
            .map_err(internal)?;
        let mut rows = stmt.query([]).map_err(internal)?;

        let mut columns = Vec::new();
        while let Some(row) = rows.next().map_err(internal)? {
            columns.push(row_to_column(row)?);
        }
        Ok(columns)
    }

    async fn update(&self, entity: &Column) -> DomainResult<Column> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = now_millis();
        let changed = conn
            .execute(
                "UPDATE columns SET board_id = ?, name = ?, position = ?, updated_at = ? WHERE id = ?",
                params![entity.board_id, entity.name, entity.position, now, entity.id],
            )
            .map_err(persistence)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Column {} not found", entity.id)));
        }

        let mut column = entity.clone();
        column.updated_at = now;
        Ok(column)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        delete_cascade(&self.conn, EntityRef::Column(id)).await?;
        Ok(())
    }
}

/// Convert a database row to Column
pub(crate) fn row_to_column(row: &rusqlite::Row) -> DomainResult<Column> {
    let malformed = |e: rusqlite::Error| DomainError::malformed("columns", e);
    Ok(Column {
        id: row.get(0).map_err(malformed)?,
        board_id: row.get(1).map_err(malformed)?,
        name: row.get(2).map_err(malformed)?,
        position: row.get(3).map_err(malformed)?,
        created_at: row.get(4).map_err(malformed)?,
        updated_at: row.get(5).map_err(malformed)?,
    })
}
