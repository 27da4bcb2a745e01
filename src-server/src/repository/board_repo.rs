//! Board Repository
//!
//! SQLite-backed Board CRUD plus the owner-scoped read models
//! (board detail with columns and cards, dashboard summary).

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use super::card::row_to_card;
use super::cascade::delete_cascade;
use super::column::row_to_column;
use super::db::{internal, not_initialized, now_millis, persistence, SharedConnection};
use super::traits::Repository;
use crate::domain::{
    Board, BoardWithColumns, DashboardSummary, DomainError, DomainResult, EntityRef, LatestBoard,
};

const BOARD_FIELDS: &str = "id, name, description, user_id, created_at, updated_at";

/// SQLite implementation of Board repository
#[derive(Clone)]
pub struct BoardRepository {
    conn: SharedConnection,
}

impl BoardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Boards owned by `user_id`, oldest first
    pub async fn list_by_owner(&self, user_id: &str) -> DomainResult<Vec<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM boards WHERE user_id = ? ORDER BY created_at ASC, id ASC",
                BOARD_FIELDS
            ))
            .map_err(internal)?;
        let mut rows = stmt.query(params![user_id]).map_err(internal)?;

        let mut boards = Vec::new();
        while let Some(row) = rows.next().map_err(internal)? {
            boards.push(row_to_board(row)?);
        }
        Ok(boards)
    }

    /// Board with its columns and cards, each sorted by position
    pub async fn find_with_relations(&self, board_id: u32) -> DomainResult<Option<BoardWithColumns>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let board = conn
            .query_row(
                &format!("SELECT {} FROM boards WHERE id = ?", BOARD_FIELDS),
                params![board_id],
                |row| Ok(row_to_board(row)),
            )
            .optional()
            .map_err(internal)?
            .transpose()?;

        let Some(board) = board else {
            return Ok(None);
        };

        let mut columns = Vec::new();
        {
            let mut stmt = conn
                .prepare(
                    "SELECT id, board_id, name, position, created_at, updated_at
                     FROM columns WHERE board_id = ? ORDER BY position, id",
                )
                .map_err(internal)?;
            let mut rows = stmt.query(params![board_id]).map_err(internal)?;
            while let Some(row) = rows.next().map_err(internal)? {
                columns.push(row_to_column(row)?);
            }
        }

        let mut cards = Vec::new();
        {
            let mut stmt = conn
                .prepare(
                    "SELECT k.id, k.column_id, k.title, k.content, k.position, k.created_at, k.updated_at
                     FROM cards k JOIN columns c ON k.column_id = c.id
                     WHERE c.board_id = ? ORDER BY k.position, k.id",
                )
                .map_err(internal)?;
            let mut rows = stmt.query(params![board_id]).map_err(internal)?;
            while let Some(row) = rows.next().map_err(internal)? {
                cards.push(row_to_card(row)?);
            }
        }

        Ok(Some(BoardWithColumns::assemble(board, columns, cards)))
    }

    /// Totals across the owner's boards plus the newest board
    pub async fn summary(&self, user_id: &str) -> DomainResult<DashboardSummary> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let count = |sql: &str| -> DomainResult<u32> {
            conn.query_row(sql, params![user_id], |row| row.get::<_, u32>(0))
                .map_err(internal)
        };

        let total_boards = count("SELECT COUNT(*) FROM boards WHERE user_id = ?")?;
        let total_columns = count(
            "SELECT COUNT(*) FROM columns c JOIN boards b ON c.board_id = b.id WHERE b.user_id = ?",
        )?;
        let total_cards = count(
            "SELECT COUNT(*) FROM cards k
             JOIN columns c ON k.column_id = c.id
             JOIN boards b ON c.board_id = b.id
             WHERE b.user_id = ?",
        )?;

        let latest_board = conn
            .query_row(
                "SELECT id, name, created_at FROM boards WHERE user_id = ?
                 ORDER BY created_at DESC, id DESC LIMIT 1",
                params![user_id],
                |row| {
                    Ok(LatestBoard {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| DomainError::malformed("boards", e))?;

        Ok(DashboardSummary {
            total_boards,
            total_columns,
            total_cards,
            latest_board,
        })
    }
}

#[async_trait]
impl Repository<Board> for BoardRepository {
    async fn create(&self, entity: &Board) -> DomainResult<Board> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = now_millis();
        conn.execute(
            "INSERT INTO boards (name, description, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![entity.name, entity.description, entity.user_id, now, now],
        )
        .map_err(persistence)?;

        let mut board = entity.clone();
        board.id = conn.last_insert_rowid() as u32;
        board.created_at = now;
        board.updated_at = now;
        Ok(board)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!("SELECT {} FROM boards WHERE id = ?", BOARD_FIELDS),
            params![id],
            |row| Ok(row_to_board(row)),
        )
        .optional()
        .map_err(internal)?
        .transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM boards ORDER BY created_at ASC, id ASC", BOARD_FIELDS))
            .map_err(internal)?;
        let mut rows = stmt.query([]).map_err(internal)?;

        let mut boards = Vec::new();
        while let Some(row) = rows.next().map_err(internal)? {
            boards.push(row_to_board(row)?);
        }
        Ok(boards)
    }

    async fn update(&self, entity: &Board) -> DomainResult<Board> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = now_millis();
        let changed = conn
            .execute(
                "UPDATE boards SET name = ?, description = ?, updated_at = ? WHERE id = ?",
                params![entity.name, entity.description, now, entity.id],
            )
            .map_err(persistence)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Board {} not found", entity.id)));
        }

        let mut board = entity.clone();
        board.updated_at = now;
        Ok(board)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        delete_cascade(&self.conn, EntityRef::Board(id)).await?;
        Ok(())
    }
}

/// Convert a database row to Board
pub(crate) fn row_to_board(row: &rusqlite::Row) -> DomainResult<Board> {
    let malformed = |e: rusqlite::Error| DomainError::malformed("boards", e);
    Ok(Board {
        id: row.get(0).map_err(malformed)?,
        name: row.get(1).map_err(malformed)?,
        description: row.get(2).map_err(malformed)?,
        user_id: row.get(3).map_err(malformed)?,
        created_at: row.get(4).map_err(malformed)?,
        updated_at: row.get(5).map_err(malformed)?,
    })
}
