//! Card Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Card CRUD operations.
//! Position management lives in card_positioning.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use super::super::cascade::delete_cascade;
use super::super::db::{internal, not_initialized, now_millis, persistence, SharedConnection};
use super::super::traits::Repository;
use crate::domain::{next_position, Card, DomainError, DomainResult, EntityRef};

const CARD_FIELDS: &str = "id, column_id, title, content, position, created_at, updated_at";

/// SQLite implementation of Card repository
#[derive(Clone)]
pub struct CardRepository {
    pub(super) conn: SharedConnection,
}

impl CardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Cards of a column ordered by position
    pub async fn list_by_column(&self, column_id: u32) -> DomainResult<Vec<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM cards WHERE column_id = ? ORDER BY position, id",
                CARD_FIELDS
            ))
            .map_err(internal)?;
        let mut rows = stmt.query(params![column_id]).map_err(internal)?;

        let mut cards = Vec::new();
        while let Some(row) = rows.next().map_err(internal)? {
            cards.push(row_to_card(row)?);
        }
        Ok(cards)
    }

    /// Board owning the card's column
    pub async fn board_id_of(&self, card_id: u32) -> DomainResult<Option<u32>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            "SELECT c.board_id FROM cards k JOIN columns c ON k.column_id = c.id WHERE k.id = ?",
            params![card_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(internal)
    }
}

#[async_trait]
impl Repository<Card> for CardRepository {
    /// Insert a card. A zero position means "append".
    async fn create(&self, entity: &Card) -> DomainResult<Card> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let position = if entity.position == 0 {
            let max: Option<i64> = conn
                .query_row(
                    "SELECT MAX(position) FROM cards WHERE column_id = ?",
                    params![entity.column_id],
                    |row| row.get(0),
                )
                .map_err(internal)?;
            next_position(max)
        } else {
            entity.position
        };

        let now = now_millis();
        conn.execute(
            "INSERT INTO cards (column_id, title, content, position, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
            params![entity.column_id, entity.title, entity.content, position, now, now],
        )
        .map_err(persistence)?;

        let mut card = entity.clone();
        card.id = conn.last_insert_rowid() as u32;
        card.position = position;
        card.created_at = now;
        card.updated_at = now;
        Ok(card)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!("SELECT {} FROM cards WHERE id = ?", CARD_FIELDS),
            params![id],
            |row| Ok(row_to_card(row)),
        )
        .optional()
        .map_err(internal)?
        .transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM cards ORDER BY column_id, position, id", CARD_FIELDS))
            .map_err(internal)?;
        let mut rows = stmt.query([]).map_err(internal)?;

        let mut cards = Vec::new();
        while let Some(row) = rows.next().map_err(internal)? {
            cards.push(row_to_card(row)?);
        }
        Ok(cards)
    }

    async fn update(&self, entity: &Card) -> DomainResult<Card> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = now_millis();
        let changed = conn
            .execute(
                "UPDATE cards SET column_id = ?, title = ?, content = ?, position = ?, updated_at = ? WHERE id = ?",
                params![entity.column_id, entity.title, entity.content, entity.position, now, entity.id],
            )
            .map_err(persistence)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Card {} not found", entity.id)));
        }

        let mut card = entity.clone();
        card.updated_at = now;
        Ok(card)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        delete_cascade(&self.conn, EntityRef::Card(id)).await?;
        Ok(())
    }
}

/// Convert a database row to Card
pub(crate) fn row_to_card(row: &rusqlite::Row) -> DomainResult<Card> {
    let malformed = |e: rusqlite::Error| DomainError::malformed("cards", e);
    Ok(Card {
        id: row.get(0).map_err(malformed)?,
        column_id: row.get(1).map_err(malformed)?,
        title: row.get(2).map_err(malformed)?,
        content: row.get(3).map_err(malformed)?,
        position: row.get(4).map_err(malformed)?,
        created_at: row.get(5).map_err(malformed)?,
        updated_at: row.get(6).map_err(malformed)?,
    })
}
