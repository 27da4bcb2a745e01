//! SQLite Ordering Store
//!
//! `OrderingStore` over the column and card repositories. Each call takes the
//! shared connection lock once; upserts run in a single transaction.

use async_trait::async_trait;

use super::card::{CardPositioningOperations, CardRepository};
use super::cascade;
use super::column::{ColumnPositioningOperations, ColumnRepository};
use super::db::SharedConnection;
use super::traits::OrderingStore;
use crate::domain::{ChildKind, ChildRow, Container, DomainError, DomainResult, EntityRef};

#[derive(Clone)]
pub struct SqliteOrderingStore {
    conn: SharedConnection,
    columns: ColumnRepository,
    cards: CardRepository,
}

impl SqliteOrderingStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            columns: ColumnRepository::new(conn.clone()),
            cards: CardRepository::new(conn.clone()),
            conn,
        }
    }
}

#[async_trait]
impl OrderingStore for SqliteOrderingStore {
    async fn list_children(&self, container: Container) -> DomainResult<Vec<ChildRow>> {
        match container {
            Container::Board(board_id) => self.columns.list_ordered_rows(board_id).await,
            Container::Column(column_id) => self.cards.list_ordered_rows(column_id).await,
        }
    }

    async fn find_rows(&self, kind: ChildKind, ids: &[u32]) -> DomainResult<Vec<ChildRow>> {
        match kind {
            ChildKind::Column => ColumnPositioningOperations::find_rows(&self.columns, ids).await,
            ChildKind::Card => CardPositioningOperations::find_rows(&self.cards, ids).await,
        }
    }

    async fn upsert_batch(&self, kind: ChildKind, rows: &[ChildRow]) -> DomainResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        if let Some(row) = rows.iter().find(|r| r.fields.kind() != kind) {
            return Err(DomainError::InvalidInput(format!(
                "row {} does not belong in {}",
                row.id,
                kind.table()
            )));
        }

        let result = match kind {
            ChildKind::Column => self.columns.upsert_rows(rows).await,
            ChildKind::Card => self.cards.upsert_rows(rows).await,
        };
        // Every write failure reaching the engine is a persistence failure
        result.map_err(|e| match e {
            DomainError::Persistence(_) | DomainError::InvalidInput(_) => e,
            other => DomainError::Persistence(other.to_string()),
        })?;

        log::debug!("Upserted {} {} row(s)", rows.len(), kind.table());
        Ok(())
    }

    async fn delete_cascade(&self, entity: EntityRef) -> DomainResult<()> {
        cascade::delete_cascade(&self.conn, entity).await?;
        Ok(())
    }
}
