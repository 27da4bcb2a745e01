//! Sibling reorders and cross-column card moves.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{allocate, ChildKind, ChildRow, Container, DomainError, DomainResult, Position};
use crate::repository::OrderingStore;

/// Final assignments of a reorder or move
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderOutcome {
    /// `(id, position)` in the new display order
    pub assignments: Vec<(u32, Position)>,
    /// Rows actually written to the store
    pub written: usize,
}

impl ReorderOutcome {
    pub fn position_of(&self, id: u32) -> Option<Position> {
        self.assignments.iter().find(|(i, _)| *i == id).map(|(_, p)| *p)
    }
}

pub struct ReorderEngine<S: OrderingStore> {
    store: Arc<S>,
}

impl<S: OrderingStore> Clone for ReorderEngine<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: OrderingStore> ReorderEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Renormalize `container` so its children follow `ordered_ids`.
    ///
    /// Children missing from `ordered_ids` keep their relative order after the
    /// requested ones. Only rows whose position changes are written.
    pub async fn reorder_siblings(&self, container: Container, ordered_ids: &[u32]) -> DomainResult<ReorderOutcome> {
        if ordered_ids.is_empty() {
            log::debug!("Empty reorder of {}, nothing to do", container);
            return Ok(ReorderOutcome::default());
        }

        let current = self.store.list_children(container).await?;
        if let Some(&id) = ordered_ids.iter().find(|id| !current.iter().any(|row| row.id == **id)) {
            log::warn!("Reorder of {} rejected: {} is not a child", container, id);
            return Err(DomainError::UnknownChild { container, id });
        }

        let requested: HashSet<u32> = ordered_ids.iter().copied().collect();
        let mut full_order = ordered_ids.to_vec();
        full_order.extend(current.iter().map(|row| row.id).filter(|id| !requested.contains(id)));

        let positions = allocate(&full_order)?;
        let changed: Vec<ChildRow> = current
            .iter()
            .filter_map(|row| {
                let position = positions.get(row.id)?;
                (position != row.position).then(|| ChildRow { position, ..row.clone() })
            })
            .collect();

        self.write(container.child_kind(), &changed).await?;
        log::info!("Reordered {}: {} of {} row(s) written", container, changed.len(), current.len());

        Ok(ReorderOutcome {
            assignments: positions.into_vec(),
            written: changed.len(),
        })
    }

    /// Move `card_id` into `target_column_id` so the target reads `target_ordered_ids`.
    ///
    /// `card_id` is appended when the order does not mention it. Every other id
    /// must already be in the target column; target cards the order leaves out
    /// follow the requested ones. The source column keeps its remaining
    /// positions. A move within one column is a plain reorder of that column.
    pub async fn move_across_containers(
        &self,
        card_id: u32,
        source_column_id: u32,
        target_column_id: u32,
        target_ordered_ids: &[u32],
    ) -> DomainResult<ReorderOutcome> {
        let target = Container::Column(target_column_id);

        let mut seen = HashSet::new();
        let mut ordered: Vec<u32> = target_ordered_ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if !seen.contains(&card_id) {
            ordered.push(card_id);
        }

        if source_column_id == target_column_id {
            return self.reorder_siblings(target, &ordered).await;
        }

        let current = self.store.list_children(target).await?;
        if let Some(&id) = ordered
            .iter()
            .find(|id| **id != card_id && !current.iter().any(|row| row.id == **id))
        {
            log::warn!("Move into {} rejected: card {} is not in the target column", target, id);
            return Err(DomainError::UnknownChild { container: target, id });
        }

        let mut rows = current;
        if !rows.iter().any(|row| row.id == card_id) {
            let Some(moving) = self.store.find_rows(ChildKind::Card, &[card_id]).await?.into_iter().next() else {
                log::warn!("Move into {} rejected: card {} does not exist", target, card_id);
                return Err(DomainError::UnknownChild { container: target, id: card_id });
            };
            rows.push(moving);
        }

        let requested: HashSet<u32> = ordered.iter().copied().collect();
        let omitted: Vec<u32> = rows.iter().map(|row| row.id).filter(|id| !requested.contains(id)).collect();
        ordered.extend(omitted);

        let positions = allocate(&ordered)?;
        let changed: Vec<ChildRow> = rows
            .iter()
            .filter_map(|row| {
                let position = positions.get(row.id)?;
                let unchanged = position == row.position && row.parent_id == target_column_id;
                (!unchanged).then(|| ChildRow {
                    parent_id: target_column_id,
                    position,
                    ..row.clone()
                })
            })
            .collect();

        self.write(ChildKind::Card, &changed).await?;
        log::info!(
            "Moved card {} from column {} to column {}: {} row(s) written",
            card_id,
            source_column_id,
            target_column_id,
            changed.len()
        );

        Ok(ReorderOutcome {
            assignments: positions.into_vec(),
            written: changed.len(),
        })
    }

    async fn write(&self, kind: ChildKind, rows: &[ChildRow]) -> DomainResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.store.upsert_batch(kind, rows).await.map_err(|e| {
            log::error!("Failed to write {} {} row(s): {}", rows.len(), kind.table(), e);
            match e {
                DomainError::Persistence(_) => e,
                other => DomainError::Persistence(other.to_string()),
            }
        })
    }
}
