//! Engine Tests
//!
//! Runs the engine against an in-memory ordering store that records calls.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::domain::{
        CarriedFields, ChildKind, ChildRow, Container, DomainError, DomainResult, EntityRef, Position,
    };
    use crate::engine::ReorderEngine;
    use crate::repository::OrderingStore;

    #[derive(Default)]
    struct MemoryStore {
        cards: Mutex<BTreeMap<u32, ChildRow>>,
        columns: Mutex<BTreeMap<u32, ChildRow>>,
        reads: AtomicUsize,
        writes: Mutex<Vec<Vec<ChildRow>>>,
        fail_writes: AtomicBool,
    }

    impl MemoryStore {
        fn table(&self, kind: ChildKind) -> &Mutex<BTreeMap<u32, ChildRow>> {
            match kind {
                ChildKind::Column => &self.columns,
                ChildKind::Card => &self.cards,
            }
        }

        fn add_card(&self, id: u32, column_id: u32, position: Position) {
            self.cards.lock().unwrap().insert(
                id,
                ChildRow {
                    id,
                    parent_id: column_id,
                    position,
                    fields: CarriedFields::Card { title: format!("card {}", id), content: None },
                },
            );
        }

        fn add_column(&self, id: u32, board_id: u32, position: Position) {
            self.columns.lock().unwrap().insert(
                id,
                ChildRow {
                    id,
                    parent_id: board_id,
                    position,
                    fields: CarriedFields::Column { name: format!("column {}", id) },
                },
            );
        }

        fn card(&self, id: u32) -> (u32, Position) {
            let cards = self.cards.lock().unwrap();
            let row = &cards[&id];
            (row.parent_id, row.position)
        }

        fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }

        fn ordered_ids(&self, kind: ChildKind, parent_id: u32) -> Vec<u32> {
            let table = self.table(kind).lock().unwrap();
            let mut rows: Vec<&ChildRow> = table.values().filter(|r| r.parent_id == parent_id).collect();
            rows.sort_by_key(|r| (r.position, r.id));
            rows.iter().map(|r| r.id).collect()
        }
    }

    #[async_trait]
    impl OrderingStore for MemoryStore {
        async fn list_children(&self, container: Container) -> DomainResult<Vec<ChildRow>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let table = self.table(container.child_kind()).lock().unwrap();
            let mut rows: Vec<ChildRow> = table.values().filter(|r| r.parent_id == container.id()).cloned().collect();
            rows.sort_by_key(|r| (r.position, r.id));
            Ok(rows)
        }

        async fn find_rows(&self, kind: ChildKind, ids: &[u32]) -> DomainResult<Vec<ChildRow>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let table = self.table(kind).lock().unwrap();
            Ok(ids.iter().filter_map(|id| table.get(id).cloned()).collect())
        }

        async fn upsert_batch(&self, kind: ChildKind, rows: &[ChildRow]) -> DomainResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(DomainError::Internal("disk full".to_string()));
            }
            let mut table = self.table(kind).lock().unwrap();
            for row in rows {
                table.insert(row.id, row.clone());
            }
            self.writes.lock().unwrap().push(rows.to_vec());
            Ok(())
        }

        async fn delete_cascade(&self, _entity: EntityRef) -> DomainResult<()> {
            Ok(())
        }
    }

    fn engine_with(store: MemoryStore) -> (ReorderEngine<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(store);
        (ReorderEngine::new(store.clone()), store)
    }

    /// Column 1 holds cards 11, 12, 13; column 2 holds 21, 22
    fn two_columns() -> MemoryStore {
        let store = MemoryStore::default();
        store.add_card(11, 1, 1000);
        store.add_card(12, 1, 2000);
        store.add_card(13, 1, 3000);
        store.add_card(21, 2, 1000);
        store.add_card(22, 2, 2000);
        store
    }

    #[tokio::test]
    async fn test_reorder_renormalizes() {
        let (engine, store) = engine_with(two_columns());

        let outcome = engine.reorder_siblings(Container::Column(1), &[13, 11, 12]).await.unwrap();

        assert_eq!(outcome.assignments, vec![(13, 1000), (11, 2000), (12, 3000)]);
        assert_eq!(outcome.written, 3);
        assert_eq!(store.ordered_ids(ChildKind::Card, 1), vec![13, 11, 12]);
    }

    #[tokio::test]
    async fn test_reorder_twice_is_idempotent() {
        let (engine, store) = engine_with(two_columns());

        engine.reorder_siblings(Container::Column(1), &[12, 13, 11]).await.unwrap();
        let after_first: Vec<_> = [11, 12, 13].iter().map(|id| store.card(*id)).collect();

        let second = engine.reorder_siblings(Container::Column(1), &[12, 13, 11]).await.unwrap();
        let after_second: Vec<_> = [11, 12, 13].iter().map(|id| store.card(*id)).collect();

        assert_eq!(after_first, after_second);
        assert_eq!(second.written, 0);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_reorder_writes_only_changed_rows() {
        let (engine, store) = engine_with(two_columns());

        // 11 stays first; only 12 and 13 swap
        let outcome = engine.reorder_siblings(Container::Column(1), &[11, 13, 12]).await.unwrap();

        assert_eq!(outcome.written, 2);
        let written: Vec<u32> = store.writes.lock().unwrap()[0].iter().map(|r| r.id).collect();
        assert_eq!(written, vec![12, 13]);
    }

    #[tokio::test]
    async fn test_reorder_duplicate_keeps_first_occurrence() {
        let (engine, store) = engine_with(two_columns());

        let outcome = engine.reorder_siblings(Container::Column(1), &[12, 11, 12, 13]).await.unwrap();

        assert_eq!(outcome.assignments, vec![(12, 1000), (11, 2000), (13, 3000)]);
        assert_eq!(store.card(12), (1, 1000));
    }

    #[tokio::test]
    async fn test_reorder_appends_omitted_children() {
        let (engine, store) = engine_with(two_columns());

        let outcome = engine.reorder_siblings(Container::Column(1), &[13]).await.unwrap();

        assert_eq!(outcome.assignments, vec![(13, 1000), (11, 2000), (12, 3000)]);
        assert_eq!(store.ordered_ids(ChildKind::Card, 1), vec![13, 11, 12]);
    }

    #[tokio::test]
    async fn test_reorder_unknown_child_writes_nothing() {
        let (engine, store) = engine_with(two_columns());

        // 21 lives in column 2
        let result = engine.reorder_siblings(Container::Column(1), &[11, 21, 12]).await;

        assert_eq!(result, Err(DomainError::UnknownChild { container: Container::Column(1), id: 21 }));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.card(11), (1, 1000));
    }

    #[tokio::test]
    async fn test_empty_reorder_skips_store() {
        let (engine, store) = engine_with(MemoryStore::default());

        let outcome = engine.reorder_siblings(Container::Column(5), &[]).await.unwrap();

        assert!(outcome.assignments.is_empty());
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_reorder_columns_of_board() {
        let store = MemoryStore::default();
        store.add_column(1, 7, 1000);
        store.add_column(2, 7, 2000);
        store.add_column(3, 7, 3000);
        let (engine, store) = engine_with(store);

        engine.reorder_siblings(Container::Board(7), &[3, 1, 2]).await.unwrap();

        assert_eq!(store.ordered_ids(ChildKind::Column, 7), vec![3, 1, 2]);
        let columns = store.columns.lock().unwrap();
        assert_eq!(columns[&1].fields, CarriedFields::Column { name: "column 1".to_string() });
    }

    #[tokio::test]
    async fn test_move_across_columns() {
        let (engine, store) = engine_with(two_columns());

        let outcome = engine.move_across_containers(12, 1, 2, &[21, 12, 22]).await.unwrap();

        assert_eq!(outcome.assignments, vec![(21, 1000), (12, 2000), (22, 3000)]);
        assert_eq!(store.card(12), (2, 2000));
        assert_eq!(store.card(21), (2, 1000));
        assert_eq!(store.card(22), (2, 3000));
        // Source keeps its gap
        assert_eq!(store.card(11), (1, 1000));
        assert_eq!(store.card(13), (1, 3000));
        // 21 already sat at 1000
        assert_eq!(outcome.written, 2);
    }

    #[tokio::test]
    async fn test_move_appends_card_missing_from_order() {
        let (engine, store) = engine_with(two_columns());

        let outcome = engine.move_across_containers(11, 1, 2, &[22, 21]).await.unwrap();

        assert_eq!(outcome.position_of(11), Some(3000));
        assert_eq!(store.ordered_ids(ChildKind::Card, 2), vec![22, 21, 11]);
    }

    #[tokio::test]
    async fn test_move_last_card_leaves_source_empty() {
        let store = MemoryStore::default();
        store.add_card(1, 10, 1000);
        let (engine, store) = engine_with(store);

        engine.move_across_containers(1, 10, 20, &[1]).await.unwrap();

        assert!(store.ordered_ids(ChildKind::Card, 10).is_empty());
        assert_eq!(store.card(1), (20, 1000));
    }

    #[tokio::test]
    async fn test_move_unknown_card_writes_nothing() {
        let (engine, store) = engine_with(two_columns());

        let result = engine.move_across_containers(12, 1, 2, &[21, 12, 99]).await;

        assert_eq!(result, Err(DomainError::UnknownChild { container: Container::Column(2), id: 99 }));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.card(12), (1, 2000));
    }

    #[tokio::test]
    async fn test_move_appends_target_cards_missing_from_order() {
        let (engine, store) = engine_with(two_columns());

        let outcome = engine.move_across_containers(11, 1, 2, &[11]).await.unwrap();

        assert_eq!(outcome.assignments, vec![(11, 1000), (21, 2000), (22, 3000)]);
        assert_eq!(store.ordered_ids(ChildKind::Card, 2), vec![11, 21, 22]);
        let positions: Vec<Position> = [11, 21, 22].iter().map(|id| store.card(*id).1).collect();
        assert_eq!(positions, vec![1000, 2000, 3000]);
    }

    #[tokio::test]
    async fn test_move_rejects_card_from_another_column() {
        let (engine, store) = engine_with(two_columns());

        // 13 is still in column 1 and only 12 is moving
        let result = engine.move_across_containers(12, 1, 2, &[12, 13, 21]).await;

        assert_eq!(result, Err(DomainError::UnknownChild { container: Container::Column(2), id: 13 }));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.card(13), (1, 3000));
    }

    #[tokio::test]
    async fn test_move_missing_card_writes_nothing() {
        let (engine, store) = engine_with(two_columns());

        let result = engine.move_across_containers(99, 1, 2, &[21, 99, 22]).await;

        assert_eq!(result, Err(DomainError::UnknownChild { container: Container::Column(2), id: 99 }));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_move_within_same_column_reorders() {
        let (engine, store) = engine_with(two_columns());

        engine.move_across_containers(13, 1, 1, &[13]).await.unwrap();

        assert_eq!(store.ordered_ids(ChildKind::Card, 1), vec![13, 11, 12]);
    }

    #[tokio::test]
    async fn test_write_failure_is_persistence() {
        let (engine, store) = engine_with(two_columns());
        store.fail_writes.store(true, Ordering::SeqCst);

        let reorder = engine.reorder_siblings(Container::Column(1), &[12, 11]).await;
        let moved = engine.move_across_containers(11, 1, 2, &[11]).await;

        assert!(matches!(reorder, Err(DomainError::Persistence(_))));
        assert!(matches!(moved, Err(DomainError::Persistence(_))));
        assert_eq!(store.card(11), (1, 1000));
    }
}
