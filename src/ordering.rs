//! Local ordering helpers
//!
//! Pure list operations the reconciler applies to the mirror before the
//! backend confirms anything.

use crate::models::Column;

/// Gap between consecutive siblings after renormalization
pub const POSITION_STEP: i64 = 1000;

/// Move the element at `from` so it ends up at index `to`
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Renumber `positions` in place: 1000, 2000, ...
pub fn renormalize<T>(items: &mut [T], mut set_position: impl FnMut(&mut T, i64)) {
    for (index, item) in items.iter_mut().enumerate() {
        set_position(item, (index as i64 + 1) * POSITION_STEP);
    }
}

/// Take `card_id` out of `source_column_id` and put it into `target_column_id`.
///
/// The card lands before `over_card_id`, or at the end when there is no
/// hovered card or it is not in the target column. Returns `None` when a
/// column or the card cannot be found.
pub fn move_card_locally(
    columns: &[Column],
    card_id: u32,
    source_column_id: u32,
    target_column_id: u32,
    over_card_id: Option<u32>,
) -> Option<Vec<Column>> {
    let mut next = columns.to_vec();
    let source = next.iter().position(|c| c.id == source_column_id)?;
    let target = next.iter().position(|c| c.id == target_column_id)?;
    let card_index = next[source].card_index(card_id)?;

    let mut card = next[source].cards.remove(card_index);
    card.column_id = target_column_id;

    let target_cards = &mut next[target].cards;
    match over_card_id.and_then(|over| target_cards.iter().position(|c| c.id == over)) {
        Some(index) => target_cards.insert(index, card),
        None => target_cards.push(card),
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Card;

    fn column(id: u32, cards: &[u32]) -> Column {
        Column {
            id,
            board_id: 1,
            name: format!("column {}", id),
            position: id as i64 * POSITION_STEP,
            cards: cards
                .iter()
                .enumerate()
                .map(|(i, card_id)| Card {
                    id: *card_id,
                    column_id: id,
                    title: format!("card {}", card_id),
                    content: None,
                    position: (i as i64 + 1) * POSITION_STEP,
                })
                .collect(),
        }
    }

    #[test]
    fn test_array_move() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        array_move(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        array_move(&mut items, 3, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
        array_move(&mut items, 9, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_move_card_before_hovered_card() {
        let columns = vec![column(1, &[11, 12, 13]), column(2, &[21, 22])];

        let next = move_card_locally(&columns, 12, 1, 2, Some(22)).unwrap();

        assert_eq!(next[0].card_ids(), vec![11, 13]);
        assert_eq!(next[1].card_ids(), vec![21, 12, 22]);
        assert_eq!(next[1].cards[1].column_id, 2);
        // Input untouched
        assert_eq!(columns[0].card_ids(), vec![11, 12, 13]);
    }

    #[test]
    fn test_move_card_appends_without_known_hover() {
        let columns = vec![column(1, &[11]), column(2, &[21])];

        let on_background = move_card_locally(&columns, 11, 1, 2, None).unwrap();
        assert_eq!(on_background[1].card_ids(), vec![21, 11]);

        let unknown_hover = move_card_locally(&columns, 11, 1, 2, Some(99)).unwrap();
        assert_eq!(unknown_hover[1].card_ids(), vec![21, 11]);
    }

    #[test]
    fn test_move_card_unknown_column() {
        let columns = vec![column(1, &[11])];
        assert!(move_card_locally(&columns, 11, 1, 7, None).is_none());
        assert!(move_card_locally(&columns, 99, 1, 1, None).is_none());
    }

    #[test]
    fn test_renormalize() {
        let mut columns = vec![column(3, &[]), column(1, &[])];
        renormalize(&mut columns, |c, p| c.position = p);
        assert_eq!(columns[0].position, 1000);
        assert_eq!(columns[1].position, 2000);
    }
}
