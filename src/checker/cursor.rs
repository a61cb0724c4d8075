use super::{Side, VertexId};
use crate::LabelKind;
use std::collections::HashMap;

/// Identifies one matching obligation: the move `(kind, index)` of the moving side at `vertex`,
/// plus the tried slot for the fresh-input rule's known-slot branches.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct CursorKey {
    pub vertex: VertexId,
    pub kind: LabelKind,
    pub index: usize,
    pub k_prime: Option<usize>,
}

/// Positions in the answering side's candidate lists. `high` serves moves made by the left
/// system and `low` moves made by the right one.
///
/// A cursor rests on the candidate that currently answers its obligation and only ever moves
/// forward, so candidates that already failed are never scanned twice.
#[derive(Debug, Default)]
pub(crate) struct ResumeCursors {
    high: HashMap<CursorKey, usize, ahash::RandomState>,
    low: HashMap<CursorKey, usize, ahash::RandomState>,
}

impl ResumeCursors {
    fn table(&self, side: Side) -> &HashMap<CursorKey, usize, ahash::RandomState> {
        match side {
            Side::Left => &self.high,
            Side::Right => &self.low,
        }
    }

    fn table_mut(&mut self, side: Side) -> &mut HashMap<CursorKey, usize, ahash::RandomState> {
        match side {
            Side::Left => &mut self.high,
            Side::Right => &mut self.low,
        }
    }

    pub fn get(&self, side: Side, key: &CursorKey) -> usize {
        self.table(side).get(key).copied().unwrap_or(0)
    }

    /// Moves the cursor past `position`. Never moves it backwards.
    pub fn advance_past(&mut self, side: Side, key: CursorKey, position: usize) {
        let cursor = self.table_mut(side).entry(key).or_insert(0);
        *cursor = (*cursor).max(position + 1);
    }

    /// Number of obligations that have a cursor.
    pub fn len(&self) -> usize {
        self.high.len() + self.low.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(vertex: VertexId) -> CursorKey {
        CursorKey {
            vertex,
            kind: LabelKind::OUTPUT,
            index: 0,
            k_prime: None,
        }
    }

    #[test]
    fn cursors_only_move_forward() {
        let mut cursors = ResumeCursors::default();
        assert_eq!(cursors.get(Side::Left, &key(0)), 0);
        cursors.advance_past(Side::Left, key(0), 2);
        assert_eq!(cursors.get(Side::Left, &key(0)), 3);
        cursors.advance_past(Side::Left, key(0), 0);
        assert_eq!(cursors.get(Side::Left, &key(0)), 3);
        cursors.advance_past(Side::Left, key(0), 3);
        assert_eq!(cursors.get(Side::Left, &key(0)), 4);
    }

    #[test]
    fn sides_are_independent() {
        let mut cursors = ResumeCursors::default();
        cursors.advance_past(Side::Right, key(1), 0);
        assert_eq!(cursors.get(Side::Right, &key(1)), 1);
        assert_eq!(cursors.get(Side::Left, &key(1)), 0);
        let branch = CursorKey {
            k_prime: Some(2),
            ..key(1)
        };
        assert_eq!(cursors.get(Side::Right, &branch), 0);
        assert_eq!(cursors.len(), 1);
    }
}
