//! Deferred commit worklist.

use std::collections::HashMap;

use super::Position;

/// Ordered, duplicate-free set of positions awaiting commit.
///
/// Insertion order is kept for iteration. Pushing a position that is already
/// queued leaves it where it is; removal keeps the order of the remaining
/// entries.
#[derive(Debug, Default, Clone)]
pub struct Worklist {
    slots: Vec<Option<Position>>,
    index: HashMap<Position, usize>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a position. Returns `false` if it was already queued.
    pub fn push(&mut self, pos: Position) -> bool {
        if self.index.contains_key(&pos) {
            return false;
        }
        self.index.insert(pos, self.slots.len());
        self.slots.push(Some(pos));
        true
    }

    /// Dequeue a position. Returns `false` if it was not queued.
    pub fn remove(&mut self, pos: Position) -> bool {
        match self.index.remove(&pos) {
            Some(slot) => {
                self.slots[slot] = None;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Queued positions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Take every queued position in insertion order, leaving the list empty.
    pub fn drain(&mut self) -> impl Iterator<Item = Position> + use<> {
        self.index.clear();
        std::mem::take(&mut self.slots).into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_push_deduplicates() {
        let mut list = Worklist::new();
        assert!(list.push(p(0, 1)));
        assert!(list.push(p(2, 0)));
        assert!(!list.push(p(0, 1)));
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![p(0, 1), p(2, 0)]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut list = Worklist::new();
        for pos in [p(0, 0), p(0, 1), p(0, 2)] {
            list.push(pos);
        }
        assert!(list.remove(p(0, 1)));
        assert!(!list.remove(p(0, 1)));
        assert!(!list.contains(p(0, 1)));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![p(0, 0), p(0, 2)]);

        // Re-queued entries go to the back.
        list.push(p(0, 1));
        assert_eq!(
            list.iter().collect::<Vec<_>>(),
            vec![p(0, 0), p(0, 2), p(0, 1)]
        );
    }

    #[test]
    fn test_drain_empties() {
        let mut list = Worklist::new();
        list.push(p(1, 1));
        list.push(p(0, 0));
        let drained: Vec<_> = list.drain().collect();
        assert_eq!(drained, vec![p(1, 1), p(0, 0)]);
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
    }
}
