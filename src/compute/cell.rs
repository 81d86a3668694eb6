//! A single grid cell with a committed and a provisional state.

use super::Label;

/// Row-major grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Grid cell.
///
/// `next` is `None` unless a rule staged a value during the current sweep.
/// Reads of [`Cell::current`] always see the snapshot taken at the start of
/// the tick; only [`Cell::commit`] changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    current: Label,
    next: Option<Label>,
    /// Destination claimed by a mobile agent leaving this cell this sweep.
    intended: Option<Position>,
}

impl Cell {
    pub fn new(row: usize, col: usize, label: Label) -> Self {
        Self {
            position: Position::new(row, col),
            current: label,
            next: None,
            intended: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.position.row
    }

    #[inline]
    pub fn col(&self) -> usize {
        self.position.col
    }

    /// Committed state.
    #[inline]
    pub fn current(&self) -> Label {
        self.current
    }

    /// Provisional state staged earlier in this sweep, if any.
    #[inline]
    pub fn next(&self) -> Option<Label> {
        self.next
    }

    #[inline]
    pub fn intended(&self) -> Option<Position> {
        self.intended
    }

    /// Stage a provisional state. Last write wins.
    #[inline]
    pub fn set_next(&mut self, label: Label) {
        self.next = Some(label);
    }

    /// Drop any provisional state without committing it.
    #[inline]
    pub fn clear_next(&mut self) {
        self.next = None;
    }

    #[inline]
    pub fn set_intended(&mut self, destination: Position) {
        self.intended = Some(destination);
    }

    /// Promote the provisional state, then clear the provisional and
    /// intended slots whether or not anything was staged.
    pub fn commit(&mut self) {
        if let Some(next) = self.next.take() {
            self.current = next;
        }
        self.intended = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_promotes_next() {
        let mut cell = Cell::new(1, 2, Label::Dead);
        cell.set_next(Label::Alive);
        assert_eq!(cell.current(), Label::Dead);

        cell.commit();
        assert_eq!(cell.current(), Label::Alive);
        assert_eq!(cell.next(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut cell = Cell::new(0, 0, Label::Fish);
        cell.set_next(Label::Water);
        cell.set_next(Label::Shark);
        cell.commit();
        assert_eq!(cell.current(), Label::Shark);
    }

    #[test]
    fn test_commit_without_next_clears_intent() {
        let mut cell = Cell::new(0, 0, Label::Fish);
        cell.set_intended(Position::new(0, 1));
        cell.commit();
        assert_eq!(cell.current(), Label::Fish);
        assert_eq!(cell.intended(), None);
    }

    #[test]
    fn test_clear_next() {
        let mut cell = Cell::new(0, 0, Label::Water);
        cell.set_next(Label::Fish);
        cell.clear_next();
        cell.commit();
        assert_eq!(cell.current(), Label::Water);
    }
}
