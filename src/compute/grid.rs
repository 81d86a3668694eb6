//! Rectangular grid of cells and neighborhood queries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Cell, Label, Position};

/// Grid construction and access errors.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Grid dimensions must be non-zero (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("Initial labels are {got_rows}x{got_cols}, expected {rows}x{cols}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Unknown topology: {0}")]
    UnknownTopology(String),
    #[error("Unknown cell label: {0}")]
    UnknownLabel(String),
    #[error("Unsupported neighborhood size {0} (expected 4 or 8)")]
    UnsupportedNeighborhood(usize),
}

/// Policy for neighbor positions that fall outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Out-of-range neighbors are absent.
    #[default]
    #[serde(alias = "standard")]
    Bounded,
    /// Rows and columns wrap around (torus).
    #[serde(alias = "toroidal")]
    Wrapping,
}

impl Topology {
    pub fn as_str(self) -> &'static str {
        match self {
            Topology::Bounded => "bounded",
            Topology::Wrapping => "wrapping",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounded" | "standard" | "finite" => Ok(Topology::Bounded),
            "wrapping" | "toroidal" | "torus" => Ok(Topology::Wrapping),
            _ => Err(GridError::UnknownTopology(s.to_string())),
        }
    }
}

/// Neighborhood shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    /// North, south, east and west (size 4).
    VonNeumann,
    /// All eight surrounding cells (size 8).
    Moore,
}

impl TryFrom<usize> for Neighborhood {
    type Error = GridError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        match size {
            4 => Ok(Neighborhood::VonNeumann),
            8 => Ok(Neighborhood::Moore),
            other => Err(GridError::UnsupportedNeighborhood(other)),
        }
    }
}

/// 3x3 window centered on a cell. Slots are `None` where no neighbor exists
/// (bounded edges, or diagonals of a von Neumann query).
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    slots: [[Option<&'a Cell>; 3]; 3],
}

impl<'a> Window<'a> {
    /// Cell at offset `(dr, dc)`, each in `-1..=1`.
    pub fn get(&self, dr: isize, dc: isize) -> Option<&'a Cell> {
        let r = usize::try_from(dr + 1).ok()?;
        let c = usize::try_from(dc + 1).ok()?;
        self.slots.get(r)?.get(c).copied().flatten()
    }

    pub fn center(&self) -> Option<&'a Cell> {
        self.slots[1][1]
    }

    /// Present neighbors in row-major window order, center excluded.
    pub fn neighbors(&self) -> impl Iterator<Item = &'a Cell> + '_ {
        self.slots
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, slot)| (r, c, slot)))
            .filter(|&(r, c, _)| r != 1 || c != 1)
            .filter_map(|(_, _, slot)| *slot)
    }

    /// Present cardinal neighbors in the order north, west, east, south.
    pub fn cardinal(&self) -> impl Iterator<Item = &'a Cell> + '_ {
        [(0, 1), (1, 0), (1, 2), (2, 1)]
            .into_iter()
            .filter_map(move |(r, c)| self.slots[r][c])
    }

    /// Number of empty slots in the window.
    pub fn absent(&self) -> usize {
        self.slots.iter().flatten().filter(|slot| slot.is_none()).count()
    }
}

/// Row-major grid that exclusively owns its cells.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    topology: Topology,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from a `rows x cols` array of initial labels.
    pub fn new(
        rows: usize,
        cols: usize,
        topology: Topology,
        labels: Vec<Vec<Label>>,
    ) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let mismatch = labels.len() != rows || labels.iter().any(|row| row.len() != cols);
        if mismatch {
            return Err(GridError::ShapeMismatch {
                rows,
                cols,
                got_rows: labels.len(),
                got_cols: labels.iter().map(Vec::len).find(|&len| len != cols).unwrap_or(cols),
            });
        }

        let cells = labels
            .into_iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.into_iter()
                    .enumerate()
                    .map(move |(c, label)| Cell::new(r, c, label))
            })
            .collect();

        Ok(Self {
            rows,
            cols,
            topology,
            cells,
        })
    }

    /// Grid filled with a single label.
    pub fn filled(
        rows: usize,
        cols: usize,
        topology: Topology,
        label: Label,
    ) -> Result<Self, GridError> {
        Self::new(rows, cols, topology, vec![vec![label; cols]; rows])
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn idx(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Flat row-major index of a position.
    #[inline]
    pub fn index_of(&self, pos: Position) -> usize {
        self.idx(pos)
    }

    fn check(&self, row: usize, col: usize) -> Result<Position, GridError> {
        if row < self.rows && col < self.cols {
            Ok(Position::new(row, col))
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Checked cell access.
    pub fn cell_at(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        let pos = self.check(row, col)?;
        Ok(&self.cells[self.idx(pos)])
    }

    /// Checked mutable cell access.
    pub fn cell_at_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell, GridError> {
        let pos = self.check(row, col)?;
        let idx = self.idx(pos);
        Ok(&mut self.cells[idx])
    }

    /// Committed label at `(row, col)`.
    pub fn label(&self, row: usize, col: usize) -> Result<Label, GridError> {
        self.cell_at(row, col).map(Cell::current)
    }

    /// Cell at a position obtained from this grid.
    #[inline]
    pub(crate) fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.idx(pos)]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.idx(pos);
        &mut self.cells[idx]
    }

    /// Resolve `index + offset - 1` along an axis of length `len`.
    #[inline]
    fn resolve(&self, index: usize, offset: usize, len: usize) -> Option<usize> {
        match self.topology {
            Topology::Bounded => (index + offset).checked_sub(1).filter(|&i| i < len),
            Topology::Wrapping => Some((index + len + offset - 1) % len),
        }
    }

    /// 3x3 window of cells centered on `(row, col)`.
    ///
    /// Never fails for an in-range center: positions beyond a bounded edge are
    /// absent and wrapping grids fold them back onto the opposite edge.
    pub fn neighborhood(
        &self,
        row: usize,
        col: usize,
        kind: Neighborhood,
    ) -> Result<Window<'_>, GridError> {
        let center = self.check(row, col)?;
        Ok(self.window(center, kind))
    }

    pub(crate) fn window(&self, center: Position, kind: Neighborhood) -> Window<'_> {
        let mut slots = [[None; 3]; 3];
        for (r, slot_row) in slots.iter_mut().enumerate() {
            for (c, slot) in slot_row.iter_mut().enumerate() {
                let diagonal = r != 1 && c != 1;
                if kind == Neighborhood::VonNeumann && diagonal {
                    continue;
                }
                let row = self.resolve(center.row, r, self.rows);
                let col = self.resolve(center.col, c, self.cols);
                if let (Some(row), Some(col)) = (row, col) {
                    *slot = Some(self.cell(Position::new(row, col)));
                }
            }
        }
        Window { slots }
    }

    /// Cells in row-major order (row ascending, then column ascending).
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| Position::new(r, c)))
    }

    /// Committed labels as a `rows x cols` array.
    pub fn labels(&self) -> Vec<Vec<Label>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(Cell::current).collect())
            .collect()
    }

    /// Number of cells per committed label.
    pub fn census(&self) -> BTreeMap<Label, usize> {
        let mut counts = BTreeMap::new();
        for cell in &self.cells {
            *counts.entry(cell.current()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: Vec<&str> = row.iter().map(|cell| cell.current().as_str()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
