use std::fmt;

use crate::config::GridSize;

/// Board cell in (row, column) coordinates; row 0 is the top edge.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns true when the cell lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.row >= 0
            && self.col >= 0
            && self.row < i32::from(bounds.rows)
            && self.col < i32::from(bounds.cols)
    }

    /// Returns the cell displaced by `(d_row, d_col)`.
    #[must_use]
    pub fn offset(self, (d_row, d_col): (i32, i32)) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row-major occupancy lookup for every cell of the board.
///
/// A cell is occupied when its flag is set and vacant otherwise; the
/// occupied count is kept in step with the flags.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Occupancy {
    bounds: GridSize,
    flags: Vec<bool>,
    occupied: usize,
}

impl Occupancy {
    /// Creates an index with every cell vacant.
    #[must_use]
    pub fn new(bounds: GridSize) -> Self {
        Self {
            bounds,
            flags: vec![false; bounds.total_cells()],
            occupied: 0,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if !cell.is_within_bounds(self.bounds) {
            return None;
        }

        let row = usize::try_from(cell.row).ok()?;
        let col = usize::try_from(cell.col).ok()?;
        Some(row * usize::from(self.bounds.cols) + col)
    }

    fn cell_at(&self, index: usize) -> Cell {
        let cols = usize::from(self.bounds.cols);
        Cell::new((index / cols) as i32, (index % cols) as i32)
    }

    /// Returns true when `cell` is inside the board and covered.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|index| self.flags[index])
    }

    /// Marks `cell` occupied. Returns false if it was out of bounds or already occupied.
    pub fn occupy(&mut self, cell: Cell) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };

        if self.flags[index] {
            return false;
        }

        self.flags[index] = true;
        self.occupied += 1;
        true
    }

    /// Marks `cell` vacant. Returns false if it was out of bounds or already vacant.
    pub fn vacate(&mut self, cell: Cell) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };

        if !self.flags[index] {
            return false;
        }

        self.flags[index] = false;
        self.occupied -= 1;
        true
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    #[must_use]
    pub fn vacant_count(&self) -> usize {
        self.flags.len() - self.occupied
    }

    /// Iterates over occupied cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells_where(true)
    }

    /// Iterates over vacant cells in row-major order.
    pub fn vacant_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells_where(false)
    }

    /// Returns the `n`-th vacant cell in row-major order.
    #[must_use]
    pub fn nth_vacant(&self, n: usize) -> Option<Cell> {
        self.vacant_cells().nth(n)
    }

    fn cells_where(&self, occupied: bool) -> impl Iterator<Item = Cell> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(move |(_, flag)| **flag == occupied)
            .map(move |(index, _)| self.cell_at(index))
    }
}
