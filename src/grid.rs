use fixedbitset::FixedBitSet;
use ndarray::Array2;
use std::{
    fmt::{Display, Formatter},
    ops::Index,
};

use crate::{Cell, Direction};

/// `(row, col)` coordinates of a cell.
pub type Position = (usize, usize);

/// Fixed-size rectangular array of cells, optionally wrapping at the edges.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Array2<Cell>,
    wrap: bool,
}

impl Grid {
    /// A `width` by `height` grid in which every cell may hold any kind of `domain`.
    ///
    /// # Panics
    ///
    /// If either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize, domain: &FixedBitSet, wrap: bool) -> Self {
        assert!(width > 0, "Grid width must be greater than zero");
        assert!(height > 0, "Grid height must be greater than zero");
        let cells = Array2::from_shape_fn((height, width), |(row, col)| {
            Cell::new(row, col, domain.clone())
        });
        Self { cells, wrap }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Whether lookups past an edge continue from the opposite edge.
    #[must_use]
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true for a constructed grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// If the coordinates lie outside the grid; see [`Grid::get`] for a checked lookup.
    #[must_use]
    pub fn cell_at(&self, row: usize, col: usize) -> &Cell {
        &self.cells[(row, col)]
    }

    /// The cell at `(row, col)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get((row, col))
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The neighbouring position in `dir`.
    ///
    /// With wrapping this always succeeds; without it, `None` past an edge.
    #[must_use]
    pub fn neighbour(&self, (row, col): Position, dir: Direction) -> Option<Position> {
        let (height, width) = self.cells.dim();
        let (dr, dc) = dir.delta();
        if self.wrap {
            let r = (row + height).checked_add_signed(dr)? % height;
            let c = (col + width).checked_add_signed(dc)? % width;
            return Some((r, c));
        }
        let r = row.checked_add_signed(dr).filter(|&r| r < height)?;
        let c = col.checked_add_signed(dc).filter(|&c| c < width)?;
        Some((r, c))
    }

    /// The neighbouring cell in `dir`.
    #[must_use]
    pub fn neighbour_cell(&self, pos: Position, dir: Direction) -> Option<&Cell> {
        self.neighbour(pos, dir).map(|p| &self.cells[p])
    }

    /// Positions of cells with more than one possible kind.
    #[must_use]
    pub fn open_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|cell| cell.len() > 1)
            .map(Cell::position)
            .collect()
    }

    /// True when no cell has more than one possible kind.
    ///
    /// Contradictions count as resolved here; check [`Grid::has_contradiction`]
    /// to tell a solved grid from a failed one.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.len() <= 1)
    }

    /// True when any cell has no possible kind left.
    #[must_use]
    pub fn has_contradiction(&self) -> bool {
        self.cells.iter().any(Cell::is_contradiction)
    }

    /// Positions of cells with no possible kind left.
    #[must_use]
    pub fn contradictions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|cell| cell.is_contradiction())
            .map(Cell::position)
            .collect()
    }

    /// Number of cells holding exactly one kind.
    #[must_use]
    pub fn collapsed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_collapsed()).count()
    }
}

impl Index<Position> for Grid {
    type Output = Cell;
    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[pos]
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let max_index = self.cells.iter().filter_map(Cell::tile).max().unwrap_or(0);
        let print_width = max_index.checked_ilog10().unwrap_or(0) as usize + 1;
        for row in self.cells.rows() {
            for cell in row {
                write!(f, "{:>print_width$} ", cell.to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
