use fixedbitset::FixedBitSet;
use std::fmt::{Display, Formatter};

const CELL_CONTRADICTION: &str = "!";
const CELL_OPEN: &str = "*";

/// A grid position and the set of tile kinds still possible there.
///
/// The domain only ever shrinks: nothing outside the crate can write it, and the
/// solver only intersects it or narrows it to one of its own members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    domain: FixedBitSet,
}

impl Cell {
    pub(crate) fn new(row: usize, col: usize, domain: FixedBitSet) -> Self {
        Self { row, col, domain }
    }

    /// Row index.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column index.
    #[must_use]
    pub fn col(&self) -> usize {
        self.col
    }

    /// `(row, col)`.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// The possible kinds as a bit set over kind indices.
    #[must_use]
    pub fn domain(&self) -> &FixedBitSet {
        &self.domain
    }

    /// The possible kind indices, in ascending order.
    pub fn choices(&self) -> impl Iterator<Item = usize> + '_ {
        self.domain.ones()
    }

    /// Number of possible kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.count_ones(..)
    }

    /// True when no kind fits, same as [`Cell::is_contradiction`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_clear()
    }

    /// Exactly one kind remains.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.len() == 1
    }

    /// No kind remains.
    #[must_use]
    pub fn is_contradiction(&self) -> bool {
        self.is_empty()
    }

    /// The kind index if collapsed.
    #[must_use]
    pub fn tile(&self) -> Option<usize> {
        if self.is_collapsed() {
            self.domain.ones().next()
        } else {
            None
        }
    }

    /// Narrow the domain to `tile`, which must already be possible.
    pub(crate) fn collapse_to(&mut self, tile: usize) {
        debug_assert!(self.domain.contains(tile), "Cannot collapse to a ruled-out tile");
        self.domain.clear();
        self.domain.insert(tile);
    }

    /// Intersect the domain with `allowed`. Returns true if it shrank.
    pub(crate) fn restrict(&mut self, allowed: &FixedBitSet) -> bool {
        let before = self.len();
        self.domain.intersect_with(allowed);
        self.len() != before
    }

    #[cfg(test)]
    pub(crate) fn set_domain(&mut self, domain: FixedBitSet) {
        self.domain = domain;
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.len() {
            0 => write!(f, "{CELL_CONTRADICTION}"),
            1 => write!(f, "{}", self.domain.ones().next().unwrap_or_default()),
            _ => write!(f, "{CELL_OPEN}"),
        }
    }
}
