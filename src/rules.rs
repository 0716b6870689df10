use fixedbitset::FixedBitSet;
use std::ops::Index;

use crate::{ALL_DIRECTIONS, Direction};

/// Adjacency rules: for each tile kind and direction, the kinds allowed next to it.
#[derive(Clone, Debug)]
pub struct Rules {
    masks: Vec<[FixedBitSet; 4]>, // [N, E, S, W]
}

impl Rules {
    /// Wrap per-kind masks. Every mask must be sized to the number of kinds.
    #[must_use]
    pub fn new(masks: Vec<[FixedBitSet; 4]>) -> Self {
        debug_assert!(
            masks
                .iter()
                .all(|dirs| dirs.iter().all(|mask| mask.len() == masks.len())),
            "Every rule mask must cover all {} kinds",
            masks.len()
        );
        Self { masks }
    }

    /// Number of tile kinds covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// True when no kinds are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Raw masks, indexed `[kind][direction.index()]`.
    #[must_use]
    pub fn masks(&self) -> &[[FixedBitSet; 4]] {
        &self.masks
    }

    /// Kinds permitted in `dir` of `tile`.
    #[must_use]
    pub fn allowed(&self, tile: usize, dir: Direction) -> &FixedBitSet {
        &self.masks[tile][dir.index()]
    }

    /// Union of the kinds permitted in `dir` of any kind in `tiles`.
    #[must_use]
    pub fn allowed_by_any(&self, tiles: &FixedBitSet, dir: Direction) -> FixedBitSet {
        let mut allowed = FixedBitSet::with_capacity(self.len());
        for tile in tiles.ones() {
            allowed.union_with(self.allowed(tile, dir));
        }
        allowed
    }

    /// Every `(tile, dir, other)` where `other` may sit in `dir` of `tile`
    /// but `tile` may not sit in the opposite direction of `other`.
    #[must_use]
    pub fn asymmetries(&self) -> Vec<(usize, Direction, usize)> {
        let mut found = Vec::new();
        for tile in 0..self.len() {
            for dir in ALL_DIRECTIONS {
                for other in self.allowed(tile, dir).ones() {
                    if !self.allowed(other, dir.opposite()).contains(tile) {
                        found.push((tile, dir, other));
                    }
                }
            }
        }
        found
    }
}

impl Index<usize> for Rules {
    type Output = [FixedBitSet; 4];
    fn index(&self, idx: usize) -> &Self::Output {
        &self.masks[idx]
    }
}
