use fixedbitset::FixedBitSet;
use std::collections::HashMap;

use crate::{ALL_DIRECTIONS, Direction, Error, Rules, Tileset};

/// Collects tile kinds and their rules, then validates them into a [`Tileset`].
#[derive(Clone, Debug, Default)]
pub struct TilesetBuilder {
    tiles: Vec<(String, f64)>,
    rules: Vec<(String, Direction, Vec<String>)>,
}

impl TilesetBuilder {
    /// Start an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a kind with its selection weight.
    #[must_use]
    pub fn tile(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.tiles.push((name.into(), weight));
        self
    }

    /// Permit `allowed` kinds in direction `dir` of kind `name`.
    ///
    /// Calling this again for the same kind and direction adds to the permitted set.
    /// An empty `allowed` still counts as defining the direction.
    #[must_use]
    pub fn rule<S: AsRef<str>>(
        mut self,
        name: impl Into<String>,
        dir: Direction,
        allowed: &[S],
    ) -> Self {
        let allowed = allowed.iter().map(|s| s.as_ref().to_string()).collect();
        self.rules.push((name.into(), dir, allowed));
        self
    }

    /// Number of kinds declared so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when no kinds have been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTileset`] without kinds, [`Error::DuplicateKind`] and
    /// [`Error::InvalidWeight`] for bad declarations, [`Error::UnknownKind`] when a rule
    /// names an undeclared kind, and [`Error::IncompleteTileDefinition`] when any kind
    /// lacks a rule for one of the four directions.
    pub fn build(self) -> Result<Tileset, Error> {
        if self.tiles.is_empty() {
            return Err(Error::EmptyTileset);
        }
        let num_tiles = self.tiles.len();

        let mut ids = HashMap::with_capacity(num_tiles);
        for (index, (name, weight)) in self.tiles.iter().enumerate() {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::InvalidWeight {
                    kind: name.clone(),
                    weight: *weight,
                });
            }
            if ids.insert(name.clone(), index).is_some() {
                return Err(Error::DuplicateKind(name.clone()));
            }
        }

        let lookup = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| Error::UnknownKind(name.to_string()))
        };

        let empty: [FixedBitSet; 4] =
            std::array::from_fn(|_| FixedBitSet::with_capacity(num_tiles));
        let mut masks = vec![empty; num_tiles];
        let mut defined = vec![[false; 4]; num_tiles];
        for (name, dir, allowed) in &self.rules {
            let tile = lookup(name.as_str())?;
            defined[tile][dir.index()] = true;
            for other in allowed {
                masks[tile][dir.index()].insert(lookup(other.as_str())?);
            }
        }

        for (tile, dirs) in defined.iter().enumerate() {
            if let Some(&dir) = ALL_DIRECTIONS.iter().find(|dir| !dirs[dir.index()]) {
                return Err(Error::IncompleteTileDefinition {
                    kind: self.tiles[tile].0.clone(),
                    direction: dir,
                });
            }
        }

        let (names, weights) = self.tiles.into_iter().unzip();
        Ok(Tileset::new(names, weights, Rules::new(masks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{East, North, South, West};

    fn all_sides(builder: TilesetBuilder, name: &str, allowed: &[&str]) -> TilesetBuilder {
        ALL_DIRECTIONS
            .iter()
            .fold(builder, |b, &dir| b.rule(name, dir, allowed))
    }

    #[test]
    fn builds_a_complete_tileset() {
        let builder = TilesetBuilder::new().tile("a", 1.0).tile("b", 2.5);
        let builder = all_sides(builder, "a", &["a", "b"]);
        let tileset = all_sides(builder, "b", &["a"]).build().unwrap();

        assert_eq!(tileset.len(), 2);
        assert_eq!(tileset.names(), ["a", "b"]);
        assert_eq!(tileset.weight("b").unwrap(), 2.5);
        assert_eq!(tileset.rule("b", South).unwrap(), vec!["a"]);
    }

    #[test]
    fn repeated_rules_accumulate() {
        let builder = TilesetBuilder::new()
            .tile("a", 1.0)
            .tile("b", 1.0)
            .rule("a", North, &["a"])
            .rule("a", North, &["b"]);
        let builder = [East, South, West]
            .iter()
            .fold(builder, |b, &dir| b.rule("a", dir, &["a"]));
        let tileset = all_sides(builder, "b", &["b"]).build().unwrap();
        assert_eq!(tileset.rule("a", North).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn empty_builder_is_rejected() {
        assert!(matches!(
            TilesetBuilder::new().build(),
            Err(Error::EmptyTileset)
        ));
    }

    #[test]
    fn duplicate_kind_is_rejected() {
        let builder = TilesetBuilder::new().tile("a", 1.0).tile("a", 1.0);
        match all_sides(builder, "a", &["a"]).build() {
            Err(Error::DuplicateKind(name)) => assert_eq!(name, "a"),
            other => panic!("expected DuplicateKind, got {other:?}"),
        }
    }

    #[test]
    fn negative_and_nan_weights_are_rejected() {
        for weight in [-1.0, f64::NAN, f64::INFINITY] {
            let builder = all_sides(TilesetBuilder::new().tile("a", weight), "a", &["a"]);
            assert!(matches!(builder.build(), Err(Error::InvalidWeight { .. })));
        }
    }

    #[test]
    fn zero_weight_is_accepted() {
        let builder = all_sides(TilesetBuilder::new().tile("a", 0.0), "a", &["a"]);
        assert_eq!(builder.build().unwrap().weight("a").unwrap(), 0.0);
    }

    #[test]
    fn missing_direction_is_reported() {
        let builder = TilesetBuilder::new()
            .tile("a", 1.0)
            .rule("a", North, &["a"])
            .rule("a", East, &["a"])
            .rule("a", South, &["a"]);
        match builder.build() {
            Err(Error::IncompleteTileDefinition { kind, direction }) => {
                assert_eq!(kind, "a");
                assert_eq!(direction, West);
            }
            other => panic!("expected IncompleteTileDefinition, got {other:?}"),
        }
    }

    #[test]
    fn rule_for_undeclared_kind_is_rejected() {
        let builder = all_sides(TilesetBuilder::new().tile("a", 1.0), "a", &["a"]);
        match builder.rule("ghost", North, &["a"]).build() {
            Err(Error::UnknownKind(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }

    #[test]
    fn rule_naming_undeclared_neighbour_is_rejected() {
        let builder = all_sides(TilesetBuilder::new().tile("a", 1.0), "a", &["a", "b"]);
        match builder.build() {
            Err(Error::UnknownKind(name)) => assert_eq!(name, "b"),
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }
}
