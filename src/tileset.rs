use anyhow::{Context, Result};
use fixedbitset::FixedBitSet;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use crate::{Direction, Error, Rules, TilesetBuilder};

const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Deserialize)]
struct TilesetFile {
    tiles: Vec<TileEntry>,
}

#[derive(Deserialize)]
struct TileEntry {
    name: String,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default)]
    rules: BTreeMap<String, Vec<String>>,
}

const fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

/// Immutable catalogue of tile kinds, their selection weights and adjacency rules.
///
/// Kinds are addressed by name in the public API and by dense index internally;
/// the index of a kind is its position in [`Tileset::names`].
#[derive(Clone, Debug)]
pub struct Tileset {
    names: Vec<String>,
    ids: HashMap<String, usize>,
    weights: Vec<f64>,
    rules: Rules,
}

impl Tileset {
    pub(crate) fn new(names: Vec<String>, weights: Vec<f64>, rules: Rules) -> Self {
        debug_assert!(!names.is_empty(), "Tileset must contain at least one tile");
        debug_assert!(
            names.len() == weights.len() && names.len() == rules.len(),
            "Number of names, weights and rules must match"
        );
        let ids = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();
        Self {
            names,
            ids,
            weights,
            rules,
        }
    }

    /// Start building a tileset in code.
    #[must_use]
    pub fn builder() -> TilesetBuilder {
        TilesetBuilder::new()
    }

    /// Parse a tileset from YAML.
    ///
    /// ```yaml
    /// tiles:
    ///   - name: grass
    ///     weight: 2.0
    ///     rules: { n: [grass], e: [grass], s: [grass], w: [grass] }
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::Yaml`] for malformed documents, [`Error::InvalidDirection`] for rule keys
    /// that are not directions, and any error [`TilesetBuilder::build`] reports.
    pub fn from_yaml_str(data: &str) -> Result<Self, Error> {
        let file: TilesetFile = serde_yaml::from_str(data)?;
        let mut builder = TilesetBuilder::new();
        for entry in file.tiles {
            builder = builder.tile(entry.name.clone(), entry.weight);
            for (key, allowed) in entry.rules {
                let dir = key.parse::<Direction>()?;
                builder = builder.rule(entry.name.clone(), dir, allowed.as_slice());
            }
        }
        builder.build()
    }

    /// Read and parse a YAML tileset file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not describe a valid tileset.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tileset {}", path.display()))?;
        Self::from_yaml_str(&data)
            .with_context(|| format!("Invalid tileset {}", path.display()))
    }

    /// Number of kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a built tileset; provided alongside [`Tileset::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every registered kind, in registration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the kind at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Index of the kind called `name`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownKind`] if no such kind was registered.
    pub fn id(&self, name: &str) -> Result<usize, Error> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownKind(name.to_string()))
    }

    /// Selection weight of `kind`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownKind`] if no such kind was registered.
    pub fn weight(&self, kind: &str) -> Result<f64, Error> {
        Ok(self.weights[self.id(kind)?])
    }

    /// Selection weight by index.
    #[must_use]
    pub fn weight_of(&self, index: usize) -> f64 {
        self.weights[index]
    }

    /// Weights of all kinds, in registration order.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Kinds permitted in `dir` of `kind`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownKind`] if no such kind was registered.
    pub fn rule(&self, kind: &str, dir: Direction) -> Result<Vec<&str>, Error> {
        let index = self.id(kind)?;
        Ok(self
            .rules
            .allowed(index, dir)
            .ones()
            .map(|other| self.name(other))
            .collect())
    }

    /// Like [`Tileset::rule`], with the direction given as text (`"n"`, `"north"`, ...).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDirection`] or [`Error::UnknownKind`].
    pub fn rule_named(&self, kind: &str, dir: &str) -> Result<Vec<&str>, Error> {
        self.rule(kind, dir.parse()?)
    }

    /// Adjacency masks by index.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// A domain holding every kind.
    #[must_use]
    pub fn full_domain(&self) -> FixedBitSet {
        let mut domain = FixedBitSet::with_capacity(self.len());
        domain.insert_range(..);
        domain
    }

    /// Rules that are not mirrored by the neighbour's opposite rule, by name.
    #[must_use]
    pub fn asymmetries(&self) -> Vec<(&str, Direction, &str)> {
        self.rules
            .asymmetries()
            .into_iter()
            .map(|(tile, dir, other)| (self.name(tile), dir, self.name(other)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TILES: &str = "
tiles:
  - name: land
    weight: 3
    rules:
      north: [land, coast]
      east: [land, coast]
      south: [land, coast]
      west: [land, coast]
  - name: coast
    rules: { n: [land], E: [land], s: [land], w: [land] }
";

    #[test]
    fn parses_yaml_with_default_weight() {
        let tileset = Tileset::from_yaml_str(TWO_TILES).unwrap();
        assert_eq!(tileset.names(), ["land", "coast"]);
        assert_eq!(tileset.weight("land").unwrap(), 3.0);
        assert_eq!(tileset.weight("coast").unwrap(), DEFAULT_WEIGHT);
        assert_eq!(tileset.rule("coast", Direction::East).unwrap(), vec!["land"]);
        assert_eq!(tileset.id("coast").unwrap(), 1);
    }

    #[test]
    fn anchors_share_connection_lists() {
        let yaml = "
tiles:
  - name: a
    rules:
      n: &both [a, b]
      e: *both
      s: *both
      w: *both
  - name: b
    rules: { n: *both, e: *both, s: *both, w: *both }
";
        let tileset = Tileset::from_yaml_str(yaml).unwrap();
        assert_eq!(tileset.rule("b", Direction::West).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn unknown_kind_lookups_fail() {
        let tileset = Tileset::from_yaml_str(TWO_TILES).unwrap();
        assert!(matches!(tileset.weight("sea"), Err(Error::UnknownKind(_))));
        assert!(matches!(
            tileset.rule("sea", Direction::North),
            Err(Error::UnknownKind(_))
        ));
    }

    #[test]
    fn rule_named_parses_direction() {
        let tileset = Tileset::from_yaml_str(TWO_TILES).unwrap();
        assert_eq!(tileset.rule_named("coast", "s").unwrap(), vec!["land"]);
        assert!(matches!(
            tileset.rule_named("coast", "up"),
            Err(Error::InvalidDirection(_))
        ));
    }

    #[test]
    fn bad_direction_key_in_yaml_is_rejected() {
        let yaml = "
tiles:
  - name: a
    rules: { n: [a], e: [a], s: [a], w: [a], up: [a] }
";
        assert!(matches!(
            Tileset::from_yaml_str(yaml),
            Err(Error::InvalidDirection(_))
        ));
    }

    #[test]
    fn missing_rules_are_incomplete() {
        let yaml = "
tiles:
  - name: a
    rules: { n: [a], e: [a] }
";
        match Tileset::from_yaml_str(yaml) {
            Err(Error::IncompleteTileDefinition { kind, direction }) => {
                assert_eq!(kind, "a");
                assert_eq!(direction, Direction::South);
            }
            other => panic!("expected IncompleteTileDefinition, got {other:?}"),
        }
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            Tileset::from_yaml_str("tiles: 7"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Tileset::load(Path::new("no/such/tileset.yaml")).unwrap_err();
        assert!(err.to_string().contains("no/such/tileset.yaml"));
    }

    #[test]
    fn full_domain_holds_every_kind() {
        let tileset = Tileset::from_yaml_str(TWO_TILES).unwrap();
        assert_eq!(tileset.full_domain().count_ones(..), tileset.len());
    }

    #[test]
    fn mirrored_rules_have_no_asymmetries() {
        let tileset = Tileset::from_yaml_str(TWO_TILES).unwrap();
        assert!(tileset.asymmetries().is_empty());
    }

    #[test]
    fn one_sided_rule_is_named() {
        let yaml = "
tiles:
  - name: road
    rules: { n: [road, house], e: [road], s: [road], w: [road] }
  - name: house
    rules: { n: [house], e: [house], s: [house], w: [house] }
";
        let tileset = Tileset::from_yaml_str(yaml).unwrap();
        assert_eq!(
            tileset.asymmetries(),
            vec![("road", Direction::North, "house")]
        );
    }
}
