use thiserror::Error;

use crate::Direction;

/// Errors raised while building a tileset or addressing the grid.
///
/// These are configuration and programmer errors. A cell whose domain empties during
/// propagation is not an error; see [`crate::Grid::has_contradiction`].
#[derive(Error, Debug)]
pub enum Error {
    /// A tile kind was referenced that the tileset never declared.
    #[error("unknown tile kind: {0}")]
    UnknownKind(String),

    /// Text that does not name one of the four cardinal directions.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    /// A declared kind is missing the rule for one direction.
    #[error("tile kind {kind} has no rule for direction {direction}")]
    IncompleteTileDefinition {
        /// The kind with the missing rule.
        kind: String,
        /// The direction left undefined.
        direction: Direction,
    },

    /// The same kind was declared twice.
    #[error("tile kind {0} declared more than once")]
    DuplicateKind(String),

    /// A weight that is negative or not a finite number.
    #[error("tile kind {kind} has invalid weight {weight}")]
    InvalidWeight {
        /// The kind carrying the weight.
        kind: String,
        /// The rejected value.
        weight: f64,
    },

    /// A tileset must declare at least one kind.
    #[error("tileset contains no tile kinds")]
    EmptyTileset,

    /// A grid needs at least one row and one column.
    #[error("grid of {width}x{height} cells is empty")]
    EmptyGrid {
        /// Requested number of columns.
        width: usize,
        /// Requested number of rows.
        height: usize,
    },

    /// A coordinate outside the grid.
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// A forced collapse asked for a kind the cell has already ruled out.
    #[error("tile kind {kind} is not possible at cell ({row}, {col})")]
    TileNotPossible {
        /// Cell row.
        row: usize,
        /// Cell column.
        col: usize,
        /// The kind that was requested.
        kind: String,
    },

    /// Malformed YAML configuration.
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
