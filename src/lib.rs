//! # `WaveFunctionGrid`
//!
//! `WaveFunctionGrid` fills a 2D grid with tiles so that every pair of neighbours
//! obeys a tileset's adjacency rules, one wave function collapse step at a time.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]

mod batch;
mod cell;
mod config;
mod direction;
mod error;
mod grid;
mod progress;
mod rules;
mod solver;
mod tileset;
mod tileset_builder;

pub use batch::solve_batch;
pub use cell::Cell;
pub use config::SolverConfig;
pub use direction::{ALL_DIRECTIONS, Direction};
pub use error::Error;
pub use grid::{Grid, Position};
pub use progress::SolveProgress;
pub use rules::Rules;
pub use solver::{Outcome, Solver};
pub use tileset::Tileset;
pub use tileset_builder::TilesetBuilder;
