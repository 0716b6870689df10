use rayon::prelude::*;
use tracing::info;

use crate::{Outcome, Solver, SolverConfig, Tileset};

/// Run one independent solver per seed, in parallel, to completion.
///
/// Outcomes come back in the order of `seeds`; `config.seed` is ignored.
#[must_use]
pub fn solve_batch(tileset: &Tileset, config: &SolverConfig, seeds: &[u64]) -> Vec<Outcome> {
    let outcomes: Vec<Outcome> = seeds
        .par_iter()
        .map(|&seed| Solver::new(tileset, &config.clone().with_seed(seed)).run())
        .collect();
    let solved = outcomes.iter().filter(|outcome| outcome.is_solved()).count();
    info!(runs = outcomes.len(), solved, "batch finished");
    outcomes
}
