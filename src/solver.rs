use rand::{
    Rng, SeedableRng,
    distr::{Distribution, weighted::WeightedIndex},
    rngs::StdRng,
    seq::IndexedRandom,
};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::{
    ALL_DIRECTIONS, Direction, Error, Grid, Position, SolveProgress, SolverConfig, Tileset,
};

/// Summary of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Seed the run was generated from.
    pub seed: u64,
    /// Collapses performed.
    pub steps: usize,
    /// No cell has more than one possible kind.
    pub complete: bool,
    /// Cells left with no possible kind.
    pub contradictions: usize,
}

impl Outcome {
    /// Complete and free of contradictions.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.complete && self.contradictions == 0
    }
}

/// Drives wave function collapse over a grid, one collapse-and-propagate cycle per step.
///
/// Propagation never backtracks. A cell can run out of possible kinds; such cells count
/// as resolved for [`Solver::step`]'s return value and are reported separately by
/// [`Solver::has_contradiction`].
pub struct Solver<'a> {
    tileset: &'a Tileset,
    grid: Grid,
    rng: StdRng,
    seed: u64,
    steps: usize,
    checked: Vec<Position>,
    changed: Vec<Position>,
    just_collapsed: Option<Position>,
}

impl<'a> Solver<'a> {
    /// A solver over a fresh grid where every cell may hold any kind of `tileset`.
    ///
    /// # Panics
    ///
    /// If `config` has a zero width or height; [`SolverConfig::validate`] reports this
    /// as an error, and configs from [`SolverConfig::from_yaml_str`] are already checked.
    #[must_use]
    pub fn new(tileset: &'a Tileset, config: &SolverConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(
            seed,
            width = config.width,
            height = config.height,
            wrap = config.wrap,
            "seed is {seed}"
        );
        let grid = Grid::new(
            config.width,
            config.height,
            &tileset.full_domain(),
            config.wrap,
        );
        Self {
            tileset,
            grid,
            rng: StdRng::seed_from_u64(seed),
            seed,
            steps: 0,
            checked: Vec::new(),
            changed: Vec::new(),
            just_collapsed: None,
        }
    }

    /// Seed of the random source, for reproducing this run.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The tileset being placed.
    #[must_use]
    pub fn tileset(&self) -> &'a Tileset {
        self.tileset
    }

    /// Current grid state.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Collapses performed so far.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Cells visited by the last step's propagation, in visiting order, repeats included.
    #[must_use]
    pub fn checked_this_step(&self) -> &[Position] {
        &self.checked
    }

    /// The visited cells whose domain shrank in the last step.
    #[must_use]
    pub fn changed_this_step(&self) -> &[Position] {
        &self.changed
    }

    /// The cell collapsed by the last step, if the grid was not already complete.
    #[must_use]
    pub fn just_collapsed(&self) -> Option<Position> {
        self.just_collapsed
    }

    /// No cell has more than one possible kind.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.grid.is_complete()
    }

    /// Some cell has no possible kind.
    #[must_use]
    pub fn has_contradiction(&self) -> bool {
        self.grid.has_contradiction()
    }

    /// Collapse the most constrained cell to a weighted random kind and propagate.
    ///
    /// Returns whether the grid is complete afterwards. On an already complete grid
    /// nothing changes and the step records are left empty.
    pub fn step(&mut self) -> bool {
        self.clear_step();

        let open = self.grid.open_cells();
        let Some(min_choices) = open.iter().map(|&pos| self.grid[pos].len()).min() else {
            debug!("grid already complete");
            return true;
        };
        let open_count = open.len();
        let frontier: Vec<Position> = open
            .into_iter()
            .filter(|&pos| self.grid[pos].len() == min_choices)
            .collect();
        debug!(
            open = open_count,
            min_choices,
            frontier = frontier.len(),
            "selecting cell"
        );

        let Some(&pos) = frontier.choose(&mut self.rng) else {
            return true;
        };
        let tile = self.choose_tile(pos);
        self.collapse(pos, tile);
        self.is_complete()
    }

    /// Force the cell at `(row, col)` to `kind` and propagate, as one step.
    ///
    /// Returns whether the grid is complete afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`], [`Error::UnknownKind`], or [`Error::TileNotPossible`] when
    /// the cell has already ruled `kind` out. The grid is untouched on error.
    pub fn collapse_at(&mut self, row: usize, col: usize, kind: &str) -> Result<bool, Error> {
        let Some(cell) = self.grid.get(row, col) else {
            return Err(Error::OutOfBounds { row, col });
        };
        let tile = self.tileset.id(kind)?;
        if !cell.domain().contains(tile) {
            return Err(Error::TileNotPossible {
                row,
                col,
                kind: kind.to_string(),
            });
        }
        self.clear_step();
        self.collapse((row, col), tile);
        Ok(self.is_complete())
    }

    /// Step until the grid is complete.
    pub fn run(&mut self) -> Outcome {
        while !self.step() {}
        self.outcome()
    }

    /// Like [`Solver::run`], drawing a progress bar over the open cells.
    pub fn run_with_progress(&mut self) -> Outcome {
        let open_at_start = self.grid.open_cells().len();
        let mut progress = SolveProgress::new(&self.grid);
        progress.println(format!("seed is {}", self.seed));
        while !self.step() {
            progress.update(open_at_start, &self.grid);
        }
        progress.update(open_at_start, &self.grid);
        progress.finish();
        self.outcome()
    }

    /// Summary of the grid as it stands.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome {
            seed: self.seed,
            steps: self.steps,
            complete: self.is_complete(),
            contradictions: self.grid.contradictions().len(),
        }
    }

    fn clear_step(&mut self) {
        self.checked.clear();
        self.changed.clear();
        self.just_collapsed = None;
    }

    fn choose_tile(&mut self, pos: Position) -> usize {
        let options: Vec<usize> = self.grid[pos].choices().collect();
        let weights: Vec<f64> = options
            .iter()
            .map(|&tile| self.tileset.weight_of(tile))
            .collect();
        match WeightedIndex::new(&weights) {
            Ok(dist) => options[dist.sample(&mut self.rng)],
            // All candidates weigh zero.
            Err(_) => options[self.rng.random_range(0..options.len())],
        }
    }

    fn collapse(&mut self, pos: Position, tile: usize) {
        self.steps += 1;
        self.grid.cell_mut(pos).collapse_to(tile);
        self.just_collapsed = Some(pos);
        debug!(
            row = pos.0,
            col = pos.1,
            tile = self.tileset.name(tile),
            "collapsed cell"
        );

        self.propagate_from(pos);
        debug!(
            checked = self.checked.len(),
            changed = self.changed.len(),
            "propagation finished"
        );
    }

    /// Depth-first walk from the neighbours of `seed`, visiting N, E, S, W in turn.
    fn propagate_from(&mut self, seed: Position) {
        let mut stack = Vec::new();
        self.push_neighbours(seed, &mut stack);

        while let Some(pos) = stack.pop() {
            self.checked.push(pos);
            if self.grid[pos].len() <= 1 {
                continue;
            }

            let mut changed = false;
            for dir in ALL_DIRECTIONS {
                changed |= restrict(&mut self.grid, self.tileset, pos, dir);
            }
            trace!(
                row = pos.0,
                col = pos.1,
                choices = self.grid[pos].len(),
                changed,
                "checked cell"
            );

            if changed {
                self.changed.push(pos);
                self.push_neighbours(pos, &mut stack);
            }
        }
    }

    // Reversed so the stack pops them in N, E, S, W order.
    fn push_neighbours(&self, pos: Position, stack: &mut Vec<Position>) {
        stack.extend(
            ALL_DIRECTIONS
                .iter()
                .rev()
                .filter_map(|&dir| self.grid.neighbour(pos, dir)),
        );
    }
}

/// Narrow the cell at `pos` to the kinds its neighbour in `out_dir` permits.
///
/// Returns true if the domain shrank. A missing, empty, or fully open neighbour
/// imposes nothing.
pub(crate) fn restrict(
    grid: &mut Grid,
    tileset: &Tileset,
    pos: Position,
    out_dir: Direction,
) -> bool {
    let Some(restricter) = grid.neighbour(pos, out_dir) else {
        return false;
    };
    let domain = grid[restricter].domain();
    let size = domain.count_ones(..);
    if size == 0 || size == tileset.len() {
        return false;
    }
    let allowed = tileset.rules().allowed_by_any(domain, out_dir.opposite());
    grid.cell_mut(pos).restrict(&allowed)
}
