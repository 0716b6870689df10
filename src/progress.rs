use indicatif::{ProgressBar, ProgressStyle};

use crate::Grid;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} cells ({msg})";

/// Progress bar tracking how many open cells have been resolved.
pub struct SolveProgress {
    progress_bar: ProgressBar,
    resolved: usize,
}

impl SolveProgress {
    /// A bar sized to the grid's currently open cells.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        let open = grid.open_cells().len();
        let pb = ProgressBar::new(open as u64);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.set_message("0 contradictions");
        Self {
            progress_bar: pb,
            resolved: 0,
        }
    }

    /// A bar that draws nothing, for tests and batch runs.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            progress_bar: ProgressBar::hidden(),
            resolved: 0,
        }
    }

    /// Move the bar to the number of cells no longer open.
    pub fn update(&mut self, open_at_start: usize, grid: &Grid) {
        let open = grid.open_cells().len();
        self.resolved = open_at_start.saturating_sub(open);
        self.progress_bar.set_position(self.resolved as u64);
        self.progress_bar
            .set_message(format!("{} contradictions", grid.contradictions().len()));
    }

    /// Cells resolved so far.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Print a line above the bar.
    pub fn println(&self, message: impl AsRef<str>) {
        self.progress_bar.println(message);
    }

    /// Finish and clear the bar.
    pub fn finish(self) {
        self.progress_bar.finish_and_clear();
    }
}
