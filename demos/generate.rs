use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::{path::PathBuf, thread, time::Duration};
use tracing::Level;
use wave_function_grid::{Grid, Solver, SolverConfig, Tileset, solve_batch};

/// Fill a grid with tiles by wave function collapse.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[arg(short, long, default_value = "demos/tiles/roads.yaml")]
    tileset: PathBuf,

    /// YAML solver config; the flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    #[arg(long)]
    wrap: bool,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Seconds to pause after drawing each step.
    #[arg(short, long, default_value_t = 0.0)]
    delay: f64,

    /// Draw open cells as their number of possible kinds.
    #[arg(long)]
    show_numbers: bool,

    /// Mark the cells checked and changed by the last step.
    #[arg(long)]
    show_changed: bool,

    /// Only draw the finished grid, with a progress bar while solving.
    #[arg(short, long)]
    quiet: bool,

    /// Solve this many consecutive seeds in parallel and print a YAML report.
    #[arg(short, long)]
    runs: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = LogLevel::Error)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl Args {
    fn solver_config(&self) -> Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => SolverConfig::load(path)?,
            None => SolverConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config.wrap |= self.wrap;
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Marker drawn before a cell when `--show-changed` is set.
fn marker(solver: &Solver<'_>, pos: (usize, usize)) -> char {
    if solver.just_collapsed() == Some(pos) {
        '>'
    } else if solver.changed_this_step().contains(&pos) {
        '+'
    } else if solver.checked_this_step().contains(&pos) {
        '.'
    } else {
        ' '
    }
}

fn render(solver: &Solver<'_>, args: &Args) -> String {
    let grid: &Grid = solver.grid();
    let tileset = solver.tileset();
    let width = tileset.names().iter().map(String::len).max().unwrap_or(1).max(2);

    let mut out = String::new();
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let cell = grid.cell_at(row, col);
            let text = match cell.tile() {
                Some(tile) => tileset.name(tile).to_string(),
                None if cell.is_contradiction() => "!!".to_string(),
                None if args.show_numbers => cell.len().to_string(),
                None => "?".to_string(),
            };
            if args.show_changed {
                out.push(marker(solver, (row, col)));
            }
            out.push_str(&format!("{text:<width$} "));
        }
        out.push('\n');
    }
    out
}

fn run_batch(tileset: &Tileset, config: &SolverConfig, runs: u64) -> Result<()> {
    let first = config.seed.unwrap_or_else(rand::random);
    let seeds: Vec<u64> = (0..runs).map(|n| first.wrapping_add(n)).collect();
    let outcomes = solve_batch(tileset, config, &seeds);
    print!("{}", serde_yaml::to_string(&outcomes)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(Level::from(args.log_level))
        .with_writer(std::io::stderr)
        .init();

    let tileset = Tileset::load(&args.tileset)?;
    let config = args.solver_config()?;

    if let Some(runs) = args.runs {
        return run_batch(&tileset, &config, runs);
    }

    let mut solver = Solver::new(&tileset, &config);
    let grid = solver.grid();
    println!(
        "{}x{} grid{}",
        grid.width(),
        grid.height(),
        if grid.wrap() { ", wrapped" } else { "" }
    );
    if args.quiet {
        solver.run_with_progress();
    } else {
        let delay = Duration::from_secs_f64(args.delay.max(0.0));
        loop {
            let done = solver.step();
            println!("step {}\n{}", solver.steps(), render(&solver, &args));
            if done {
                break;
            }
            thread::sleep(delay);
        }
    }

    let outcome = solver.outcome();
    if args.quiet {
        println!("{}", render(&solver, &args));
    }
    println!(
        "seed {} | {} steps | {} contradictions",
        outcome.seed, outcome.steps, outcome.contradictions
    );
    Ok(())
}
