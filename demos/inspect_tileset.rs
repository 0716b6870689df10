use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, warn};
use wave_function_grid::{ALL_DIRECTIONS, Tileset};

/// Print the kinds, weights and adjacency rules of a tileset.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[arg(default_value = "demos/tiles/roads.yaml")]
    tileset: PathBuf,

    /// Also list every allowed neighbour.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::WARN).init();
    let args = Args::parse();

    let tileset = Tileset::load(&args.tileset)?;
    println!("Tileset           : {}", args.tileset.display());
    println!("Number of kinds   : {}", tileset.len());

    let total: f64 = tileset.weights().iter().sum();
    for (name, weight) in tileset.names().iter().zip(tileset.weights()) {
        let share = if total > 0.0 { weight / total } else { 0.0 };
        println!("{name:<12} weight {weight:>6.2} ({:>5.1}%)", share * 100.0);
        if args.verbose {
            for dir in ALL_DIRECTIONS {
                println!("    {dir:<5}: {}", tileset.rule(name, dir)?.join(", "));
            }
        }
    }

    let asymmetries = tileset.asymmetries();
    for (kind, dir, other) in &asymmetries {
        warn!(
            "{kind} allows {other} to its {dir}, but {other} does not allow {kind} to its {}",
            dir.opposite()
        );
    }
    if asymmetries.is_empty() {
        println!("All rules are symmetric");
    }
    Ok(())
}
