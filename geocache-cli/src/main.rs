//! Geocache CLI - Command-line interface
//!
//! Tile arithmetic and ad-hoc spatial cache queries against a points file.

mod commands;
mod error;
mod logging;

use clap::{Parser, Subcommand};

use commands::{query, tile};

#[derive(Parser)]
#[command(name = "geocache")]
#[command(version = geocache::VERSION)]
#[command(about = "Spatially indexed cache of geographic entities", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tile containing a position, and its bounds
    Tile(tile::TileArgs),
    /// Answer bounding box queries from a points file through the cache
    Query(query::QueryArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        e.exit();
    }

    let result = match cli.command {
        Commands::Tile(args) => tile::run(args),
        Commands::Query(args) => query::run(args),
    };

    if let Err(e) = result {
        e.exit();
    }
}
