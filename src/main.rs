//! CLI entry point for aligning measurement surfaces into one table

use clap::Parser;
use surfalign::io::cli::{Cli, Pipeline};
use surfalign::io::logging::init_logging;

fn main() -> surfalign::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    Pipeline::new(cli).process().map(|_| ())
}
