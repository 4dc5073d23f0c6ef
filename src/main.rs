use anyhow::Result;
use clap::Parser;

use mapfuse::cli::{Cli, Commands};
use mapfuse::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Fuse(args) => commands::fuse(&cli, args),
        Commands::Classify(args) => commands::classify(&cli, args),
        Commands::Density(args) => commands::density(&cli, args),
    }
}
