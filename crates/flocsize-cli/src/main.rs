mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flocsize", about = "Floc particle size and shape measurement")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure every particle in a directory of micrographs
    Analyze(commands::analyze::AnalyzeArgs),
    /// Remove particles repeated across run reports
    Dedup(commands::dedup::DedupArgs),
    /// Print or save the default analysis config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Dedup(args) => commands::dedup::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
