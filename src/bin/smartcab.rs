//! smartcab CLI - Q-learning agent for a simulated self-driving cab
//!
//! This CLI provides:
//! - Training the learning agent in the grid world
//! - Running a random baseline for comparison

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(Parser)]
#[command(name = "smartcab")]
#[command(version, about = "Q-learning smartcab in a grid world", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the Q-learning agent
    Train(Box<smartcab::cli::commands::train::TrainArgs>),

    /// Run a driver that picks random actions
    Baseline(smartcab::cli::commands::baseline::BaselineArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Train(args) => smartcab::cli::commands::train::execute(*args),
        Commands::Baseline(args) => smartcab::cli::commands::baseline::execute(args),
    }
}
