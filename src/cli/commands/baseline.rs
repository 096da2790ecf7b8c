//! Baseline command - Drive the grid world with uniformly random actions

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::output::{print_kv, print_metrics, print_result, print_section},
    pipeline::{
        JsonlObserver, MetricsObserver, ProgressObserver, SharedObserver, SimulationConfig,
    },
    world::WorldConfig,
};

#[derive(Parser, Debug)]
pub struct BaselineArgs {
    /// Number of trials to run
    #[arg(long, short = 'n', default_value_t = 100)]
    pub trials: usize,

    /// Random seed for reproducibility
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Number of other cars on the grid
    #[arg(long, default_value_t = 3)]
    pub dummy_cars: usize,

    /// Let trials run past the deadline (up to the hard time limit)
    #[arg(long, default_value_t = false)]
    pub no_deadline: bool,

    /// Write one JSON line per trial to this file
    #[arg(long, short = 'o')]
    pub observations: Option<PathBuf>,

    /// Write the run summary to this JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

pub fn execute(args: BaselineArgs) -> Result<()> {
    let app = match args.seed {
        Some(seed) => App::builder().with_default_seed(seed).build(),
        None => App::new(),
    };

    print_section("Random baseline");
    print_kv("Trials", &args.trials.to_string());
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let world_config = WorldConfig::default()
        .with_dummy_cars(args.dummy_cars)
        .with_enforce_deadline(!args.no_deadline);
    let mut world = app.create_world(world_config)?;
    let mut driver = app.create_random_driver("Random");

    let metrics = SharedObserver::new(MetricsObserver::new());
    let mut simulator = app
        .create_simulator(SimulationConfig {
            trials: args.trials,
            seed: None,
        })?
        .with_observer(Box::new(metrics.clone()));
    if !args.no_progress {
        simulator = simulator.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        simulator = simulator.with_observer(Box::new(observer));
    }

    let result = simulator.run(&mut world, &mut driver)?;

    print_result(&result);
    print_metrics(&metrics.lock().summary());

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
