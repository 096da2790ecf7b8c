//! Train command - Run the Q-learning agent through the grid world

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    app::{AgentConfig, App},
    cli::output::{print_kv, print_metrics, print_result, print_section, print_state_values},
    pipeline::{
        JsonlObserver, MetricsObserver, ProgressObserver, SharedObserver, SimulationConfig,
    },
    q_learning::{StateEncoding, parse_observation},
    world::WorldConfig,
};

#[derive(Parser, Debug)]
pub struct TrainArgs {
    /// Number of trials to run
    #[arg(long, short = 'n', default_value_t = 100)]
    pub trials: usize,

    /// Random seed for reproducibility
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Agent configuration file (JSON); flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Learning rate α (0.0-1.0)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ (0.0 up to, not including, 1.0)
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate ε (0.0-1.0)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Multiply ε by this factor after every trial
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Lower bound for ε under decay
    #[arg(long)]
    pub min_epsilon: Option<f64>,

    /// State encoding (compact or full)
    #[arg(long)]
    pub encoding: Option<StateEncoding>,

    /// Rewards above this count as reaching the destination
    #[arg(long)]
    pub success_threshold: Option<f64>,

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

    /// After training, show the learned values for an observation
    /// (e.g. "waypoint=forward,light=green,left=none,right=none,oncoming=none")
    #[arg(long)]
    pub probe: Vec<String>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl TrainArgs {
    /// Layer the command-line overrides on top of the base configuration.
    fn agent_config(&self) -> Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => AgentConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AgentConfig::default(),
        };
        if let Some(alpha) = self.alpha {
            config = config.with_learning_rate(alpha);
        }
        if let Some(gamma) = self.gamma {
            config = config.with_discount_factor(gamma);
        }
        if let Some(epsilon) = self.epsilon {
            config = config.with_epsilon(epsilon);
        }
        if let Some(decay) = self.epsilon_decay {
            config = config.with_epsilon_decay(decay);
        }
        if let Some(min) = self.min_epsilon {
            config = config.with_min_epsilon(min);
        }
        if let Some(encoding) = self.encoding {
            config = config.with_encoding(encoding);
        }
        if let Some(threshold) = self.success_threshold {
            config = config.with_success_threshold(threshold);
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let agent_config = args.agent_config()?;
    let probes = args
        .probe
        .iter()
        .map(|text| {
            parse_observation(text).with_context(|| format!("Invalid probe '{text}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    let app = match args.seed {
        Some(seed) => App::builder().with_default_seed(seed).build(),
        None => App::new(),
    };

    print_section("Training smartcab agent");
    print_kv("Trials", &args.trials.to_string());
    print_kv("Learning rate", &agent_config.learning_rate.to_string());
    print_kv("Discount factor", &agent_config.discount_factor.to_string());
    print_kv("Epsilon", &agent_config.epsilon.to_string());
    print_kv("Encoding", agent_config.encoding.as_str());
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let world_config = WorldConfig::default()
        .with_dummy_cars(args.dummy_cars)
        .with_enforce_deadline(!args.no_deadline);
    let mut world = app.create_world(world_config)?;
    let mut agent = app.create_agent(agent_config)?;

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

    let result = simulator.run(&mut world, &mut agent)?;

    print_result(&result);
    print_metrics(&metrics.lock().summary());
    print_kv("Final epsilon", &format!("{:.4}", agent.epsilon()));

    for (percepts, waypoint) in &probes {
        let state = agent.config().encoding.encode(percepts, *waypoint);
        print_state_values(&state, agent.q_table());
    }

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!(path = %path.display(), "summary written");
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
