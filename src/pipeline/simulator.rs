//! Trial loop driving a single car through the grid world

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    ports::{Driver, Environment, Observer},
    world::GridWorld,
};

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of trials to run
    pub trials: usize,

    /// Seed handed to the driver before the first trial
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::InvalidConfiguration {
                message: "trials must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// How a single trial ended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Trial index (0-based)
    pub trial: usize,
    /// Whether the car reached its destination
    pub reached_destination: bool,
    /// Ticks taken
    pub steps: usize,
    /// Sum of rewards over the trial
    pub total_reward: f64,
    /// Ticks with a negative reward
    pub penalties: usize,
    /// Deadline left when the trial ended
    pub deadline_remaining: i32,
}

/// Result of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Name of the driver
    pub driver: String,

    /// Trials run
    pub trials: usize,

    /// Trials in which the destination was reached
    pub successes: usize,

    /// successes / trials
    pub success_rate: f64,

    /// Ticks across all trials
    pub total_steps: usize,

    /// Sum of rewards across all trials
    pub total_reward: f64,

    /// Ticks with a negative reward across all trials
    pub penalties: usize,

    /// Value table entries at the end of the run, for learning drivers
    pub table_size: Option<usize>,

    /// Success rate over the last quarter of the trials
    pub final_success_rate: f64,
}

impl SimulationResult {
    fn from_outcomes(driver: &str, outcomes: &[TrialOutcome], table_size: Option<usize>) -> Self {
        let trials = outcomes.len();
        let successes = outcomes.iter().filter(|o| o.reached_destination).count();
        let tail = &outcomes[trials - trials.div_ceil(4)..];
        let tail_successes = tail.iter().filter(|o| o.reached_destination).count();

        Self {
            driver: driver.to_string(),
            trials,
            successes,
            success_rate: ratio(successes, trials),
            total_steps: outcomes.iter().map(|o| o.steps).sum(),
            total_reward: outcomes.iter().map(|o| o.total_reward).sum(),
            penalties: outcomes.iter().map(|o| o.penalties).sum(),
            table_size,
            final_success_rate: ratio(tail_successes, tail.len()),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Runs trials of a driver in a grid world
pub struct Simulator {
    config: SimulationConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulator
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run every configured trial.
    ///
    /// Each trial resets the world, hands the new destination to the driver
    /// and then ticks until the world reports the trial done.
    pub fn run(
        &mut self,
        world: &mut GridWorld,
        driver: &mut dyn Driver,
    ) -> Result<SimulationResult> {
        self.config.validate()?;
        if let Some(seed) = self.config.seed {
            driver.set_rng_seed(seed)?;
        }

        for observer in &mut self.observers {
            observer.on_simulation_start(self.config.trials)?;
        }

        let mut outcomes = Vec::with_capacity(self.config.trials);
        for trial in 0..self.config.trials {
            let outcome = self.run_trial(trial, world, driver)?;
            for observer in &mut self.observers {
                observer.on_trial_end(trial, &outcome)?;
            }
            outcomes.push(outcome);
        }

        for observer in &mut self.observers {
            observer.on_simulation_end()?;
        }

        let result =
            SimulationResult::from_outcomes(driver.name(), &outcomes, driver.table_size());
        info!(
            driver = %result.driver,
            trials = result.trials,
            successes = result.successes,
            success_rate = result.success_rate,
            "simulation finished"
        );
        Ok(result)
    }

    fn run_trial(
        &mut self,
        trial: usize,
        world: &mut GridWorld,
        driver: &mut dyn Driver,
    ) -> Result<TrialOutcome> {
        let setup = world.reset();
        driver.reset(Some(setup.destination))?;
        for observer in &mut self.observers {
            observer.on_trial_start(trial, &setup)?;
        }

        let mut steps = 0;
        let mut total_reward = 0.0;
        let mut penalties = 0;
        while !world.is_done() {
            world.begin_tick();
            let t = world.t();
            let report = driver.update(world, t)?;
            world.end_tick();

            steps += 1;
            total_reward += report.reward;
            if report.reward < 0.0 {
                penalties += 1;
            }
            for observer in &mut self.observers {
                observer.on_step(trial, &report)?;
            }
        }

        let outcome = TrialOutcome {
            trial,
            reached_destination: world.reached_destination(),
            steps,
            total_reward,
            penalties,
            deadline_remaining: world.deadline(),
        };
        debug!(
            trial,
            reached = outcome.reached_destination,
            steps,
            total_reward,
            "trial finished"
        );
        Ok(outcome)
    }
}
