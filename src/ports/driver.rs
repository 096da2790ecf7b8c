//! Driver port - the agent-facing surface the simulator calls

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Environment,
    types::{Action, Location, Percepts},
};

/// What happened during one decision tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    /// Simulation time of the tick within the trial
    pub t: u32,
    /// Planner suggestion at the start of the tick
    pub waypoint: Action,
    /// Sensor reading the decision was based on
    pub percepts: Percepts,
    /// Remaining deadline when the tick started
    pub deadline: i32,
    /// Action that was executed
    pub action: Action,
    /// Reward returned by the environment
    pub reward: f64,
    /// Value written by the learner for the previous transition, if any
    pub learned_value: Option<f64>,
}

/// A car controller driven by the simulator.
///
/// The simulator calls [`Driver::reset`] once at the start of every trial and
/// [`Driver::update`] once per tick until the trial ends.
pub trait Driver: Send {
    /// Prepare for a new trial heading to `destination`.
    fn reset(&mut self, destination: Option<Location>) -> Result<()>;

    /// Sense, decide and act for one tick.
    ///
    /// The chosen action is applied through `env.act` before returning.
    fn update(&mut self, env: &mut dyn Environment, t: u32) -> Result<TickReport>;

    /// Name used in logs and summaries.
    fn name(&self) -> &str;

    /// Seed the driver's random number generator.
    ///
    /// # Default Implementation
    ///
    /// Does nothing and returns `Ok(())`.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Number of entries in the driver's value table, for learners that keep
    /// one.
    fn table_size(&self) -> Option<usize> {
        None
    }
}
