//! The smartcab learning agent
//!
//! Each tick backs up the previous transition against the state just observed,
//! then picks and executes a new action. The Q-table and the previous
//! transition both survive [`Driver::reset`], so what was learned near the end
//! of one trial feeds straight into the next.

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace};

use super::{policy::select_action, q_table::QTable, state::State};
use crate::{
    Result,
    app::AgentConfig,
    ports::{Driver, Environment, RoutePlanner, TickReport},
    types::{Action, Location},
    world::GridRoutePlanner,
};

/// The most recent `(state, action, reward)` triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: State,
    pub action: Action,
    pub reward: f64,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning driver
pub struct LearningAgent {
    config: AgentConfig,
    planner: Box<dyn RoutePlanner>,
    q_table: QTable,
    epsilon: f64,
    previous: Option<Transition>,
    trials: usize,
    successes: usize,
    rng: StdRng,
}

impl LearningAgent {
    /// Create an agent with a [`GridRoutePlanner`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] when a rate lies outside
    /// `[0, 1]` or the discount factor is 1.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(config.learning_rate, config.discount_factor),
            epsilon: config.epsilon,
            rng: build_rng(config.seed),
            planner: Box::new(GridRoutePlanner::new()),
            previous: None,
            trials: 0,
            successes: 0,
            config,
        })
    }

    /// Replace the route planner.
    pub fn with_planner(mut self, planner: Box<dyn RoutePlanner>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Exploration rate used for the next decision.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Trials started so far.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Ticks whose reward exceeded the success threshold.
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// `successes / trials`, or 0.0 before the first trial.
    pub fn success_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.successes as f64 / self.trials as f64
        }
    }

    pub fn previous_transition(&self) -> Option<&Transition> {
        self.previous.as_ref()
    }

    pub fn destination(&self) -> Option<Location> {
        self.planner.destination()
    }

    /// Greedy action for `state` under the current table.
    pub fn best_action(&self, state: &State) -> Action {
        self.q_table.greedy_action(state)
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
    }
}

impl Driver for LearningAgent {
    fn reset(&mut self, destination: Option<Location>) -> Result<()> {
        self.planner.route_to(destination);
        if self.trials > 0 {
            self.decay_epsilon();
        }
        self.trials += 1;
        debug!(
            trial = self.trials,
            epsilon = self.epsilon,
            table_size = self.q_table.size(),
            "agent reset"
        );
        Ok(())
    }

    fn update(&mut self, env: &mut dyn Environment, t: u32) -> Result<TickReport> {
        let waypoint = self.planner.next_waypoint(env);
        let percepts = env.sense();
        let deadline = env.deadline();
        let state = self.config.encoding.encode(&percepts, waypoint);

        let learned_value = self
            .previous
            .map(|prev| self.q_table.update(prev.state, prev.action, prev.reward, &state));

        let action = select_action(&state, &self.q_table, self.epsilon, &mut self.rng);
        let reward = env.act(action);

        if reward > self.config.success_threshold {
            self.successes += 1;
            info!(
                trial = self.trials,
                success_rate = self.success_rate(),
                "reached destination"
            );
        }

        trace!(t, %state, %action, reward, deadline, "agent tick");
        self.previous = Some(Transition {
            state,
            action,
            reward,
        });

        Ok(TickReport {
            t,
            waypoint,
            percepts,
            deadline,
            action,
            reward,
            learned_value,
        })
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        Ok(())
    }

    fn table_size(&self) -> Option<usize> {
        Some(self.q_table.size())
    }
}
