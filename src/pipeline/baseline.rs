//! Baseline driver that ignores everything it senses

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    ports::{Driver, Environment, RoutePlanner, TickReport},
    types::{Action, Location},
    world::GridRoutePlanner,
};

/// Picks uniformly among the environment's valid actions every tick.
pub struct RandomDriver {
    name: String,
    planner: GridRoutePlanner,
    rng: StdRng,
}

impl RandomDriver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            planner: GridRoutePlanner::new(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Driver for RandomDriver {
    fn reset(&mut self, destination: Option<Location>) -> Result<()> {
        self.planner.route_to(destination);
        Ok(())
    }

    fn update(&mut self, env: &mut dyn Environment, t: u32) -> Result<TickReport> {
        let waypoint = self.planner.next_waypoint(env);
        let percepts = env.sense();
        let deadline = env.deadline();
        let action = *env
            .valid_actions()
            .choose(&mut self.rng)
            .unwrap_or(&Action::Idle);
        let reward = env.act(action);

        Ok(TickReport {
            t,
            waypoint,
            percepts,
            deadline,
            action,
            reward,
            learned_value: None,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
