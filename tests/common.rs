//! Common test utilities for the smartcab test suite.
//!
//! This module provides a scripted environment that replays fixed percepts and
//! rewards, so agent behaviour can be checked without the grid world.

#![allow(dead_code)]

use smartcab::{
    Action, Heading, Location, Percepts, Pose,
    app::AgentConfig,
    ports::Environment,
    q_learning::LearningAgent,
};

/// Environment with a fixed position and a reward script.
///
/// The car sits at `(1, 1)` facing east, so a destination straight east
/// makes the route planner answer `forward`.
pub struct ScriptedEnv {
    pub percepts: Percepts,
    pub rewards: Vec<f64>,
    pub acted: Vec<Action>,
}

impl ScriptedEnv {
    pub fn new(percepts: Percepts, rewards: Vec<f64>) -> Self {
        Self {
            percepts,
            rewards,
            acted: Vec::new(),
        }
    }
}

impl Environment for ScriptedEnv {
    fn sense(&self) -> Percepts {
        self.percepts
    }

    fn deadline(&self) -> i32 {
        20
    }

    fn act(&mut self, action: Action) -> f64 {
        let reward = self.rewards.get(self.acted.len()).copied().unwrap_or(0.0);
        self.acted.push(action);
        reward
    }

    fn valid_actions(&self) -> &[Action] {
        &Action::ALL
    }

    fn pose(&self) -> Pose {
        Pose {
            location: Location::new(1, 1),
            heading: Heading::East,
        }
    }
}

/// Destination straight ahead of the scripted car.
pub fn destination_ahead() -> Location {
    Location::new(5, 1)
}

/// Agent that never explores.
pub fn greedy_agent() -> LearningAgent {
    LearningAgent::new(AgentConfig::default().with_epsilon(0.0))
        .unwrap()
        .with_seed(7)
}
