//! Dependency container for smartcab runs.
//!
//! The container owns run-wide defaults and provides factory methods for the
//! world, the agent and the simulator.

use super::config::AgentConfig;
use crate::{
    Result,
    pipeline::{RandomDriver, SimulationConfig, Simulator},
    q_learning::LearningAgent,
    world::{GridWorld, WorldConfig},
};

/// Seed offset for the world's generator relative to the run seed.
const WORLD_SEED_OFFSET: u64 = 0;
/// Seed offset for the driver's generator relative to the run seed.
const DRIVER_SEED_OFFSET: u64 = 1;

/// Application container.
///
/// # Examples
///
/// ```
/// use smartcab::app::{AgentConfig, App};
///
/// let app = App::new();
/// let agent = app.create_agent(AgentConfig::default().with_seed(7))?;
/// # Ok::<(), smartcab::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct App {
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create an app without a default seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for an app with custom defaults.
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// Builder alias used by tests.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Create a learning agent. A seed in `config` wins over the app default.
    pub fn create_agent(&self, config: AgentConfig) -> Result<LearningAgent> {
        let seed = config
            .seed
            .or(self.default_seed.map(|seed| seed.wrapping_add(DRIVER_SEED_OFFSET)));
        let agent = LearningAgent::new(config)?;
        Ok(match seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    /// Create the grid world. A seed in `config` wins over the app default.
    pub fn create_world(&self, mut config: WorldConfig) -> Result<GridWorld> {
        if config.seed.is_none() {
            config.seed = self
                .default_seed
                .map(|seed| seed.wrapping_add(WORLD_SEED_OFFSET));
        }
        GridWorld::new(config)
    }

    /// Create a random baseline driver seeded from the app default.
    pub fn create_random_driver(&self, name: impl Into<String>) -> RandomDriver {
        let driver = RandomDriver::new(name);
        match self.default_seed {
            Some(seed) => driver.with_seed(seed.wrapping_add(DRIVER_SEED_OFFSET)),
            None => driver,
        }
    }

    /// Create a simulator.
    ///
    /// The app default seed is not applied here: drivers are seeded when they
    /// are created, and the simulator only reseeds a driver when `config.seed`
    /// is set explicitly.
    pub fn create_simulator(&self, config: SimulationConfig) -> Result<Simulator> {
        config.validate()?;
        Ok(Simulator::new(config))
    }
}

/// Builder for constructing an app with custom defaults.
#[derive(Debug, Default)]
pub struct AppBuilder {
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed everything created by the app from `seed`.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    pub fn build(self) -> App {
        App {
            default_seed: self.default_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_creates_agent() {
        let app = App::new();
        assert!(app.create_agent(AgentConfig::default()).is_ok());
    }

    #[test]
    fn test_app_applies_default_seed() {
        let app = App::for_testing().with_default_seed(42).build();
        assert_eq!(app.default_seed(), Some(42));
        assert_eq!(App::new().default_seed(), None);
        let agent = app.create_agent(AgentConfig::default()).unwrap();
        assert_eq!(agent.config().seed, Some(43));
    }

    #[test]
    fn test_config_seed_overrides_app_default() {
        let app = App::for_testing().with_default_seed(42).build();
        let agent = app
            .create_agent(AgentConfig::default().with_seed(123))
            .unwrap();
        assert_eq!(agent.config().seed, Some(123));
    }

    #[test]
    fn test_same_seed_same_world() {
        use crate::ports::Environment;

        let app = App::for_testing().with_default_seed(9).build();
        let mut a = app.create_world(WorldConfig::default()).unwrap();
        let mut b = app.create_world(WorldConfig::default()).unwrap();
        for _ in 0..5 {
            assert_eq!(a.reset(), b.reset());
            assert_eq!(a.sense(), b.sense());
        }
    }

    #[test]
    fn test_simulator_keeps_config_seed_of_agent() {
        let app = App::for_testing().with_default_seed(42).build();
        let mut world = app.create_world(WorldConfig::default()).unwrap();
        let mut agent = app
            .create_agent(AgentConfig::default().with_seed(9))
            .unwrap();
        let mut simulator = app
            .create_simulator(SimulationConfig {
                trials: 1,
                seed: None,
            })
            .unwrap();
        assert_eq!(simulator.config().seed, None);

        simulator.run(&mut world, &mut agent).unwrap();
        assert_eq!(agent.config().seed, Some(9));
    }

    #[test]
    fn test_explicit_simulation_seed_reseeds_driver() {
        let app = App::for_testing().with_default_seed(42).build();
        let mut world = app.create_world(WorldConfig::default()).unwrap();
        let mut agent = app
            .create_agent(AgentConfig::default().with_seed(9))
            .unwrap();
        let mut simulator = app
            .create_simulator(SimulationConfig {
                trials: 1,
                seed: Some(77),
            })
            .unwrap();

        simulator.run(&mut world, &mut agent).unwrap();
        assert_eq!(agent.config().seed, Some(77));
    }

    #[test]
    fn test_simulator_rejects_zero_trials() {
        let app = App::new();
        let config = SimulationConfig {
            trials: 0,
            ..SimulationConfig::default()
        };
        assert!(app.create_simulator(config).is_err());
    }
}
