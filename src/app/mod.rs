//! Application layer: configuration and wiring.
//!
//! The [`App`] container turns configuration values into a ready-to-run
//! world, agent and simulator, applying a default seed when one is set so
//! that a whole run can be reproduced from a single number.
//!
//! # Usage
//!
//! ```
//! use smartcab::app::{AgentConfig, App};
//! use smartcab::world::WorldConfig;
//!
//! let app = App::for_testing().with_default_seed(42).build();
//! let agent = app.create_agent(AgentConfig::default())?;
//! let world = app.create_world(WorldConfig::default())?;
//! # Ok::<(), smartcab::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::AgentConfig;
pub use container::{App, AppBuilder};
