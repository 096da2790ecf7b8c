//! Ports (trait boundaries) for the agent's collaborators.
//!
//! The learning core owns these traits. The grid world, the route planner and
//! the simulator's observers are adapters that implement them, so the agent can
//! be driven by the bundled world or by a scripted stand-in in tests.

pub mod driver;
pub mod environment;
pub mod observer;
pub mod planner;

pub use driver::{Driver, TickReport};
pub use environment::Environment;
pub use observer::Observer;
pub use planner::RoutePlanner;
