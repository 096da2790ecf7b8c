//! Grid-world driving environment
//!
//! A small city of intersections with wrap-around roads, one traffic light per
//! intersection and a handful of randomly driving cars. The primary car is
//! controlled by a [`Driver`](crate::ports::Driver) through the
//! [`Environment`](crate::ports::Environment) port.

pub mod grid;
pub mod planner;
pub mod traffic;

pub use grid::{GridWorld, WorldConfig};
pub use planner::{GridRoutePlanner, waypoint_toward};
pub use traffic::TrafficLight;
