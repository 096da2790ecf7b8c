//! Route planner port

use crate::{
    ports::Environment,
    types::{Action, Location},
};

/// Suggests the locally optimal next move toward a destination.
///
/// The suggestion ignores lights and traffic; deciding whether it is safe to
/// follow is the driver's job.
pub trait RoutePlanner: Send {
    /// Set (or clear) the destination.
    fn route_to(&mut self, destination: Option<Location>);

    /// Current destination, if any.
    fn destination(&self) -> Option<Location>;

    /// Next move toward the destination from the car's current pose.
    ///
    /// Returns `Action::Idle` once the car is at the destination or when no
    /// destination is set.
    fn next_waypoint(&self, env: &dyn Environment) -> Action;
}
