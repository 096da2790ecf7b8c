//! Shortest-route waypoint planner for the grid world

use crate::{
    ports::{Environment, RoutePlanner},
    types::{Action, Location, Pose},
};

/// Next move from `pose` toward `destination`, ignoring traffic.
///
/// Closes the east-west gap first, then the north-south gap. A destination
/// directly behind the car resolves to `Right`; the car goes around the block.
pub fn waypoint_toward(pose: Pose, destination: Location) -> Action {
    let dx = destination.x - pose.location.x;
    let dy = destination.y - pose.location.y;
    let (hx, hy) = pose.heading.delta();

    if dx == 0 && dy == 0 {
        Action::Idle
    } else if dx != 0 {
        if dx * hx > 0 {
            Action::Forward
        } else if dx * hx < 0 {
            Action::Right
        } else if dx * hy > 0 {
            Action::Left
        } else {
            Action::Right
        }
    } else if dy * hy > 0 {
        Action::Forward
    } else if dy * hy < 0 {
        Action::Right
    } else if dy * hx > 0 {
        Action::Right
    } else {
        Action::Left
    }
}

/// Route planner that follows [`waypoint_toward`].
#[derive(Debug, Clone, Default)]
pub struct GridRoutePlanner {
    destination: Option<Location>,
}

impl GridRoutePlanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoutePlanner for GridRoutePlanner {
    fn route_to(&mut self, destination: Option<Location>) {
        self.destination = destination;
    }

    fn destination(&self) -> Option<Location> {
        self.destination
    }

    fn next_waypoint(&self, env: &dyn Environment) -> Action {
        match self.destination {
            Some(destination) => waypoint_toward(env.pose(), destination),
            None => Action::Idle,
        }
    }
}
