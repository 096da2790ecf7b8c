//! The grid world: intersections, lights, background traffic and the
//! primary car's trial bookkeeping.

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{planner::waypoint_toward, traffic::TrafficLight};
use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, Heading, Light, Location, Percepts, Pose, TrialSetup},
};

/// Reward for a legal move that follows the planner.
pub const REWARD_ON_ROUTE: f64 = 2.0;
/// Reward for a legal move that leaves the planned route.
pub const REWARD_OFF_ROUTE: f64 = -0.5;
/// Reward for a move the intersection rules forbid.
pub const REWARD_VIOLATION: f64 = -1.0;
/// Bonus for arriving while the deadline is still non-negative.
pub const REWARD_ARRIVAL: f64 = 10.0;

/// Deadline ticks granted per unit of start-destination distance.
const DEADLINE_PER_STEP: i32 = 5;
/// Smallest start-destination distance a trial may use.
const MIN_TRIP_DISTANCE: i32 = 4;

/// Grid world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of intersections along the x axis
    pub width: i32,
    /// Number of intersections along the y axis
    pub height: i32,
    /// Number of randomly driving background cars
    pub dummy_cars: usize,
    /// Fail the trial as soon as the deadline reaches zero
    pub enforce_deadline: bool,
    /// Deadline at which an unenforced trial is aborted anyway
    pub hard_time_limit: i32,
    /// Random seed (None = non-deterministic)
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            dummy_cars: 3,
            enforce_deadline: true,
            hard_time_limit: -100,
            seed: None,
        }
    }
}

impl WorldConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_enforce_deadline(mut self, enforce: bool) -> Self {
        self.enforce_deadline = enforce;
        self
    }

    pub fn with_dummy_cars(mut self, count: usize) -> Self {
        self.dummy_cars = count;
        self
    }

    /// Check that a trip of the minimum length fits on the grid.
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid must be at least 1x1, got {}x{}", self.width, self.height),
            });
        }
        if (self.width - 1) + (self.height - 1) < MIN_TRIP_DISTANCE {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "a {}x{} grid has no trips of length {MIN_TRIP_DISTANCE}",
                    self.width, self.height
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarId {
    Primary,
    Dummy(usize),
}

#[derive(Debug, Clone)]
struct DummyCar {
    pose: Pose,
    intent: Action,
}

#[derive(Debug, Clone)]
struct PrimaryCar {
    pose: Pose,
    destination: Location,
    deadline: i32,
}

/// The driving environment.
///
/// The simulator resets it at the start of each trial, then for every tick
/// calls [`GridWorld::begin_tick`], lets the driver act through the
/// [`Environment`] port, and closes the tick with [`GridWorld::end_tick`].
#[derive(Debug)]
pub struct GridWorld {
    config: WorldConfig,
    lights: HashMap<Location, TrafficLight>,
    dummies: Vec<DummyCar>,
    primary: PrimaryCar,
    t: u32,
    done: bool,
    reached: bool,
    rng: StdRng,
}

impl GridWorld {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut lights = HashMap::new();
        for x in 1..=config.width {
            for y in 1..=config.height {
                lights.insert(Location::new(x, y), TrafficLight::random(&mut rng));
            }
        }

        let mut world = Self {
            config,
            lights,
            dummies: Vec::new(),
            primary: PrimaryCar {
                pose: Pose {
                    location: Location::new(1, 1),
                    heading: Heading::East,
                },
                destination: Location::new(1, 1),
                deadline: 0,
            },
            t: 0,
            done: false,
            reached: false,
            rng,
        };
        let dummies: Vec<DummyCar> = (0..world.config.dummy_cars)
            .map(|_| DummyCar {
                pose: world.random_pose(),
                intent: world.random_move(),
            })
            .collect();
        world.dummies = dummies;
        Ok(world)
    }

    /// Start a new trial: new start, destination and deadline for the primary
    /// car, fresh positions for the background traffic.
    pub fn reset(&mut self) -> TrialSetup {
        self.done = false;
        self.reached = false;
        self.t = 0;
        for light in self.lights.values_mut() {
            light.reset();
        }

        let (start, destination) = loop {
            let start = self.random_location();
            let destination = self.random_location();
            if start.distance(&destination) >= MIN_TRIP_DISTANCE {
                break (start, destination);
            }
        };
        let heading = self.random_heading();
        let deadline = start.distance(&destination) * DEADLINE_PER_STEP;

        self.primary = PrimaryCar {
            pose: Pose {
                location: start,
                heading,
            },
            destination,
            deadline,
        };
        for idx in 0..self.dummies.len() {
            let pose = self.random_pose();
            self.dummies[idx].pose = pose;
        }

        debug!(%start, %destination, deadline, "world reset");
        TrialSetup {
            start: self.primary.pose,
            destination,
            deadline,
        }
    }

    /// Advance the lights and move the background traffic for tick `t()`.
    pub fn begin_tick(&mut self) {
        let t = self.t;
        for light in self.lights.values_mut() {
            light.update(t);
        }
        for idx in 0..self.dummies.len() {
            self.drive_dummy(idx);
        }
    }

    /// Close the current tick: advance time and count the deadline down.
    pub fn end_tick(&mut self) {
        self.t += 1;
        let deadline = self.primary.deadline;
        if deadline <= self.config.hard_time_limit {
            if !self.done {
                debug!(deadline, "primary car hit the hard time limit, trial aborted");
            }
            self.done = true;
        } else if self.config.enforce_deadline && deadline <= 0 {
            if !self.done {
                debug!("primary car ran out of time, trial aborted");
            }
            self.done = true;
        }
        self.primary.deadline = deadline - 1;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn reached_destination(&self) -> bool {
        self.reached
    }

    pub fn t(&self) -> u32 {
        self.t
    }

    pub fn destination(&self) -> Location {
        self.primary.destination
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Waypoint the primary car is expected to follow.
    pub fn primary_waypoint(&self) -> Action {
        waypoint_toward(self.primary.pose, self.primary.destination)
    }

    fn pose_of(&self, car: CarId) -> Pose {
        match car {
            CarId::Primary => self.primary.pose,
            CarId::Dummy(idx) => self.dummies[idx].pose,
        }
    }

    fn intent_of(&self, car: CarId) -> Action {
        match car {
            CarId::Primary => self.primary_waypoint(),
            CarId::Dummy(idx) => self.dummies[idx].intent,
        }
    }

    fn light_at(&self, pose: Pose) -> Light {
        self.lights
            .get(&pose.location)
            .map(|light| light.light_for(pose.heading))
            .unwrap_or(Light::Red)
    }

    fn sense_for(&self, me: CarId) -> Percepts {
        let pose = self.pose_of(me);
        let mut percepts = Percepts::clear(self.light_at(pose));

        let others = std::iter::once(CarId::Primary)
            .chain((0..self.dummies.len()).map(CarId::Dummy))
            .filter(|&other| other != me);

        for other in others {
            let other_pose = self.pose_of(other);
            if other_pose.location != pose.location || other_pose.heading == pose.heading {
                continue;
            }
            let intent = self.intent_of(other);
            if other_pose.heading == pose.heading.opposite() {
                if percepts.oncoming != Action::Left {
                    percepts.oncoming = intent;
                }
            } else if other_pose.heading == pose.heading.turn_left() {
                // Heading to our left means it came in from our right.
                if percepts.right != Action::Forward && percepts.right != Action::Left {
                    percepts.right = intent;
                }
            } else if percepts.left != Action::Forward {
                percepts.left = intent;
            }
        }
        percepts
    }

    fn act_for(&mut self, car: CarId, action: Action) -> f64 {
        let pose = self.pose_of(car);
        let inputs = self.sense_for(car);
        let green = inputs.light == Light::Green;

        let heading = match action {
            Action::Idle => Some(pose.heading),
            Action::Forward => green.then_some(pose.heading),
            Action::Left => (green && matches!(inputs.oncoming, Action::Idle | Action::Left))
                .then(|| pose.heading.turn_left()),
            Action::Right => (green || inputs.left != Action::Forward)
                .then(|| pose.heading.turn_right()),
        };

        let mut reward = match heading {
            Some(_) if !action.is_move() => 0.0,
            Some(heading) => {
                let waypoint = self.intent_of(car);
                let next = Pose {
                    location: self.step_from(pose.location, heading),
                    heading,
                };
                match car {
                    CarId::Primary => self.primary.pose = next,
                    CarId::Dummy(idx) => self.dummies[idx].pose = next,
                }
                if action == waypoint {
                    REWARD_ON_ROUTE
                } else {
                    REWARD_OFF_ROUTE
                }
            }
            None => REWARD_VIOLATION,
        };

        if car == CarId::Primary && self.primary.pose.location == self.primary.destination {
            if self.primary.deadline >= 0 {
                reward += REWARD_ARRIVAL;
            }
            self.done = true;
            self.reached = true;
            debug!(t = self.t, deadline = self.primary.deadline, "primary car reached destination");
        }
        reward
    }

    fn drive_dummy(&mut self, idx: usize) {
        let car = CarId::Dummy(idx);
        let inputs = self.sense_for(car);
        let intent = self.dummies[idx].intent;
        let red = inputs.light == Light::Red;

        let allowed = match intent {
            Action::Right => !(red && inputs.left == Action::Forward),
            Action::Forward => !red,
            Action::Left => !(red || matches!(inputs.oncoming, Action::Forward | Action::Right)),
            Action::Idle => true,
        };

        if allowed {
            self.act_for(car, intent);
            self.dummies[idx].intent = self.random_move();
        } else {
            self.act_for(car, Action::Idle);
        }
        trace!(car = idx, %intent, allowed, "dummy car moved");
    }

    fn step_from(&self, location: Location, heading: Heading) -> Location {
        let (dx, dy) = heading.delta();
        Location::new(
            (location.x + dx - 1).rem_euclid(self.config.width) + 1,
            (location.y + dy - 1).rem_euclid(self.config.height) + 1,
        )
    }

    fn random_location(&mut self) -> Location {
        Location::new(
            self.rng.random_range(1..=self.config.width),
            self.rng.random_range(1..=self.config.height),
        )
    }

    fn random_heading(&mut self) -> Heading {
        *Heading::ALL.choose(&mut self.rng).unwrap_or(&Heading::East)
    }

    fn random_pose(&mut self) -> Pose {
        Pose {
            location: self.random_location(),
            heading: self.random_heading(),
        }
    }

    fn random_move(&mut self) -> Action {
        *Action::MOVES.choose(&mut self.rng).unwrap_or(&Action::Forward)
    }

    #[cfg(test)]
    fn place_primary(&mut self, pose: Pose, destination: Location, deadline: i32) {
        self.primary = PrimaryCar {
            pose,
            destination,
            deadline,
        };
    }

    #[cfg(test)]
    fn set_light(&mut self, location: Location, north_south_green: bool) {
        self.lights
            .insert(location, TrafficLight::new(north_south_green, 1000));
    }
}

impl Environment for GridWorld {
    fn sense(&self) -> Percepts {
        self.sense_for(CarId::Primary)
    }

    fn deadline(&self) -> i32 {
        self.primary.deadline
    }

    fn act(&mut self, action: Action) -> f64 {
        self.act_for(CarId::Primary, action)
    }

    fn valid_actions(&self) -> &[Action] {
        &Action::ALL
    }

    fn pose(&self) -> Pose {
        self.primary.pose
    }
}
