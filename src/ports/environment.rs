//! Environment port - the sensor/actuator interface seen by a driver

use crate::types::{Action, Percepts, Pose};

/// Sensing and action execution for the primary car.
///
/// The world behind this trait keeps the grid, the other traffic, the
/// intersection rules and the primary car's deadline. A driver only ever sees
/// what the car could see from its current intersection.
///
/// # Examples
///
/// ```no_run
/// use smartcab::{Action, ports::Environment};
///
/// fn creep_forward(env: &mut dyn Environment) -> f64 {
///     env.act(Action::Forward)
/// }
/// ```
pub trait Environment {
    /// Light colour and the intent of vehicles to the left, right and
    /// oncoming at the primary car's intersection.
    fn sense(&self) -> Percepts;

    /// Remaining ticks before the trial is failed.
    ///
    /// Becomes negative when the deadline is not enforced and the car keeps
    /// driving past it.
    fn deadline(&self) -> i32;

    /// Apply `action` to the primary car and return the reward.
    ///
    /// Illegal moves are not an error: the car stays put and the reward is
    /// negative.
    fn act(&mut self, action: Action) -> f64;

    /// The actions the environment accepts, in canonical order.
    fn valid_actions(&self) -> &[Action];

    /// Location and heading of the primary car.
    ///
    /// Route planners read this to compute the next waypoint.
    fn pose(&self) -> Pose;
}
