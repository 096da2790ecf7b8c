//! Observer port - abstraction for simulation observation and data collection
//!
//! This port defines the interface for observing training runs, allowing
//! composable reporting without coupling the simulator to output formats.

use crate::{
    Result,
    pipeline::TrialOutcome,
    ports::TickReport,
    types::TrialSetup,
};

/// Observer trait for monitoring a simulation
///
/// # Event Sequence
///
/// 1. `on_simulation_start(total_trials)` - once at the beginning
/// 2. For each trial:
///    - `on_trial_start(trial, setup)`
///    - `on_step(trial, report)` - once per tick
///    - `on_trial_end(trial, outcome)`
/// 3. `on_simulation_end()` - once at the end
///
/// All methods default to doing nothing.
///
/// # Examples
///
/// ```no_run
/// use smartcab::{pipeline::TrialOutcome, ports::Observer};
///
/// struct ArrivalCounter {
///     arrivals: usize,
/// }
///
/// impl Observer for ArrivalCounter {
///     fn on_trial_end(&mut self, _trial: usize, outcome: &TrialOutcome) -> smartcab::Result<()> {
///         if outcome.reached_destination {
///             self.arrivals += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first trial.
    fn on_simulation_start(&mut self, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    /// Called after the world has been reset for `trial` (0-based).
    fn on_trial_start(&mut self, _trial: usize, _setup: &TrialSetup) -> Result<()> {
        Ok(())
    }

    /// Called after every tick of the driver.
    fn on_step(&mut self, _trial: usize, _report: &TickReport) -> Result<()> {
        Ok(())
    }

    /// Called when a trial is over, whether the car arrived or not.
    fn on_trial_end(&mut self, _trial: usize, _outcome: &TrialOutcome) -> Result<()> {
        Ok(())
    }

    /// Called once after the last trial.
    fn on_simulation_end(&mut self) -> Result<()> {
        Ok(())
    }
}
