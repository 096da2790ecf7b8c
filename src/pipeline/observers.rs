//! Observer implementations for the simulator
//!
//! Observers collect data during a run without coupling the trial loop to
//! specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::simulator::TrialOutcome;
use crate::{
    Result,
    ports::{Observer, TickReport},
    types::TrialSetup,
};

/// Complete record of one trial, as written by [`JsonlObserver`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Trial index
    pub trial: usize,
    /// Starting conditions
    pub setup: Option<TrialSetup>,
    /// How the trial ended
    pub outcome: TrialOutcome,
    /// Every tick of the trial
    pub steps: Vec<TickReport>,
}

/// Progress bar observer - Shows simulation progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    arrivals: usize,
    failures: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            arrivals: 0,
            failures: 0,
        }
    }

    fn message(&self) -> String {
        format!("arrived:{} failed:{}", self.arrivals, self.failures)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_simulation_start(&mut self, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, trial: usize, outcome: &TrialOutcome) -> Result<()> {
        if outcome.reached_destination {
            self.arrivals += 1;
        } else {
            self.failures += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(trial as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_simulation_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks arrival and penalty statistics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    trials: usize,
    arrivals: usize,
    penalties: usize,
    steps: Vec<usize>,
    rewards: Vec<f64>,
    first_arrival: Option<usize>,
    last_failure: Option<usize>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of completed trials that reached the destination
    pub fn arrival_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.arrivals as f64 / self.trials as f64
        }
    }

    /// Mean number of ticks per trial
    pub fn avg_steps(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            self.steps.iter().sum::<usize>() as f64 / self.steps.len() as f64
        }
    }

    /// Mean total reward per trial
    pub fn avg_reward(&self) -> f64 {
        if self.rewards.is_empty() {
            0.0
        } else {
            self.rewards.iter().sum::<f64>() / self.rewards.len() as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            trials: self.trials,
            arrivals: self.arrivals,
            arrival_rate: self.arrival_rate(),
            penalties: self.penalties,
            avg_steps: self.avg_steps(),
            avg_reward: self.avg_reward(),
            first_arrival: self.first_arrival,
            last_failure: self.last_failure,
        }
    }
}

/// Summary of simulation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub trials: usize,
    pub arrivals: usize,
    pub arrival_rate: f64,
    pub penalties: usize,
    pub avg_steps: f64,
    pub avg_reward: f64,
    /// First trial that reached the destination
    pub first_arrival: Option<usize>,
    /// Last trial that did not
    pub last_failure: Option<usize>,
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _trial: usize, report: &TickReport) -> Result<()> {
        if report.reward < 0.0 {
            self.penalties += 1;
        }
        Ok(())
    }

    fn on_trial_end(&mut self, trial: usize, outcome: &TrialOutcome) -> Result<()> {
        self.trials += 1;
        self.steps.push(outcome.steps);
        self.rewards.push(outcome.total_reward);
        if outcome.reached_destination {
            self.arrivals += 1;
            self.first_arrival.get_or_insert(trial);
        } else {
            self.last_failure = Some(trial);
        }
        Ok(())
    }
}

/// Shared observer - Lets the caller read an observer after the simulator
/// that owns it has finished.
///
/// Clones share the wrapped observer; hand one clone to the simulator and keep
/// the other.
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O> SharedObserver<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    /// Lock the wrapped observer. A poisoned lock still yields the data.
    pub fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O> Clone for SharedObserver<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_simulation_start(&mut self, total_trials: usize) -> Result<()> {
        self.lock().on_simulation_start(total_trials)
    }

    fn on_trial_start(&mut self, trial: usize, setup: &TrialSetup) -> Result<()> {
        self.lock().on_trial_start(trial, setup)
    }

    fn on_step(&mut self, trial: usize, report: &TickReport) -> Result<()> {
        self.lock().on_step(trial, report)
    }

    fn on_trial_end(&mut self, trial: usize, outcome: &TrialOutcome) -> Result<()> {
        self.lock().on_trial_end(trial, outcome)
    }

    fn on_simulation_end(&mut self) -> Result<()> {
        self.lock().on_simulation_end()
    }
}

/// JSONL observer - Writes one JSON line per trial
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_setup: Option<TrialSetup>,
    current_steps: Vec<TickReport>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_setup: None,
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_trial_start(&mut self, _trial: usize, setup: &TrialSetup) -> Result<()> {
        self.current_setup = Some(*setup);
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _trial: usize, report: &TickReport) -> Result<()> {
        self.current_steps.push(report.clone());
        Ok(())
    }

    fn on_trial_end(&mut self, trial: usize, outcome: &TrialOutcome) -> Result<()> {
        let record = TrialRecord {
            trial,
            setup: self.current_setup.take(),
            outcome: outcome.clone(),
            steps: std::mem::take(&mut self.current_steps),
        };

        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
