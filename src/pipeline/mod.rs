//! Simulation pipeline
//!
//! This module provides:
//! - The trial loop that drives a [`Driver`] through the grid world
//! - Observers for progress, metrics and JSONL trial logs
//! - A random baseline driver for comparison

pub mod baseline;
pub mod observers;
pub mod simulator;

pub use baseline::RandomDriver;
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver, TrialRecord,
};
pub use simulator::{SimulationConfig, SimulationResult, Simulator, TrialOutcome};

pub use crate::ports::{Driver, Observer};
