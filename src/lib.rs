//! Smartcab: a tabular Q-learning driver for a grid-world city
//!
//! This crate provides:
//! - A Q-learning agent with an explicit state abstraction, ε-greedy policy
//!   and one-step temporal difference update
//! - Ports for the environment, route planner, driver and observers
//! - A grid world with traffic lights and background traffic to train in
//! - A trial simulator with progress, metrics and JSONL observers
//! - A command-line interface for training runs

pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;
pub mod world;

pub use error::{Error, Result};
pub use q_learning::{LearningAgent, QTable, State, StateEncoding};
pub use types::{Action, Heading, Light, Location, Percepts, Pose, TrialSetup};
