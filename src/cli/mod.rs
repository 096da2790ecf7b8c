//! CLI infrastructure for the smartcab simulator
//!
//! This module provides the command-line interface for training the learning
//! agent and for running the random baseline in the grid world.

pub mod commands;
pub mod output;
