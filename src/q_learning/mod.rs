//! Tabular Q-learning for the smartcab driver
//!
//! The learning core is split along the three things a decision tick does:
//!
//! - [`state`]: compress the raw percepts and the planner's waypoint into a
//!   small hashable [`State`]
//! - [`policy`]: pick an action ε-greedily from the [`QTable`]
//! - [`q_table`]: one-step temporal difference update of the previous
//!   `(state, action)` pair
//!
//! [`LearningAgent`] ties them together and keeps the trial bookkeeping.
//!
//! ## Update
//!
//! `Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') − Q(s,a)]`
//!
//! The previous tick's `(s, a, r)` is backed up against the current tick's
//! state `s'` before the current action is chosen, so the update always lags
//! one tick behind the action.
//!
//! ## Usage Example
//!
//! ```no_run
//! use smartcab::{
//!     app::AgentConfig,
//!     q_learning::{LearningAgent, StateEncoding},
//! };
//!
//! let config = AgentConfig::default()
//!     .with_learning_rate(0.1)
//!     .with_discount_factor(0.3)
//!     .with_epsilon(0.06)
//!     .with_encoding(StateEncoding::Compact);
//! let agent = LearningAgent::new(config)?.with_seed(42);
//! # Ok::<(), smartcab::Error>(())
//! ```

pub mod agent;
pub mod policy;
pub mod q_table;
pub mod state;

pub use agent::{LearningAgent, Transition};
pub use policy::select_action;
pub use q_table::{GREEDY_ORDER, QTable};
pub use state::{State, StateEncoding, Traffic, parse_observation};
