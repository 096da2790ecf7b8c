//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use super::state::State;
use crate::types::Action;

/// Order in which actions challenge the `Idle` incumbent during greedy
/// selection. A challenger wins ties, so equal values favour moving.
pub const GREEDY_ORDER: [Action; 3] = [Action::Left, Action::Right, Action::Forward];

/// Q-table mapping (state, action) pairs to Q-values
///
/// Unseen pairs read as 0.0 and are only stored once written.
#[derive(Debug, Clone)]
pub struct QTable {
    /// Q-values: (state, action) -> Q-value
    q_values: HashMap<(State, Action), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Get Q-value for a state-action pair, 0.0 if never written
    pub fn get(&self, state: &State, action: Action) -> f64 {
        self.q_values
            .get(&(*state, action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: State, action: Action, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Values of every action in `state`, in canonical action order
    pub fn action_values(&self, state: &State) -> [(Action, f64); 4] {
        Action::ALL.map(|action| (action, self.get(state, action)))
    }

    /// Greedy action for `state`.
    ///
    /// `Idle` starts as the incumbent; each action of [`GREEDY_ORDER`]
    /// replaces it when its value is greater than or equal to the best so far.
    /// With every value tied the result is `Forward`.
    pub fn greedy_action(&self, state: &State) -> Action {
        let mut best_action = Action::Idle;
        let mut best_value = self.get(state, Action::Idle);
        for action in GREEDY_ORDER {
            let value = self.get(state, action);
            if value >= best_value {
                best_action = action;
                best_value = value;
            }
        }
        best_action
    }

    /// Maximum Q-value over all actions in `state`
    pub fn max_q(&self, state: &State) -> f64 {
        self.get(state, self.greedy_action(state))
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Returns the stored value. Expanded, this is
    /// `(1 - α) Q(s,a) + α r + γ α Q(s', greedy(s'))`.
    pub fn update(
        &mut self,
        state: State,
        action: Action,
        reward: f64,
        next_state: &State,
    ) -> f64 {
        let current_q = self.get(&state, action);
        let td_target = reward + self.discount_factor * self.max_q(next_state);
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
        new_q
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Iterate over every stored entry
    pub fn iter(&self) -> impl Iterator<Item = (&(State, Action), &f64)> {
        self.q_values.iter()
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}
