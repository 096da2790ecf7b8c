//! ε-greedy action selection

use rand::{Rng, seq::IndexedRandom};

use super::{q_table::QTable, state::State};
use crate::types::Action;

/// Pick an action for `state`.
///
/// With probability `epsilon` the action is drawn uniformly from
/// [`Action::ALL`]; otherwise it is [`QTable::greedy_action`]. The table is
/// only read. Randomness comes from `rng` alone, so a seeded generator makes
/// the choice reproducible.
pub fn select_action<R: Rng + ?Sized>(
    state: &State,
    q_table: &QTable,
    epsilon: f64,
    rng: &mut R,
) -> Action {
    if rng.random::<f64>() < epsilon {
        *Action::ALL.choose(rng).unwrap_or(&Action::Idle)
    } else {
        q_table.greedy_action(state)
    }
}
