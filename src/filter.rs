//! Row predicates and view (re)computation.
//!
//! All predicates are expressed in Republican polarity: a row's Republican
//! value for a key is derived from the stored Democratic columns
//! (`1 − share`, `538 − dem_ec`, `51 − dem_states_won`) and kept when it
//! falls inside the key's closed interval.

use crate::constraint::{ConstraintKey, ConstraintStore};
use crate::dataset::{Dataset, OutcomeRow};
use crate::interval::Interval;

/// Returns true when `row` satisfies `interval` for `key`.
#[must_use]
pub fn row_matches(row: &OutcomeRow, key: ConstraintKey, interval: Interval) -> bool {
    let rep_value = match key {
        ConstraintKey::StateVote(idx) => 1.0 - row.dem_share(idx),
        ConstraintKey::NationalVote => 1.0 - row.natl_pop_vote(),
        ConstraintKey::ElectoralVotes => f64::from(row.rep_ec()),
        ConstraintKey::StatesWon => f64::from(row.rep_states_won()),
    };
    interval.contains(rep_value)
}

/// Narrows an existing view by a single key's interval.
///
/// This is the cheap path: O(view). It is only sound when the interval is a
/// subinterval of the previously applied one, which the engine guarantees.
pub(crate) fn narrow_view(
    dataset: &Dataset,
    view: &[usize],
    key: ConstraintKey,
    interval: Interval,
) -> Vec<usize> {
    view.iter()
        .copied()
        .filter(|&idx| row_matches(dataset.row(idx), key, interval))
        .collect()
}

/// Rebuilds the view from the original dataset through every stored
/// constraint (logical AND across all intervals).
///
/// This is the expensive path: O(dataset). It is the only sound way to
/// recover rows after a constraint loosens, since excluded rows carry no
/// per-constraint provenance.
pub(crate) fn full_filter(dataset: &Dataset, constraints: &ConstraintStore) -> Vec<usize> {
    let active = constraints.active_keys();
    dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active
                .iter()
                .all(|&key| row_matches(row, key, constraints.get(key)))
        })
        .map(|(idx, _)| idx)
        .collect()
}
