//! Pure aggregate functions over a filtered view.
//!
//! Everything here reads a dataset plus a slice of row indices and computes
//! derived statistics without touching engine state. Aggregates over an
//! empty view are `NaN`, an explicit "no outcomes satisfy the constraints"
//! signal rather than a division-by-zero crash.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, OutcomeRow};
use crate::states::{EC_WIN_THRESHOLD, JURISDICTIONS, STATE_CODES};

/// The two major parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// The Democratic side of each simulated outcome.
    Democratic,
    /// The Republican side (always `1 − Democratic` in this data).
    Republican,
}

/// Win probabilities and expected electoral votes over a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinStatistics {
    /// Fraction of rows where the Democratic side reaches 270 EC.
    pub dem_win_fraction: f64,
    /// Complementary Republican-win fraction.
    pub rep_win_fraction: f64,
    /// Mean Democratic electoral votes over the whole view.
    pub mean_dem_ec: f64,
    /// Mean Democratic electoral votes over Democratic-won rows only.
    pub mean_dem_ec_when_dem_wins: f64,
    /// Mean Republican electoral votes over Republican-won rows only.
    pub mean_rep_ec_when_rep_wins: f64,
}

/// Computes win fractions and expected electoral votes for a view.
///
/// A row counts as a Democratic win at `dem_ec >= 270`; everything else is
/// a Republican win. All five fields are `NaN` when the view is empty, and
/// the conditional means are `NaN` when their side never wins.
#[must_use]
pub fn win_statistics(dataset: &Dataset, view: &[usize]) -> WinStatistics {
    let n = view.len();
    let mut dem_wins = 0usize;
    let mut ec_sum = 0.0;
    let mut dem_win_ec_sum = 0.0;
    let mut rep_win_ec_sum = 0.0;

    for &idx in view {
        let row = dataset.row(idx);
        let ec = f64::from(row.dem_ec());
        ec_sum += ec;
        if row.dem_ec() >= EC_WIN_THRESHOLD {
            dem_wins += 1;
            dem_win_ec_sum += ec;
        } else {
            rep_win_ec_sum += f64::from(row.rep_ec());
        }
    }

    let rep_wins = n - dem_wins;
    let count = |c: usize| c as f64; // views are far below 2^52 rows

    WinStatistics {
        dem_win_fraction: count(dem_wins) / count(n),
        rep_win_fraction: count(rep_wins) / count(n),
        mean_dem_ec: ec_sum / count(n),
        mean_dem_ec_when_dem_wins: dem_win_ec_sum / count(dem_wins),
        mean_rep_ec_when_rep_wins: rep_win_ec_sum / count(rep_wins),
    }
}

/// Per-state fraction of view rows where the Democratic share is at least
/// 0.5, aligned with the canonical state order. `NaN` entries on an empty
/// view.
#[must_use]
pub fn per_state_win_chance(dataset: &Dataset, view: &[usize]) -> Vec<f64> {
    let n = view.len() as f64;
    (0..JURISDICTIONS)
        .map(|state| {
            let wins = view
                .iter()
                .filter(|&&idx| dataset.row(idx).dem_share(state) >= 0.5)
                .count();
            wins as f64 / n
        })
        .collect()
}

/// Mean Democratic vote share per state over the view, aligned with the
/// canonical state order. `NaN` entries on an empty view.
#[must_use]
pub fn mean_state_shares(dataset: &Dataset, view: &[usize]) -> Vec<f64> {
    let n = view.len() as f64;
    (0..JURISDICTIONS)
        .map(|state| {
            let sum: f64 = view.iter().map(|&idx| dataset.row(idx).dem_share(state)).sum();
            sum / n
        })
        .collect()
}

/// Per-row count of states won by `party`, aligned with the view's order.
#[must_use]
pub fn states_won_counts(dataset: &Dataset, view: &[usize], party: Party) -> Vec<u8> {
    view.iter()
        .map(|&idx| match party {
            Party::Democratic => dataset.row(idx).dem_states_won(),
            Party::Republican => dataset.row(idx).rep_states_won(),
        })
        .collect()
}

/// One state's result within a single outcome.
///
/// Serialize-only: summaries are outputs shipped to presentation layers,
/// never read back in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateResult {
    /// Jurisdiction code.
    pub code: &'static str,
    /// The winning party (ties at 0.5 go to the Democratic side).
    pub winner: Party,
    /// Victory margin in percentage points: `|2·share − 1| · 100`.
    pub margin_points: f64,
}

/// Descriptive summary of a single outcome row.
///
/// Plain data fields only; presentation is the caller's concern.
/// Serialize-only, like [`StateResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeSummary {
    /// Democratic electoral votes.
    pub dem_ec: u16,
    /// Republican electoral votes.
    pub rep_ec: u16,
    /// Democratic national popular vote, in percent.
    pub dem_natl_vote_pct: f64,
    /// Republican national popular vote, in percent.
    pub rep_natl_vote_pct: f64,
    /// Democratic states won.
    pub dem_states_won: u8,
    /// Republican states won.
    pub rep_states_won: u8,
    /// Per-state winner and margin, in canonical state order.
    pub states: Vec<StateResult>,
}

/// Summarizes one outcome row.
#[must_use]
pub fn single_outcome_summary(row: &OutcomeRow) -> OutcomeSummary {
    let states = STATE_CODES
        .iter()
        .enumerate()
        .map(|(idx, code)| {
            let share = row.dem_share(idx);
            StateResult {
                code,
                winner: if share >= 0.5 {
                    Party::Democratic
                } else {
                    Party::Republican
                },
                margin_points: (2.0 * share - 1.0).abs() * 100.0,
            }
        })
        .collect();

    OutcomeSummary {
        dem_ec: row.dem_ec(),
        rep_ec: row.rep_ec(),
        dem_natl_vote_pct: row.natl_pop_vote() * 100.0,
        rep_natl_vote_pct: (1.0 - row.natl_pop_vote()) * 100.0,
        dem_states_won: row.dem_states_won(),
        rep_states_won: row.rep_states_won(),
        states,
    }
}

/// Converts a point lead into a two-party vote share.
///
/// A +4 lead means 52% of the two-party vote.
#[must_use]
pub fn point_lead_to_vote_share(lead: f64) -> f64 {
    0.5 + lead / 200.0
}

/// Converts a two-party vote share into a point lead over the other side.
#[must_use]
pub fn vote_share_to_point_lead(share: f64) -> f64 {
    (share - (1.0 - share)) * 100.0
}
