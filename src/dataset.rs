//! The immutable outcome table.
//!
//! A [`Dataset`] is built once from raw simulation rows and never mutated.
//! Each built row carries two derived columns: the Democratic electoral-vote
//! tally and the Democratic states-won count. Filtering works on row indices
//! into this table, so the full dataset is always recoverable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineResult, SchemaError};
use crate::states::{ElectorTable, JURISDICTIONS, STATE_CODES};

/// One raw simulated outcome, as produced upstream.
///
/// `dem_shares` maps jurisdiction code → Democratic vote share (fraction in
/// [0, 1]). `natl_pop_vote` is the simulation-provided national Democratic
/// popular-vote share; it is an input column and is never re-derived from
/// the state shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOutcome {
    /// Democratic vote share per jurisdiction.
    pub dem_shares: BTreeMap<String, f64>,
    /// National Democratic popular-vote share.
    pub natl_pop_vote: f64,
}

/// One built outcome row with derived columns, aligned to the canonical
/// state order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRow {
    dem_shares: Vec<f64>,
    natl_pop_vote: f64,
    dem_ec: u16,
    dem_states_won: u8,
}

impl OutcomeRow {
    /// Democratic vote share for the state at the given canonical index.
    #[must_use]
    pub fn dem_share(&self, state: usize) -> f64 {
        self.dem_shares[state]
    }

    /// Democratic vote shares in canonical state order.
    #[must_use]
    pub fn dem_shares(&self) -> &[f64] {
        &self.dem_shares
    }

    /// National Democratic popular-vote share.
    #[must_use]
    pub const fn natl_pop_vote(&self) -> f64 {
        self.natl_pop_vote
    }

    /// Democratic electoral votes.
    #[must_use]
    pub const fn dem_ec(&self) -> u16 {
        self.dem_ec
    }

    /// Republican electoral votes.
    #[must_use]
    pub const fn rep_ec(&self) -> u16 {
        crate::states::TOTAL_ELECTORS - self.dem_ec
    }

    /// Number of jurisdictions the Democratic side wins in this outcome.
    #[must_use]
    pub const fn dem_states_won(&self) -> u8 {
        self.dem_states_won
    }

    /// Number of jurisdictions the Republican side wins in this outcome.
    #[must_use]
    pub const fn rep_states_won(&self) -> u8 {
        JURISDICTIONS as u8 - self.dem_states_won
    }
}

/// Immutable collection of built outcome rows.
///
/// Row identity is the index into the table; filtered views are vectors of
/// these indices and can always be regenerated from the dataset plus the
/// current constraint store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<OutcomeRow>,
}

impl Dataset {
    /// Builds a dataset from raw rows and an elector-count table.
    ///
    /// For each row the Democratic electoral-vote tally is the sum of
    /// elector counts over states with share >= 0.5. A tie at exactly 0.5
    /// is resolved in favour of the Democratic side; this is a documented
    /// policy choice (the strict-`>` alternative was considered and
    /// rejected), not a rounding artifact.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` when a state column is missing or a share is
    /// outside [0, 1], and a `ConfigurationError` when the elector table is
    /// invalid.
    pub fn build(raw: &[RawOutcome], electors: &ElectorTable) -> EngineResult<Self> {
        electors.validate()?;
        let counts = electors.aligned_counts();

        let mut rows = Vec::with_capacity(raw.len());
        for (row_idx, outcome) in raw.iter().enumerate() {
            let mut dem_shares = Vec::with_capacity(JURISDICTIONS);
            let mut dem_ec: u16 = 0;
            let mut dem_states_won: u8 = 0;

            for (state_idx, code) in STATE_CODES.iter().enumerate() {
                let Some(&share) = outcome.dem_shares.get(*code) else {
                    return Err(SchemaError::MissingStateColumn {
                        state: (*code).to_string(),
                        row: row_idx,
                    }
                    .into());
                };
                if !(0.0..=1.0).contains(&share) {
                    return Err(SchemaError::ShareOutOfRange {
                        state: (*code).to_string(),
                        row: row_idx,
                        value: share,
                    }
                    .into());
                }
                if share >= 0.5 {
                    dem_ec += counts[state_idx];
                    dem_states_won += 1;
                }
                dem_shares.push(share);
            }

            let natl = outcome.natl_pop_vote;
            if !(0.0..=1.0).contains(&natl) {
                return Err(SchemaError::NationalShareOutOfRange {
                    row: row_idx,
                    value: natl,
                }
                .into());
            }

            rows.push(OutcomeRow {
                dem_shares,
                natl_pop_vote: natl,
                dem_ec,
                dem_states_won,
            });
        }

        Ok(Self { rows })
    }

    /// Number of rows in the dataset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the dataset holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at the given original index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; view indices handed out by the
    /// engine are always valid for the dataset they came from.
    #[must_use]
    pub fn row(&self, index: usize) -> &OutcomeRow {
        &self.rows[index]
    }

    /// All rows in original order.
    #[must_use]
    pub fn rows(&self) -> &[OutcomeRow] {
        &self.rows
    }

    /// The view containing every row identity.
    #[must_use]
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.rows.len()).collect()
    }
}
