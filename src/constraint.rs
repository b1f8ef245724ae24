//! Constraint keys and the constraint store.
//!
//! Every key always has a well-defined interval; the domain default denotes
//! "no effective restriction". All intervals are expressed in Republican
//! polarity: vote shares as `1 − dem_share` fractions, electoral votes as
//! `538 − dem_ec`, states won as `51 − dem_states_won`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::interval::Interval;
use crate::states::{state_index, JURISDICTIONS, STATE_CODES, TOTAL_ELECTORS};

/// Identifies which interval a range restriction applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKey {
    /// Republican vote share in one state (canonical state index).
    StateVote(usize),
    /// Republican national popular-vote share.
    NationalVote,
    /// Republican electoral-vote total.
    ElectoralVotes,
    /// Number of states the Republican side wins.
    StatesWon,
}

impl ConstraintKey {
    /// The key for a state by jurisdiction code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraintKey` for an unknown code.
    pub fn state(code: &str) -> Result<Self, EngineError> {
        state_index(code)
            .map(Self::StateVote)
            .ok_or_else(|| EngineError::InvalidConstraintKey {
                key: code.to_string(),
            })
    }

    /// Checks that a state index refers to a real jurisdiction.
    ///
    /// Keys produced by [`ConstraintKey::state`] or `FromStr` are always in
    /// range; this guards keys constructed directly with an arbitrary index.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraintKey` for an out-of-range state index.
    pub fn ensure_valid(self) -> Result<(), EngineError> {
        match self {
            Self::StateVote(idx) if idx >= JURISDICTIONS => {
                Err(EngineError::InvalidConstraintKey {
                    key: format!("state #{idx}"),
                })
            }
            _ => Ok(()),
        }
    }

    /// The unconstrained interval for this key's domain.
    #[must_use]
    pub fn default_interval(self) -> Interval {
        match self {
            Self::StateVote(_) | Self::NationalVote => Interval::new(0.0, 1.0),
            Self::ElectoralVotes => Interval::new(0.0, f64::from(TOTAL_ELECTORS)),
            Self::StatesWon => Interval::new(0.0, JURISDICTIONS as f64),
        }
    }
}

impl FromStr for ConstraintKey {
    type Err = EngineError;

    /// Parses `"national"`, `"electoral"`, `"states-won"`, or a jurisdiction
    /// code such as `"PA"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "national" => Ok(Self::NationalVote),
            "electoral" => Ok(Self::ElectoralVotes),
            "states-won" => Ok(Self::StatesWon),
            code => Self::state(code),
        }
    }
}

impl std::fmt::Display for ConstraintKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StateVote(idx) => write!(f, "{}", STATE_CODES[*idx]),
            Self::NationalVote => write!(f, "national"),
            Self::ElectoralVotes => write!(f, "electoral"),
            Self::StatesWon => write!(f, "states-won"),
        }
    }
}

/// The set of independently-tracked range constraints.
///
/// Mutated only through the engine's update path, never directly by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintStore {
    state_vote: Vec<Interval>,
    national_vote: Interval,
    electoral_votes: Interval,
    states_won: Interval,
}

impl Default for ConstraintStore {
    fn default() -> Self {
        Self {
            state_vote: vec![Interval::new(0.0, 1.0); JURISDICTIONS],
            national_vote: ConstraintKey::NationalVote.default_interval(),
            electoral_votes: ConstraintKey::ElectoralVotes.default_interval(),
            states_won: ConstraintKey::StatesWon.default_interval(),
        }
    }
}

impl ConstraintStore {
    /// The current interval for a key.
    #[must_use]
    pub fn get(&self, key: ConstraintKey) -> Interval {
        match key {
            ConstraintKey::StateVote(idx) => self.state_vote[idx],
            ConstraintKey::NationalVote => self.national_vote,
            ConstraintKey::ElectoralVotes => self.electoral_votes,
            ConstraintKey::StatesWon => self.states_won,
        }
    }

    pub(crate) fn set(&mut self, key: ConstraintKey, interval: Interval) {
        match key {
            ConstraintKey::StateVote(idx) => self.state_vote[idx] = interval,
            ConstraintKey::NationalVote => self.national_vote = interval,
            ConstraintKey::ElectoralVotes => self.electoral_votes = interval,
            ConstraintKey::StatesWon => self.states_won = interval,
        }
    }

    /// Every key in a fixed iteration order (states first, then aggregates).
    pub fn keys() -> impl Iterator<Item = ConstraintKey> {
        (0..JURISDICTIONS).map(ConstraintKey::StateVote).chain([
            ConstraintKey::NationalVote,
            ConstraintKey::ElectoralVotes,
            ConstraintKey::StatesWon,
        ])
    }

    /// Returns true when a key's interval equals its domain default.
    #[must_use]
    pub fn is_default(&self, key: ConstraintKey) -> bool {
        self.get(key) == key.default_interval()
    }

    /// Returns true when no key carries an effective restriction.
    #[must_use]
    pub fn is_all_default(&self) -> bool {
        Self::keys().all(|key| self.is_default(key))
    }

    /// Keys whose intervals differ from their domain defaults.
    #[must_use]
    pub fn active_keys(&self) -> Vec<ConstraintKey> {
        Self::keys().filter(|key| !self.is_default(*key)).collect()
    }

    /// Whether the store holds exactly one interval per jurisdiction.
    /// Deserialized stores can violate this; ones built in-process cannot.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.state_vote.len() == JURISDICTIONS
    }
}
