//! Jurisdiction table: the 50 states plus DC and their elector counts.
//!
//! Every dataset column and per-state statistic is aligned to the canonical
//! code order defined here, so state lookups reduce to index arithmetic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Number of jurisdictions that award electors (50 states + DC).
pub const JURISDICTIONS: usize = 51;

/// Total electoral votes across all jurisdictions.
pub const TOTAL_ELECTORS: u16 = 538;

/// Electoral votes needed to win.
pub const EC_WIN_THRESHOLD: u16 = 270;

/// Canonical jurisdiction codes, sorted ascending.
///
/// All per-state columns in a [`crate::Dataset`] use this order.
pub const STATE_CODES: [&str; JURISDICTIONS] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "IA", "ID", "IL",
    "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE",
    "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VA", "VT", "WA", "WI", "WV", "WY",
];

/// Elector counts per jurisdiction under the 2010-census apportionment,
/// aligned with [`STATE_CODES`]. Sums to [`TOTAL_ELECTORS`].
const ELECTOR_COUNTS: [u16; JURISDICTIONS] = [
    3, 9, 6, 11, 55, 9, 7, 3, 3, 29, 16, 4, 6, 4, 20, //
    11, 6, 8, 8, 11, 10, 4, 16, 10, 10, 6, 3, 15, 3, 5, //
    4, 14, 5, 6, 29, 18, 7, 7, 20, 4, 9, 3, 11, 38, 6, //
    13, 3, 12, 10, 5, 3,
];

/// Returns the canonical index for a jurisdiction code, or `None` for an
/// unknown code.
#[must_use]
pub fn state_index(code: &str) -> Option<usize> {
    STATE_CODES.binary_search(&code).ok()
}

/// Mapping from jurisdiction code to elector count.
///
/// The `Default` table carries the 2010-census apportionment. Callers with
/// a different cycle's apportionment can construct their own table; it is
/// validated at dataset build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectorTable {
    counts: BTreeMap<String, u16>,
}

impl Default for ElectorTable {
    fn default() -> Self {
        let counts = STATE_CODES
            .iter()
            .zip(ELECTOR_COUNTS.iter())
            .map(|(code, count)| ((*code).to_string(), *count))
            .collect();
        Self { counts }
    }
}

impl ElectorTable {
    /// Builds a table from an explicit code → count mapping.
    ///
    /// The mapping is not checked here; call [`ElectorTable::validate`]
    /// (done automatically by `Dataset::build`).
    #[must_use]
    pub fn new(counts: BTreeMap<String, u16>) -> Self {
        Self { counts }
    }

    /// Elector count for a jurisdiction, or `None` for an unknown code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<u16> {
        self.counts.get(code).copied()
    }

    /// Sum of all elector counts in the table.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.values().map(|c| u32::from(*c)).sum()
    }

    /// Checks that every jurisdiction has an elector count, that no unknown
    /// jurisdiction is present, and that the counts sum to 538.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when the table is incomplete, names an
    /// unknown jurisdiction, or does not sum to [`TOTAL_ELECTORS`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for code in STATE_CODES {
            if !self.counts.contains_key(code) {
                return Err(ConfigurationError::MissingElectorCount {
                    state: code.to_string(),
                });
            }
        }
        for code in self.counts.keys() {
            if state_index(code).is_none() {
                return Err(ConfigurationError::UnknownJurisdiction {
                    state: code.clone(),
                });
            }
        }
        let total = self.total();
        if total != u32::from(TOTAL_ELECTORS) {
            return Err(ConfigurationError::ElectorTotalMismatch { total });
        }
        Ok(())
    }

    /// Elector counts aligned with [`STATE_CODES`].
    ///
    /// Only meaningful after [`ElectorTable::validate`] has passed.
    pub(crate) fn aligned_counts(&self) -> Vec<u16> {
        STATE_CODES
            .iter()
            .map(|code| self.counts.get(*code).copied().unwrap_or(0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_sorted_and_complete() {
        assert_eq!(STATE_CODES.len(), JURISDICTIONS);
        let mut sorted = STATE_CODES;
        sorted.sort_unstable();
        assert_eq!(sorted, STATE_CODES);
    }

    #[test]
    fn state_index_finds_known_codes() {
        assert_eq!(state_index("AK"), Some(0));
        assert_eq!(state_index("WY"), Some(JURISDICTIONS - 1));
        assert!(state_index("PA").is_some());
        assert!(state_index("DC").is_some());
        assert!(state_index("PR").is_none());
        assert!(state_index("pa").is_none());
    }

    #[test]
    fn default_table_is_valid_and_sums_to_538() {
        let table = ElectorTable::default();
        table.validate().unwrap();
        assert_eq!(table.total(), 538);
        assert_eq!(table.get("CA"), Some(55));
        assert_eq!(table.get("DC"), Some(3));
        assert_eq!(table.get("TX"), Some(38));
    }

    #[test]
    fn validate_rejects_missing_jurisdiction() {
        let mut counts: BTreeMap<String, u16> = BTreeMap::new();
        counts.insert("PA".to_string(), 20);
        let table = ElectorTable::new(counts);
        let err = table.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingElectorCount { .. }
        ));
    }

    #[test]
    fn validate_rejects_unknown_jurisdiction() {
        let table = ElectorTable::default();
        let mut counts = table.counts;
        counts.insert("PR".to_string(), 0);
        let err = ElectorTable::new(counts).validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownJurisdiction { .. }));
    }

    #[test]
    fn validate_rejects_bad_total() {
        let table = ElectorTable::default();
        let mut counts = table.counts;
        counts.insert("CA".to_string(), 54);
        let err = ElectorTable::new(counts).validate().unwrap_err();
        let ConfigurationError::ElectorTotalMismatch { total } = err else {
            panic!("expected ElectorTotalMismatch, got {err:?}");
        };
        assert_eq!(total, 537);
    }

    #[test]
    fn aligned_counts_follow_canonical_order() {
        let aligned = ElectorTable::default().aligned_counts();
        assert_eq!(aligned.len(), JURISDICTIONS);
        let pa = state_index("PA").unwrap();
        assert_eq!(aligned[pa], 20);
    }
}
