//! Error types for electoscope.
//!
//! All errors are strongly typed using thiserror. Construction-time problems
//! (malformed input columns, bad elector tables) are fatal; after a dataset
//! builds successfully, ordinary interactive use never errors — narrowing to
//! an impossible range simply yields an empty view.

use thiserror::Error;

/// Schema errors raised while building a dataset from raw outcome rows.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A raw row is missing the vote-share column for a jurisdiction.
    #[error("Row {row} is missing the vote share for {state}")]
    MissingStateColumn {
        /// Jurisdiction code.
        state: String,
        /// Zero-based input row index.
        row: usize,
    },

    /// A per-state vote share is outside [0, 1].
    #[error("Row {row} has vote share {value} for {state}, outside [0, 1]")]
    ShareOutOfRange {
        /// Jurisdiction code.
        state: String,
        /// Zero-based input row index.
        row: usize,
        /// The offending share.
        value: f64,
    },

    /// A national popular-vote share is outside [0, 1].
    #[error("Row {row} has national vote share {value}, outside [0, 1]")]
    NationalShareOutOfRange {
        /// Zero-based input row index.
        row: usize,
        /// The offending share.
        value: f64,
    },
}

/// Configuration errors raised when the elector-count table is invalid.
///
/// These indicate a misconfigured deployment, not bad interactive input.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A jurisdiction has no elector count.
    #[error("Elector table has no count for {state}")]
    MissingElectorCount {
        /// Jurisdiction code.
        state: String,
    },

    /// The table names a code outside the canonical jurisdiction set.
    #[error("Elector table names unknown jurisdiction {state}")]
    UnknownJurisdiction {
        /// The unrecognized code.
        state: String,
    },

    /// The elector counts do not sum to 538.
    #[error("Elector counts sum to {total}, expected 538")]
    ElectorTotalMismatch {
        /// The actual sum.
        total: u32,
    },
}

/// Top-level error type for the filter engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Dataset construction failed on malformed input columns.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The elector-count table is invalid.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A constraint key did not name a known state or aggregate column.
    ///
    /// The constraint store is never mutated when this is returned.
    #[error("Invalid constraint key: {key}")]
    InvalidConstraintKey {
        /// The unrecognized key.
        key: String,
    },

    /// An engine snapshot could not be encoded or decoded.
    #[error("Snapshot error: {message}")]
    Snapshot {
        /// What went wrong.
        message: String,
    },

    /// Internal error (poisoned lock or similar invariant breach).
    #[error("Internal error: {message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl EngineError {
    /// Creates a snapshot error.
    #[must_use]
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a schema error.
    #[must_use]
    pub const fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
