//! # Electoscope - incremental constraint filtering over simulated elections
//!
//! Electoscope holds a fixed dataset of simulated election outcomes and lets
//! a caller progressively narrow range constraints over it (per-state vote
//! share, national vote share, electoral-college votes, number of states won)
//! while reading aggregate statistics from the currently-valid subset.
//!
//! ## Core Concepts
//!
//! - **Dataset**: immutable table of outcome rows with derived electoral
//!   columns, built once
//! - **ConstraintStore**: one closed interval per constraint key; defaults
//!   mean "unrestricted"
//! - **FilterEngine**: applies constraint updates atomically, narrowing the
//!   current view in place when an interval tightens and re-filtering from
//!   the original dataset when it loosens
//! - **Stats**: pure aggregate functions (win probabilities, expected
//!   electoral votes, per-state summaries) over any view
//!
//! ## Usage
//!
//! ```rust,ignore
//! use electoscope::{ConstraintKey, Dataset, ElectorTable, FilterEngine, stats};
//!
//! let dataset = Dataset::build(&raw_outcomes, &ElectorTable::default())?;
//! let engine = FilterEngine::new(dataset);
//!
//! // Republican PA share capped at 49%.
//! let pa: ConstraintKey = "PA".parse()?;
//! engine.update_constraint(pa, None, Some(0.49))?;
//!
//! let view = engine.current_view()?;
//! let odds = stats::win_statistics(engine.dataset(), &view);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constraint;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod filter;
pub mod interval;
pub mod snapshot;
pub mod states;
pub mod stats;

// Re-export primary types at crate root for convenience
pub use constraint::{ConstraintKey, ConstraintStore};
pub use dataset::{Dataset, OutcomeRow, RawOutcome};
pub use engine::{ConstraintChange, FilterEngine};
pub use error::{ConfigurationError, EngineError, EngineResult, SchemaError};
pub use interval::Interval;
pub use states::{ElectorTable, EC_WIN_THRESHOLD, JURISDICTIONS, TOTAL_ELECTORS};
pub use stats::{OutcomeSummary, Party, StateResult, WinStatistics};
