//! The stateful filter engine.
//!
//! A [`FilterEngine`] owns one immutable [`Dataset`] plus a mutex-guarded
//! inner state: the constraint store, the currently materialized view, and a
//! change flag. Constraint mutation and the view recomputation it triggers
//! form a single atomic unit; readers never observe a view computed against
//! a constraint set different from the one reported.
//!
//! The view is cache, not independent state: it is always derivable by
//! replaying the constraint store against the original dataset.

use std::sync::{Mutex, MutexGuard};

use log::{debug, trace};
use rand::Rng;

use crate::constraint::{ConstraintKey, ConstraintStore};
use crate::dataset::{Dataset, OutcomeRow};
use crate::error::{EngineError, EngineResult};
use crate::filter;
use crate::interval::Interval;

/// How a constraint update affected the stored interval.
///
/// The narrow/widen decision is an explicit two-way branch: narrowing can
/// only remove rows from the current view, widening forces a full re-filter
/// from the original dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintChange {
    /// The requested interval equalled the stored one; nothing happened.
    Unchanged,
    /// The interval tightened; the current view was narrowed in place.
    Narrowed,
    /// The interval loosened; the view was rebuilt from the original
    /// dataset through every stored constraint.
    Widened,
}

/// Mutable engine state, guarded as one unit.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EngineState {
    pub(crate) constraints: ConstraintStore,
    pub(crate) view: Vec<usize>,
    pub(crate) changed: bool,
}

/// The incremental constraint-filtering engine.
///
/// One instance is logically owned by one interactive session; instances
/// share no mutable state.
///
/// # Examples
///
/// ```
/// use electoscope::{ConstraintKey, Dataset, ElectorTable, FilterEngine, RawOutcome};
/// use electoscope::states::STATE_CODES;
///
/// let raw: Vec<RawOutcome> = (0..4)
///     .map(|i| RawOutcome {
///         dem_shares: STATE_CODES
///             .iter()
///             .map(|code| ((*code).to_string(), 0.4 + 0.05 * f64::from(i)))
///             .collect(),
///         natl_pop_vote: 0.5,
///     })
///     .collect();
/// let dataset = Dataset::build(&raw, &ElectorTable::default()).unwrap();
/// let engine = FilterEngine::new(dataset);
///
/// // Keep only outcomes where the Republican side takes at least 270 EC.
/// let key: ConstraintKey = "electoral".parse().unwrap();
/// engine.update_constraint(key, Some(270.0), None).unwrap();
/// assert_eq!(engine.current_view().unwrap().len(), 2);
/// ```
#[derive(Debug)]
pub struct FilterEngine {
    original: Dataset,
    state: Mutex<EngineState>,
}

impl FilterEngine {
    /// Creates an engine over a built dataset with all constraints at their
    /// domain defaults and the view covering every row.
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        let view = dataset.all_indices();
        Self {
            original: dataset,
            state: Mutex::new(EngineState {
                constraints: ConstraintStore::default(),
                view,
                // Fresh engines report changed so first readers materialize.
                changed: true,
            }),
        }
    }

    pub(crate) fn from_parts(original: Dataset, state: EngineState) -> Self {
        Self {
            original,
            state: Mutex::new(state),
        }
    }

    fn lock(&self, context: &str) -> EngineResult<MutexGuard<'_, EngineState>> {
        self.state
            .lock()
            .map_err(|_| EngineError::internal(format!("poisoned engine lock: {context}")))
    }

    /// Clones the full inner state under a single lock acquisition, so the
    /// constraints, view, and flag come from one coherent instant.
    pub(crate) fn state_clone(&self) -> EngineResult<EngineState> {
        Ok(self.lock("state_clone")?.clone())
    }

    /// The immutable original dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.original
    }

    /// Updates one key's interval, leaving unspecified bounds unchanged, and
    /// recomputes the filtered view.
    ///
    /// Tightening applies the single-key predicate to the current view.
    /// Loosening resets the key, rebuilds the view from the original dataset
    /// through every stored constraint, then applies the new interval on
    /// top. Identical bounds are a no-op and leave the change flag alone.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraintKey` for a state key with an out-of-range
    /// index, before any state is touched. Otherwise only fails on a
    /// poisoned engine lock.
    pub fn update_constraint(
        &self,
        key: ConstraintKey,
        lo: Option<f64>,
        hi: Option<f64>,
    ) -> EngineResult<ConstraintChange> {
        key.ensure_valid()?;
        let mut state = self.lock("update_constraint")?;

        let current = state.constraints.get(key);
        let target = Interval::resolve(lo, hi, current);
        if target == current {
            trace!("constraint {key} unchanged at {current}");
            return Ok(ConstraintChange::Unchanged);
        }

        let change = if target.is_subinterval_of(&current) {
            ConstraintChange::Narrowed
        } else {
            ConstraintChange::Widened
        };

        if change == ConstraintChange::Widened {
            // Rows excluded under the old interval may need to come back;
            // replay every constraint against the original dataset.
            debug!("constraint {key} widened to {target}, re-filtering {} rows", self.original.len());
            state.constraints.set(key, key.default_interval());
            state.view = filter::full_filter(&self.original, &state.constraints);
        } else {
            debug!("constraint {key} narrowed to {target} over {} rows", state.view.len());
        }

        state.constraints.set(key, target);
        state.view = filter::narrow_view(&self.original, &state.view, key, target);
        state.changed = true;

        Ok(change)
    }

    /// Resets every constraint to its domain default and restores the view
    /// to the full original dataset, in one atomic step.
    ///
    /// Sets the change flag only when some constraint was non-default.
    ///
    /// # Errors
    ///
    /// Only fails on a poisoned engine lock.
    pub fn reset_all(&self) -> EngineResult<()> {
        let mut state = self.lock("reset_all")?;
        let had_constraints = !state.constraints.is_all_default();

        state.constraints = ConstraintStore::default();
        state.view = self.original.all_indices();
        if had_constraints {
            state.changed = true;
        }
        Ok(())
    }

    /// The original row indices currently satisfying all constraints.
    ///
    /// # Errors
    ///
    /// Only fails on a poisoned engine lock.
    pub fn current_view(&self) -> EngineResult<Vec<usize>> {
        Ok(self.lock("current_view")?.view.clone())
    }

    /// Number of rows in the current view.
    ///
    /// # Errors
    ///
    /// Only fails on a poisoned engine lock.
    pub fn view_len(&self) -> EngineResult<usize> {
        Ok(self.lock("view_len")?.view.len())
    }

    /// A read-only copy of the current constraint intervals.
    ///
    /// # Errors
    ///
    /// Only fails on a poisoned engine lock.
    pub fn constraints(&self) -> EngineResult<ConstraintStore> {
        Ok(self.lock("constraints")?.constraints.clone())
    }

    /// Whether the view has changed since the flag was last cleared.
    ///
    /// # Errors
    ///
    /// Only fails on a poisoned engine lock.
    pub fn changed_since_last_read(&self) -> EngineResult<bool> {
        Ok(self.lock("changed_since_last_read")?.changed)
    }

    /// Clears the change flag after downstream consumers have caught up.
    ///
    /// # Errors
    ///
    /// Only fails on a poisoned engine lock.
    pub fn clear_changed(&self) -> EngineResult<()> {
        self.lock("clear_changed")?.changed = false;
        Ok(())
    }

    /// Draws one uniformly random row from the current view.
    ///
    /// Returns `None` when no outcome satisfies the current constraints —
    /// a valid terminal state, not a failure. Distinct calls are independent
    /// draws; reproducibility across runs is not guaranteed.
    ///
    /// # Errors
    ///
    /// Only fails on a poisoned engine lock.
    pub fn sample_one(&self) -> EngineResult<Option<(usize, OutcomeRow)>> {
        let state = self.lock("sample_one")?;
        if state.view.is_empty() {
            return Ok(None);
        }
        let pick = rand::thread_rng().gen_range(0..state.view.len());
        let row_idx = state.view[pick];
        Ok(Some((row_idx, self.original.row(row_idx).clone())))
    }
}
