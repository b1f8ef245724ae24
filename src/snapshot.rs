//! Engine snapshots for stateless request boundaries.
//!
//! A session layer that cannot hold an engine in memory between requests
//! serializes the full engine state (original dataset, constraint store,
//! current view, change flag) into an opaque blob and restores it at the
//! start of the next interaction. JSON is the transport here; the blob's
//! layout is not a contract.

use serde::{Deserialize, Serialize};

use crate::constraint::ConstraintStore;
use crate::dataset::Dataset;
use crate::engine::{EngineState, FilterEngine};
use crate::error::{EngineError, EngineResult};

/// Serialized engine state.
#[derive(Debug, Serialize, Deserialize)]
struct EngineSnapshot {
    dataset: Dataset,
    constraints: ConstraintStore,
    view: Vec<usize>,
    changed: bool,
}

impl FilterEngine {
    /// Serializes the engine's full state into an opaque blob.
    ///
    /// # Errors
    ///
    /// Returns a snapshot error when encoding fails, or an internal error on
    /// a poisoned engine lock.
    pub fn snapshot(&self) -> EngineResult<Vec<u8>> {
        // One lock acquisition: a concurrent update must not tear the
        // constraints apart from the view they produced.
        let state = self.state_clone()?;
        let snapshot = EngineSnapshot {
            dataset: self.dataset().clone(),
            constraints: state.constraints,
            view: state.view,
            changed: state.changed,
        };
        serde_json::to_vec(&snapshot)
            .map_err(|e| EngineError::snapshot(format!("encode engine state: {e}")))
    }

    /// Reconstructs an engine from a blob produced by
    /// [`FilterEngine::snapshot`].
    ///
    /// # Errors
    ///
    /// Returns a snapshot error on a malformed blob, including structurally
    /// valid JSON whose view or constraint store does not fit the dataset.
    pub fn restore(bytes: &[u8]) -> EngineResult<Self> {
        let snapshot: EngineSnapshot = serde_json::from_slice(bytes)
            .map_err(|e| EngineError::snapshot(format!("decode engine state: {e}")))?;

        if !snapshot.constraints.is_well_formed() {
            return Err(EngineError::snapshot(
                "constraint store does not cover every jurisdiction",
            ));
        }
        if let Some(&idx) = snapshot.view.iter().find(|&&idx| idx >= snapshot.dataset.len()) {
            return Err(EngineError::snapshot(format!(
                "view index {idx} out of range for {} rows",
                snapshot.dataset.len()
            )));
        }

        Ok(Self::from_parts(
            snapshot.dataset,
            EngineState {
                constraints: snapshot.constraints,
                view: snapshot.view,
                changed: snapshot.changed,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintKey;
    use crate::dataset::RawOutcome;
    use crate::states::{ElectorTable, STATE_CODES};

    fn engine_with_shares(shares: &[f64]) -> FilterEngine {
        let raw: Vec<RawOutcome> = shares
            .iter()
            .map(|&s| RawOutcome {
                dem_shares: STATE_CODES
                    .iter()
                    .map(|code| ((*code).to_string(), s))
                    .collect(),
                natl_pop_vote: s,
            })
            .collect();
        FilterEngine::new(Dataset::build(&raw, &ElectorTable::default()).unwrap())
    }

    #[test]
    fn snapshot_roundtrip_preserves_everything() {
        let engine = engine_with_shares(&[0.4, 0.5, 0.6]);
        let key = ConstraintKey::ElectoralVotes;
        engine.update_constraint(key, Some(270.0), None).unwrap();
        engine.clear_changed().unwrap();

        let blob = engine.snapshot().unwrap();
        let restored = FilterEngine::restore(&blob).unwrap();

        assert_eq!(restored.dataset(), engine.dataset());
        assert_eq!(
            restored.current_view().unwrap(),
            engine.current_view().unwrap()
        );
        assert_eq!(
            restored.constraints().unwrap(),
            engine.constraints().unwrap()
        );
        assert!(!restored.changed_since_last_read().unwrap());
    }

    #[test]
    fn restored_engine_keeps_filtering_correctly() {
        let engine = engine_with_shares(&[0.4, 0.5, 0.6]);
        engine
            .update_constraint(ConstraintKey::ElectoralVotes, Some(270.0), None)
            .unwrap();

        let restored = FilterEngine::restore(&engine.snapshot().unwrap()).unwrap();

        // Widening on the restored engine recovers rows from its own copy
        // of the original dataset.
        restored
            .update_constraint(ConstraintKey::ElectoralVotes, Some(0.0), None)
            .unwrap();
        assert_eq!(restored.current_view().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn malformed_blob_is_a_snapshot_error() {
        let err = FilterEngine::restore(b"not json").unwrap_err();
        assert!(matches!(err, EngineError::Snapshot { .. }));

        let err = FilterEngine::restore(b"{}").unwrap_err();
        assert!(matches!(err, EngineError::Snapshot { .. }));
    }

    #[test]
    fn view_indices_beyond_the_dataset_fail_to_restore() {
        let engine = engine_with_shares(&[0.4, 0.6]);
        let mut blob: serde_json::Value =
            serde_json::from_slice(&engine.snapshot().unwrap()).unwrap();
        blob["view"] = serde_json::json!([99, 100]);

        let forged = serde_json::to_vec(&blob).unwrap();
        let err = FilterEngine::restore(&forged).unwrap_err();
        assert!(matches!(err, EngineError::Snapshot { .. }));
    }

    #[test]
    fn truncated_constraint_store_fails_to_restore() {
        let engine = engine_with_shares(&[0.4, 0.6]);
        let mut blob: serde_json::Value =
            serde_json::from_slice(&engine.snapshot().unwrap()).unwrap();
        blob["constraints"]["state_vote"] = serde_json::json!([{ "lo": 0.0, "hi": 1.0 }]);

        let forged = serde_json::to_vec(&blob).unwrap();
        let err = FilterEngine::restore(&forged).unwrap_err();
        assert!(matches!(err, EngineError::Snapshot { .. }));
    }
}
