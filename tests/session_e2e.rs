//! Simulates the stateless request boundary: every interaction restores the
//! engine from a blob, mutates it, and snapshots it again.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use electoscope::filter::row_matches;
use electoscope::states::STATE_CODES;
use electoscope::{
    stats, ConstraintKey, ConstraintStore, Dataset, ElectorTable, FilterEngine, RawOutcome,
};

fn build_engine(rows: usize, seed: u64) -> FilterEngine {
    let mut rng = StdRng::seed_from_u64(seed);
    let raw: Vec<RawOutcome> = (0..rows)
        .map(|_| RawOutcome {
            dem_shares: STATE_CODES
                .iter()
                .map(|code| ((*code).to_string(), rng.gen_range(0.3..0.7)))
                .collect(),
            natl_pop_vote: rng.gen_range(0.45..0.55),
        })
        .collect();
    FilterEngine::new(Dataset::build(&raw, &ElectorTable::default()).unwrap())
}

/// One "request": restore, apply the mutation, read, snapshot.
fn roundtrip<F>(blob: Vec<u8>, mutate: F) -> (Vec<u8>, Vec<usize>)
where
    F: FnOnce(&FilterEngine),
{
    let engine = FilterEngine::restore(&blob).unwrap();
    mutate(&engine);
    let view = engine.current_view().unwrap();
    (engine.snapshot().unwrap(), view)
}

#[test]
fn constraint_state_survives_request_boundaries() {
    let engine = build_engine(200, 7);
    let full_len = engine.dataset().len();
    let blob = engine.snapshot().unwrap();

    let pa: ConstraintKey = "PA".parse().unwrap();
    let (blob, view_after_narrow) = roundtrip(blob, |engine| {
        engine.update_constraint(pa, None, Some(0.5)).unwrap();
    });
    assert!(view_after_narrow.len() < full_len);

    let electoral: ConstraintKey = "electoral".parse().unwrap();
    let (blob, view_after_second) = roundtrip(blob, |engine| {
        engine
            .update_constraint(electoral, Some(269.0), None)
            .unwrap();
    });
    assert!(view_after_second.len() <= view_after_narrow.len());

    // Widening across a request boundary still recovers rows: the restored
    // engine carries its own copy of the original dataset.
    let (blob, view_after_widen) = roundtrip(blob, |engine| {
        engine.update_constraint(pa, None, Some(1.0)).unwrap();
    });
    assert!(view_after_widen.len() >= view_after_second.len());

    let (_, view_after_reset) = roundtrip(blob, |engine| {
        engine.reset_all().unwrap();
    });
    assert_eq!(view_after_reset.len(), full_len);
}

#[test]
fn changed_flag_crosses_the_boundary() {
    let engine = build_engine(50, 11);
    engine.clear_changed().unwrap();
    let blob = engine.snapshot().unwrap();

    let restored = FilterEngine::restore(&blob).unwrap();
    assert!(!restored.changed_since_last_read().unwrap());

    let key: ConstraintKey = "national".parse().unwrap();
    restored.update_constraint(key, Some(0.48), None).unwrap();
    let blob = restored.snapshot().unwrap();

    let restored = FilterEngine::restore(&blob).unwrap();
    assert!(restored.changed_since_last_read().unwrap());
}

#[test]
fn statistics_agree_before_and_after_restore() {
    let engine = build_engine(120, 3);
    let key: ConstraintKey = "states-won".parse().unwrap();
    engine.update_constraint(key, Some(20.0), None).unwrap();

    let view = engine.current_view().unwrap();
    let before = stats::win_statistics(engine.dataset(), &view);
    let chances_before = stats::per_state_win_chance(engine.dataset(), &view);

    let restored = FilterEngine::restore(&engine.snapshot().unwrap()).unwrap();
    let view = restored.current_view().unwrap();
    let after = stats::win_statistics(restored.dataset(), &view);
    let chances_after = stats::per_state_win_chance(restored.dataset(), &view);

    // Bit-level comparison so NaN aggregates still count as equal.
    assert_eq!(before.dem_win_fraction.to_bits(), after.dem_win_fraction.to_bits());
    assert_eq!(before.rep_win_fraction.to_bits(), after.rep_win_fraction.to_bits());
    assert_eq!(before.mean_dem_ec.to_bits(), after.mean_dem_ec.to_bits());
    assert_eq!(
        before.mean_dem_ec_when_dem_wins.to_bits(),
        after.mean_dem_ec_when_dem_wins.to_bits()
    );
    assert_eq!(
        before.mean_rep_ec_when_rep_wins.to_bits(),
        after.mean_rep_ec_when_rep_wins.to_bits()
    );
    let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&chances_before), bits(&chances_after));
}

#[test]
fn snapshots_taken_during_updates_stay_internally_coherent() {
    use std::sync::Arc;
    use std::thread;

    let engine = Arc::new(build_engine(150, 23));
    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            let pa: ConstraintKey = "PA".parse().unwrap();
            for step in 0..50 {
                let hi = if step % 2 == 0 { 0.55 } else { 0.65 };
                engine.update_constraint(pa, None, Some(hi)).unwrap();
            }
        })
    };

    // Every blob, whenever it was cut, must restore to a view that replaying
    // its own constraint store against the dataset reproduces exactly.
    for _ in 0..50 {
        let restored = FilterEngine::restore(&engine.snapshot().unwrap()).unwrap();
        let constraints = restored.constraints().unwrap();
        let expected: Vec<usize> = (0..restored.dataset().len())
            .filter(|&idx| {
                ConstraintStore::keys()
                    .all(|key| row_matches(restored.dataset().row(idx), key, constraints.get(key)))
            })
            .collect();
        assert_eq!(restored.current_view().unwrap(), expected);
    }
    writer.join().unwrap();
}

#[test]
fn sampling_a_restored_engine_stays_inside_the_view() {
    let engine = build_engine(80, 19);
    let key: ConstraintKey = "electoral".parse().unwrap();
    engine.update_constraint(key, Some(300.0), None).unwrap();

    let restored = FilterEngine::restore(&engine.snapshot().unwrap()).unwrap();
    let view = restored.current_view().unwrap();

    for _ in 0..10 {
        match restored.sample_one().unwrap() {
            Some((idx, row)) => {
                assert!(view.contains(&idx));
                assert!(row.rep_ec() >= 300);
            }
            None => assert!(view.is_empty()),
        }
    }
}
