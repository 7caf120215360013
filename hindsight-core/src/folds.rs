//! Experience categorization and cross-validated fold allocation
//!
//! Insight extraction trains on subsets of the experience pool. Records are
//! first split into outcome categories, then ids are dealt into folds so
//! that each fold's training pool excludes a held-out chunk. Both steps are
//! deterministic for a given seed.

use crate::error::MemoryError;
use crate::trajectory::{TrajectoryId, TrajectoryRecord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome categories over a set of trajectory records
///
/// Every record lands in exactly one category:
/// - `success`: the canonical (zero-th) trial succeeded
/// - `compare`: the first trial failed but a later retry succeeded
/// - `fail`: no trial succeeded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub success: BTreeSet<TrajectoryId>,
    pub compare: BTreeSet<TrajectoryId>,
    pub fail: BTreeSet<TrajectoryId>,
}

impl Categories {
    /// Total number of categorized records.
    pub fn len(&self) -> usize {
        self.success.len() + self.compare.len() + self.fail.len()
    }

    /// Check if no records were categorized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restrict every category to the ids in `pool`.
    pub fn in_pool(&self, pool: &[TrajectoryId]) -> Categories {
        let keep = |set: &BTreeSet<TrajectoryId>| {
            pool.iter().filter(|id| set.contains(id)).copied().collect()
        };

        Categories {
            success: keep(&self.success),
            compare: keep(&self.compare),
            fail: keep(&self.fail),
        }
    }
}

/// Split records into outcome categories.
pub fn categorize<'a>(records: impl IntoIterator<Item = &'a TrajectoryRecord>) -> Categories {
    let mut categories = Categories::default();

    for record in records {
        let first_succeeded = record.trials.first().is_some_and(|t| t.success);
        let last_succeeded = record.trials.last().is_some_and(|t| t.success);

        if first_succeeded {
            categories.success.insert(record.id);
        } else if last_succeeded {
            categories.compare.insert(record.id);
        } else {
            categories.fail.insert(record.id);
        }
    }

    categories
}

/// Deal ids into `num_folds` training pools.
///
/// The ids are shuffled once (deterministically for `seed`), split into
/// near-equal contiguous chunks, and each fold's pool is every id *outside*
/// its chunk. A record is therefore never trained on by the fold that holds
/// it out. Pools are returned sorted.
///
/// # Errors
///
/// [`MemoryError::InvalidConfig`] when `num_folds` is zero.
pub fn allocate_folds(
    ids: &[TrajectoryId],
    num_folds: usize,
    seed: u64,
) -> Result<BTreeMap<usize, Vec<TrajectoryId>>, MemoryError> {
    if num_folds == 0 {
        return Err(MemoryError::InvalidConfig(
            "num_folds must be nonzero".into(),
        ));
    }

    let mut shuffled = ids.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let base = shuffled.len() / num_folds;
    let remainder = shuffled.len() % num_folds;

    let mut folds = BTreeMap::new();
    let mut start = 0;
    for fold in 0..num_folds {
        let size = base + usize::from(fold < remainder);
        let held_out = &shuffled[start..start + size];

        let mut pool: Vec<TrajectoryId> = shuffled
            .iter()
            .filter(|id| !held_out.contains(id))
            .copied()
            .collect();
        pool.sort_unstable();

        folds.insert(fold, pool);
        start += size;
    }

    Ok(folds)
}

/// Shuffle `items` deterministically for `seed` and split into chunks of
/// `chunk_size` (the last chunk may be shorter).
///
/// A `chunk_size` of zero yields no chunks.
pub fn shuffle_chunks<T: Clone>(items: &[T], chunk_size: usize, seed: u64) -> Vec<Vec<T>> {
    if chunk_size == 0 {
        return Vec::new();
    }

    let mut shuffled = items.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    shuffled.chunks(chunk_size).map(<[T]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::{Step, Trial};
    use rstest::rstest;

    fn record(id: usize, outcomes: &[bool]) -> TrajectoryRecord {
        let trials = outcomes
            .iter()
            .map(|&success| Trial::new(success, "answer", vec![Step::new("t", "a", "o")]))
            .collect();
        TrajectoryRecord {
            id: TrajectoryId::new(id),
            question: format!("question {id}"),
            reference_answer: "answer".into(),
            trials,
            reflections: vec![],
        }
    }

    fn ids(raw: std::ops::Range<usize>) -> Vec<TrajectoryId> {
        raw.map(TrajectoryId::new).collect()
    }

    #[rstest]
    #[case::first_try_success(&[true], "success")]
    #[case::success_then_noise(&[true, false], "success")]
    #[case::recovered(&[false, true], "compare")]
    #[case::recovered_late(&[false, false, true], "compare")]
    #[case::never_recovered(&[false, false], "fail")]
    #[case::single_failure(&[false], "fail")]
    fn categorize_assigns_each_record_once(#[case] outcomes: &[bool], #[case] expected: &str) {
        let records = vec![record(0, outcomes)];
        let categories = categorize(&records);

        assert_eq!(categories.len(), 1);
        let id = TrajectoryId::new(0);
        let bucket = if categories.success.contains(&id) {
            "success"
        } else if categories.compare.contains(&id) {
            "compare"
        } else {
            "fail"
        };
        assert_eq!(bucket, expected);
    }

    #[test]
    fn categorize_is_a_partition() {
        let records = vec![
            record(0, &[true]),
            record(1, &[false, true]),
            record(2, &[false, false]),
            record(3, &[true]),
        ];
        let categories = categorize(&records);

        assert_eq!(categories.len(), records.len());
        assert!(categories.success.is_disjoint(&categories.compare));
        assert!(categories.success.is_disjoint(&categories.fail));
        assert!(categories.compare.is_disjoint(&categories.fail));
    }

    #[test]
    fn in_pool_restricts_every_category() {
        let records = vec![
            record(0, &[true]),
            record(1, &[false, true]),
            record(2, &[false]),
            record(3, &[true]),
        ];
        let categories = categorize(&records);

        let pool = ids(0..2);
        let restricted = categories.in_pool(&pool);

        assert_eq!(restricted.success, ids(0..1).into_iter().collect());
        assert_eq!(restricted.compare, ids(1..2).into_iter().collect());
        assert!(restricted.fail.is_empty());
    }

    #[test]
    fn folds_are_deterministic_per_seed() {
        let all = ids(0..10);
        let a = allocate_folds(&all, 3, 42).unwrap();
        let b = allocate_folds(&all, 3, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fold_complements_partition_the_ids() {
        let all = ids(0..10);
        let all_set: BTreeSet<TrajectoryId> = all.iter().copied().collect();
        let folds = allocate_folds(&all, 3, 7).unwrap();
        assert_eq!(folds.len(), 3);

        let mut held_out_union = BTreeSet::new();
        for pool in folds.values() {
            let pool_set: BTreeSet<TrajectoryId> = pool.iter().copied().collect();
            let held_out: BTreeSet<TrajectoryId> =
                all_set.difference(&pool_set).copied().collect();

            // Near-equal chunks: 10 ids over 3 folds is 4/3/3.
            assert!(held_out.len() == 3 || held_out.len() == 4);
            assert!(held_out_union.is_disjoint(&held_out));
            held_out_union.extend(held_out);
        }
        assert_eq!(held_out_union, all_set);
    }

    #[test]
    fn pools_are_sorted() {
        let all = ids(0..9);
        let folds = allocate_folds(&all, 2, 99).unwrap();
        for pool in folds.values() {
            assert!(pool.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn more_folds_than_ids_gives_full_pools() {
        let all = ids(0..2);
        let folds = allocate_folds(&all, 5, 0).unwrap();
        assert_eq!(folds.len(), 5);

        // Two folds each hold out one id; the rest train on everything.
        let full_pools = folds.values().filter(|p| p.len() == 2).count();
        assert_eq!(full_pools, 3);
    }

    #[test]
    fn zero_folds_is_a_config_error() {
        let err = allocate_folds(&ids(0..3), 0, 0).unwrap_err();
        assert!(matches!(err, MemoryError::InvalidConfig(_)));
    }

    #[test]
    fn empty_ids_yield_empty_pools() {
        let folds = allocate_folds(&[], 2, 0).unwrap();
        assert_eq!(folds.len(), 2);
        assert!(folds.values().all(Vec::is_empty));
    }

    #[test]
    fn shuffle_chunks_covers_all_items_once() {
        let items: Vec<usize> = (0..11).collect();
        let chunks = shuffle_chunks(&items, 4, 42);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 4);
        assert_eq!(chunks[1].len(), 4);
        assert_eq!(chunks[2].len(), 3);

        let mut seen: Vec<usize> = chunks.into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, items);
    }

    #[test]
    fn shuffle_chunks_is_deterministic_per_seed() {
        let items: Vec<usize> = (0..8).collect();
        assert_eq!(shuffle_chunks(&items, 3, 5), shuffle_chunks(&items, 3, 5));
    }

    #[test]
    fn shuffle_chunks_zero_size_yields_nothing() {
        let items = vec![1, 2, 3];
        assert!(shuffle_chunks(&items, 0, 0).is_empty());
        assert!(shuffle_chunks::<usize>(&[], 4, 0).is_empty());
    }
}
