#![cfg(feature = "segment")]
//! Property-based tests for the segment trees.
//!
//! Every tree is checked against a plain shadow array updated by brute force.

use proptest::prelude::*;
use sylva::segment::{AssignSum, LazySegmentTree, Max, MaxAddTree, Min, Sum};

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// An update over `lo..=hi`, generated relative to a sequence length.
#[derive(Clone, Debug)]
struct RangeUpdate {
    lo: usize,
    hi: usize,
    delta: i64,
}

fn values_and_updates(
    max_len: usize,
    max_updates: usize,
) -> impl Strategy<Value = (Vec<i64>, Vec<RangeUpdate>)> {
    prop::collection::vec(-1000..1000_i64, 1..max_len).prop_flat_map(move |values| {
        let len = values.len();
        let update = (0..len, 0..len, -50..50_i64).prop_map(|(a, b, delta)| RangeUpdate {
            lo: a.min(b),
            hi: a.max(b),
            delta,
        });
        (Just(values), prop::collection::vec(update, 0..max_updates))
    })
}

fn shadow_add(shadow: &mut [i64], update: &RangeUpdate) {
    for value in &mut shadow[update.lo..=update.hi] {
        *value += update.delta;
    }
}

fn assert_every_range<F>(shadow: &[i64], mut query: F, fold: fn(&[i64]) -> i64) -> Result<(), TestCaseError>
where
    F: FnMut(usize, usize) -> i64,
{
    for lo in 0..shadow.len() {
        for hi in lo..shadow.len() {
            prop_assert_eq!(query(lo, hi), fold(&shadow[lo..=hi]), "range {}..={}", lo, hi);
        }
    }
    Ok(())
}

fn sum_of(values: &[i64]) -> i64 {
    values.iter().sum()
}

fn max_of(values: &[i64]) -> i64 {
    values.iter().copied().max().unwrap_or(i64::MIN)
}

fn min_of(values: &[i64]) -> i64 {
    values.iter().copied().min().unwrap_or(i64::MAX)
}

// =============================================================================
// Round-trip Laws
// =============================================================================

proptest! {
    /// Law: reading every point back reproduces the construction sequence.
    #[test]
    fn prop_construct_then_read_points(values in prop::collection::vec(any::<i32>(), 0..70)) {
        let tree = LazySegmentTree::new(Max::new(), values.clone());
        let points: Vec<i32> = (0..values.len()).map(|index| tree.query_point(index)).collect();
        prop_assert_eq!(&points, &values);

        let dense = MaxAddTree::new(values.clone());
        prop_assert_eq!(dense.to_vec(), values);
    }
}

// =============================================================================
// Shadow Array Laws
// =============================================================================

proptest! {
    /// Law: range sums match a shadow array under interleaved range adds.
    #[test]
    fn prop_sum_matches_shadow((values, updates) in values_and_updates(40, 25)) {
        let mut tree = LazySegmentTree::new(Sum::new(), values.clone());
        let mut shadow = values;
        assert_every_range(&shadow, |lo, hi| tree.query_range(lo, hi), sum_of)?;

        for update in &updates {
            tree.update_range(update.lo, update.hi, update.delta);
            shadow_add(&mut shadow, update);
            assert_every_range(&shadow, |lo, hi| tree.query_range(lo, hi), sum_of)?;
        }
        prop_assert_eq!(tree.to_vec(), shadow);
    }

    /// Law: range maxima and minima match a shadow array.
    #[test]
    fn prop_max_and_min_match_shadow((values, updates) in values_and_updates(40, 25)) {
        let mut max_tree = LazySegmentTree::new(Max::new(), values.clone());
        let mut min_tree = LazySegmentTree::new(Min::new(), values.clone());
        let mut shadow = values;

        for update in &updates {
            max_tree.update_range(update.lo, update.hi, update.delta);
            min_tree.update_range(update.lo, update.hi, update.delta);
            shadow_add(&mut shadow, update);
        }
        assert_every_range(&shadow, |lo, hi| max_tree.query_range(lo, hi), max_of)?;
        assert_every_range(&shadow, |lo, hi| min_tree.query_range(lo, hi), min_of)?;
    }

    /// Law: the dense max-add tree agrees with the shadow array, including
    /// point updates with negative deltas.
    #[test]
    fn prop_dense_tree_matches_shadow(
        (values, updates) in values_and_updates(40, 25),
        point_deltas in prop::collection::vec((any::<prop::sample::Index>(), -100..100_i64), 0..10)
    ) {
        let mut tree = MaxAddTree::new(values.clone());
        let mut shadow = values;

        for update in &updates {
            tree.update_range(update.lo, update.hi, update.delta);
            shadow_add(&mut shadow, update);
        }
        for (index, delta) in point_deltas {
            let index = index.index(shadow.len());
            tree.update_point(index, delta);
            shadow[index] += delta;
        }

        assert_every_range(&shadow, |lo, hi| tree.query_range(lo, hi), max_of)?;
        prop_assert_eq!(tree.query_all(), max_of(&shadow));
        prop_assert_eq!(tree.to_vec(), shadow);
    }

    /// Law: assignment updates leave every element equal to the last
    /// assignment covering it.
    #[test]
    fn prop_assignment_matches_shadow((values, updates) in values_and_updates(40, 25)) {
        let mut tree = LazySegmentTree::new(AssignSum::new(), values.clone());
        let mut shadow = values;

        for update in &updates {
            tree.update_range(update.lo, update.hi, update.delta);
            shadow[update.lo..=update.hi].fill(update.delta);
        }
        assert_every_range(&shadow, |lo, hi| tree.query_range(lo, hi), sum_of)?;
        prop_assert_eq!(tree.to_vec(), shadow);
    }
}
