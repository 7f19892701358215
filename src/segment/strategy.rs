//! Aggregation strategies for [`LazySegmentTree`](super::LazySegmentTree).
//!
//! A strategy decides how child aggregates combine, how a pending update
//! rewrites an aggregate, and how two pending updates fold into one.

use std::marker::PhantomData;

use super::numeric::Numeric;

// =============================================================================
// LazyAggregate Trait
// =============================================================================

/// Merge and update rules for a lazily propagated segment tree.
///
/// # Laws
///
/// The tree relies on these laws without checking them. A strategy that
/// breaks them silently yields wrong answers.
///
/// 1. `merge` is associative and `identity()` is its neutral element.
/// 2. Updates distribute over merge: for segments `a` (of `m` elements) and
///    `b` (of `n` elements),
///    `apply_update(merge(a, b), d, m + n) == merge(apply_update(a, d, m), apply_update(b, d, n))`.
/// 3. Folding updates matches applying them in turn:
///    `apply_update(apply_update(v, first, c), second, c) == apply_update(v, merge_updates(first, second), c)`.
///
/// # Examples
///
/// A product tree with multiplicative updates:
///
/// ```rust
/// use sylva::segment::{LazyAggregate, LazySegmentTree};
///
/// #[derive(Clone, Copy, Default)]
/// struct ProductScale;
///
/// impl LazyAggregate for ProductScale {
///     type Value = f64;
///     type Update = f64;
///
///     fn identity(&self) -> f64 {
///         1.0
///     }
///
///     fn merge(&self, left: &f64, right: &f64) -> f64 {
///         left * right
///     }
///
///     fn apply_update(&self, value: &f64, update: &f64, count: usize) -> f64 {
///         value * update.powi(i32::try_from(count).unwrap())
///     }
///
///     fn merge_updates(&self, pending: &f64, incoming: &f64) -> f64 {
///         pending * incoming
///     }
/// }
///
/// let mut tree = LazySegmentTree::new(ProductScale, vec![1.0, 2.0, 3.0]);
/// tree.update_range(0, 1, 2.0);
/// assert_eq!(tree.query_all(), 24.0);
/// ```
pub trait LazyAggregate {
    /// Aggregate stored at every node.
    type Value: Clone;
    /// Update recorded as pending at internal nodes.
    type Update: Clone;

    /// Neutral element of [`merge`](Self::merge), stored in padding leaves.
    fn identity(&self) -> Self::Value;

    /// Combines the aggregates of two adjacent segments, left then right.
    fn merge(&self, left: &Self::Value, right: &Self::Value) -> Self::Value;

    /// Applies `update` to the aggregate of a segment of `count` elements.
    fn apply_update(&self, value: &Self::Value, update: &Self::Update, count: usize)
    -> Self::Value;

    /// Folds `incoming` into an update that is already `pending`.
    fn merge_updates(&self, pending: &Self::Update, incoming: &Self::Update) -> Self::Update;
}

// =============================================================================
// Built-in Strategies
// =============================================================================

/// Range sum with additive updates.
///
/// # Examples
///
/// ```rust
/// use sylva::segment::{LazySegmentTree, Sum};
///
/// let mut tree = LazySegmentTree::new(Sum::new(), vec![1, 2, 3, 4]);
/// tree.update_range(1, 2, 10);
/// assert_eq!(tree.query_range(0, 3), 30);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Sum<T> {
    marker: PhantomData<T>,
}

/// Range maximum with additive updates.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Max<T> {
    marker: PhantomData<T>,
}

/// Range minimum with additive updates.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Min<T> {
    marker: PhantomData<T>,
}

/// Range sum with assignment updates: an update overwrites every element it
/// covers, and a newer pending assignment replaces an older one.
///
/// # Examples
///
/// ```rust
/// use sylva::segment::{AssignSum, LazySegmentTree};
///
/// let mut tree = LazySegmentTree::new(AssignSum::new(), vec![1, 2, 3, 4]);
/// tree.update_range(0, 3, 5);
/// tree.update_range(1, 2, 0);
/// assert_eq!(tree.query_range(0, 3), 10);
/// assert_eq!(tree.to_vec(), vec![5, 0, 0, 5]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct AssignSum<T> {
    marker: PhantomData<T>,
}

macro_rules! strategy_constructor {
    ($($name:ident),*) => {
        $(
            impl<T> $name<T> {
                /// Creates the strategy.
                #[inline]
                #[must_use]
                pub const fn new() -> Self {
                    Self { marker: PhantomData }
                }
            }
        )*
    };
}

strategy_constructor!(Sum, Max, Min, AssignSum);

impl<T: Numeric> LazyAggregate for Sum<T> {
    type Value = T;
    type Update = T;

    #[inline]
    fn identity(&self) -> T {
        T::ZERO
    }

    #[inline]
    fn merge(&self, left: &T, right: &T) -> T {
        *left + *right
    }

    #[inline]
    fn apply_update(&self, value: &T, update: &T, count: usize) -> T {
        *value + *update * T::from_count(count)
    }

    #[inline]
    fn merge_updates(&self, pending: &T, incoming: &T) -> T {
        *pending + *incoming
    }
}

impl<T: Numeric> LazyAggregate for Max<T> {
    type Value = T;
    type Update = T;

    #[inline]
    fn identity(&self) -> T {
        T::LOWEST
    }

    #[inline]
    fn merge(&self, left: &T, right: &T) -> T {
        left.max_of(*right)
    }

    #[inline]
    fn apply_update(&self, value: &T, update: &T, _count: usize) -> T {
        *value + *update
    }

    #[inline]
    fn merge_updates(&self, pending: &T, incoming: &T) -> T {
        *pending + *incoming
    }
}

impl<T: Numeric> LazyAggregate for Min<T> {
    type Value = T;
    type Update = T;

    #[inline]
    fn identity(&self) -> T {
        T::HIGHEST
    }

    #[inline]
    fn merge(&self, left: &T, right: &T) -> T {
        left.min_of(*right)
    }

    #[inline]
    fn apply_update(&self, value: &T, update: &T, _count: usize) -> T {
        *value + *update
    }

    #[inline]
    fn merge_updates(&self, pending: &T, incoming: &T) -> T {
        *pending + *incoming
    }
}

impl<T: Numeric> LazyAggregate for AssignSum<T> {
    type Value = T;
    type Update = T;

    #[inline]
    fn identity(&self) -> T {
        T::ZERO
    }

    #[inline]
    fn merge(&self, left: &T, right: &T) -> T {
        *left + *right
    }

    #[inline]
    fn apply_update(&self, _value: &T, update: &T, count: usize) -> T {
        *update * T::from_count(count)
    }

    #[inline]
    fn merge_updates(&self, _pending: &T, incoming: &T) -> T {
        *incoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_sum_scales_update_by_count() {
        let sum = Sum::<i64>::new();
        assert_eq!(sum.apply_update(&10, &3, 4), 22);
        assert_eq!(sum.merge(&sum.identity(), &7), 7);
        assert_eq!(sum.merge_updates(&2, &5), 7);
    }

    #[rstest]
    fn test_max_and_min_ignore_count() {
        let max = Max::<i32>::new();
        let min = Min::<i32>::new();
        assert_eq!(max.apply_update(&4, &-1, 100), 3);
        assert_eq!(min.apply_update(&4, &-1, 100), 3);
        assert_eq!(max.merge(&max.identity(), &-50), -50);
        assert_eq!(min.merge(&min.identity(), &50), 50);
    }

    #[rstest]
    fn test_assign_sum_newer_update_wins() {
        let assign = AssignSum::<u32>::new();
        assert_eq!(assign.apply_update(&99, &2, 3), 6);
        assert_eq!(assign.merge_updates(&8, &1), 1);
    }

    #[rstest]
    #[case(&[1, 2], &[3, 4, 5], 7)]
    #[case(&[-3], &[0, 9], 2)]
    fn test_sum_update_distributes_over_merge(
        #[case] left: &[i32],
        #[case] right: &[i32],
        #[case] delta: i32,
    ) {
        let sum = Sum::<i32>::new();
        let total = |values: &[i32]| values.iter().fold(sum.identity(), |acc, v| sum.merge(&acc, v));
        let whole = sum.apply_update(
            &sum.merge(&total(left), &total(right)),
            &delta,
            left.len() + right.len(),
        );
        let split = sum.merge(
            &sum.apply_update(&total(left), &delta, left.len()),
            &sum.apply_update(&total(right), &delta, right.len()),
        );
        assert_eq!(whole, split);
    }
}
