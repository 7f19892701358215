//! Numeric abstraction shared by the built-in aggregation strategies.

use std::fmt::Debug;
use std::ops::{Add, Mul};

/// A primitive number usable as a segment tree value.
///
/// Implemented for every primitive integer and float type.
///
/// # Examples
///
/// ```rust
/// use sylva::segment::Numeric;
///
/// assert_eq!(i32::ZERO, 0);
/// assert_eq!(u8::LOWEST, 0);
/// assert_eq!(i64::from_count(3), 3);
/// assert_eq!(f64::LOWEST, f64::NEG_INFINITY);
/// ```
pub trait Numeric: Copy + PartialOrd + Debug + Add<Output = Self> + Mul<Output = Self> {
    /// Additive identity.
    const ZERO: Self;
    /// Identity for `max`: the smallest representable value.
    const LOWEST: Self;
    /// Identity for `min`: the largest representable value.
    const HIGHEST: Self;

    /// Converts an element count into this type, wrapping or rounding like
    /// an `as` cast.
    fn from_count(count: usize) -> Self;

    /// Returns the larger of two values; `self` wins ties and NaN.
    #[inline]
    #[must_use]
    fn max_of(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    /// Returns the smaller of two values; `self` wins ties and NaN.
    #[inline]
    #[must_use]
    fn min_of(self, other: Self) -> Self {
        if other < self { other } else { self }
    }
}

macro_rules! impl_numeric_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                const ZERO: Self = 0;
                const LOWEST: Self = <$t>::MIN;
                const HIGHEST: Self = <$t>::MAX;

                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                fn from_count(count: usize) -> Self {
                    count as $t
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                const ZERO: Self = 0.0;
                const LOWEST: Self = <$t>::NEG_INFINITY;
                const HIGHEST: Self = <$t>::INFINITY;

                #[inline]
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                fn from_count(count: usize) -> Self {
                    count as $t
                }
            }
        )*
    };
}

impl_numeric_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_numeric_float!(f32, f64);
