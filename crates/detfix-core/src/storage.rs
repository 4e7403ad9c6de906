// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Backing integers for [`Fixed`](crate::Fixed) and their wider intermediates.

use core::fmt::Debug;
use core::hash::Hash;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
}

/// A signed integer that can back a fixed-point value.
///
/// Every storage type is paired with an intermediate type of twice its width
/// and the same signedness (`i32` with `i64`, `i64` with `i128`). Multiply and
/// divide promote both operands to the intermediate so the `2^F` scale never
/// overflows before it is removed again.
///
/// The trait is sealed; the two implementations above are the supported set.
pub trait Storage:
    sealed::Sealed + Copy + Default + Eq + Ord + Hash + Debug + Send + Sync + 'static
{
    /// Intermediate type used during multiply and divide.
    type Wide: Copy + Ord + Debug;

    /// Width of the storage in bits.
    const BITS: u32;
    /// Smallest storable raw value.
    const MIN: Self;
    /// Largest storable raw value.
    const MAX: Self;
    /// Raw zero.
    const ZERO: Self;
    /// Raw one (one unit in the last place, not the number one).
    const UNIT: Self;

    /// Lossless promotion to `i128`.
    fn to_i128(self) -> i128;
    /// Truncating demotion from `i128` (two's complement wraparound).
    fn wrapping_from_i128(value: i128) -> Self;
    /// Promotion to the intermediate type.
    fn widen(self) -> Self::Wide;

    /// Two's complement addition.
    fn wrapping_add(self, rhs: Self) -> Self;
    /// Two's complement subtraction.
    fn wrapping_sub(self, rhs: Self) -> Self;
    /// Two's complement negation (`MIN` maps to itself).
    fn wrapping_neg(self) -> Self;
    /// Integer product, wrapping.
    fn wrapping_mul(self, rhs: Self) -> Self;
    /// Integer quotient truncated toward zero. Panics when `rhs` is zero.
    fn wrapping_div(self, rhs: Self) -> Self;
    /// Remainder with the sign of `self`. Panics when `rhs` is zero.
    fn wrapping_rem(self, rhs: Self) -> Self;

    /// `(self * rhs) / 2^frac` evaluated in the intermediate type.
    ///
    /// Truncating mode shifts the product right by `frac`. Rounding mode
    /// divides by `2^(frac - 1)` and folds the remaining parity bit back in,
    /// rounding halves away from zero.
    fn mul_shift(self, rhs: Self, frac: u32, round: bool) -> Self;

    /// `(self * 2^frac) / rhs` evaluated in the intermediate type.
    ///
    /// Panics when `rhs` is zero; callers wanting an error check first.
    fn div_shift(self, rhs: Self, frac: u32, round: bool) -> Self;
}

macro_rules! impl_storage {
    ($storage:ty, $wide:ty) => {
        impl Storage for $storage {
            type Wide = $wide;

            const BITS: u32 = <$storage>::BITS;
            const MIN: Self = <$storage>::MIN;
            const MAX: Self = <$storage>::MAX;
            const ZERO: Self = 0;
            const UNIT: Self = 1;

            #[inline]
            fn to_i128(self) -> i128 {
                i128::from(self)
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn wrapping_from_i128(value: i128) -> Self {
                value as $storage
            }

            #[inline]
            fn widen(self) -> $wide {
                <$wide>::from(self)
            }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$storage>::wrapping_add(self, rhs)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$storage>::wrapping_sub(self, rhs)
            }

            #[inline]
            fn wrapping_neg(self) -> Self {
                <$storage>::wrapping_neg(self)
            }

            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$storage>::wrapping_mul(self, rhs)
            }

            #[inline]
            fn wrapping_div(self, rhs: Self) -> Self {
                <$storage>::wrapping_div(self, rhs)
            }

            #[inline]
            fn wrapping_rem(self, rhs: Self) -> Self {
                <$storage>::wrapping_rem(self, rhs)
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn mul_shift(self, rhs: Self, frac: u32, round: bool) -> Self {
                let product = <$wide>::from(self) * <$wide>::from(rhs);
                if round {
                    let unit: $wide = 1;
                    let halves = product / (unit << (frac - 1));
                    (halves / 2 + halves % 2) as $storage
                } else {
                    (product >> frac) as $storage
                }
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn div_shift(self, rhs: Self, frac: u32, round: bool) -> Self {
                let divisor = <$wide>::from(rhs);
                if round {
                    let halves = (<$wide>::from(self) << (frac + 1)).wrapping_div(divisor);
                    (halves / 2 + halves % 2) as $storage
                } else {
                    (<$wide>::from(self) << frac).wrapping_div(divisor) as $storage
                }
            }
        }
    };
}

impl_storage!(i32, i64);
impl_storage!(i64, i128);
