// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The fixed-point value type and its raw-bit arithmetic.
//!
//! Representation:
//! - A [`Fixed<S, F, ROUND>`] stores `raw: S` and represents `raw / 2^F`.
//! - `S` is the storage integer; its [`Storage::Wide`] companion carries
//!   products and quotients so the `2^F` scale never overflows mid-operation.
//! - `ROUND` selects truncation (`false`) or round-half-away-from-zero
//!   (`true`) for multiply, divide and narrowing rescales.
//!
//! Overflow policy:
//! - `+ - *`, negation and the increment helpers wrap in two's complement.
//!   Callers needing saturation must range-check first.
//! - `/` and `%` panic on a zero divisor exactly like the primitive integer
//!   operators; [`Fixed::divide`] and [`Fixed::divide_int`] are the checked
//!   forms and return [`FixedError::DivideByZero`].

use core::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

use crate::consts::{self, Constant};
use crate::error::{FixedError, Result};
use crate::storage::Storage;

/// A signed fixed-point number with `F` fractional bits stored in `S`.
///
/// Equality, ordering and hashing are those of the raw integer, so they are
/// exact. Use the `nearly_*` family for tolerance-based comparisons.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct Fixed<S: Storage, const F: u32, const ROUND: bool = false> {
    raw: S,
}

/// Q15.16 in an `i32`, truncating.
pub type Fixed32 = Fixed<i32, 16>;
/// Q31.32 in an `i64`, truncating.
pub type Fixed64 = Fixed<i64, 32>;
/// Q15.16 in an `i32`, rounding half away from zero.
pub type Fixed32R = Fixed<i32, 16, true>;
/// Q31.32 in an `i64`, rounding half away from zero.
pub type Fixed64R = Fixed<i64, 32, true>;

/// Rescales a raw value from `from` fraction bits to `to` fraction bits.
///
/// Narrowing divides by `2^(from - to)` (truncating toward zero) and, when
/// `round` is set, adds the parity of the quotient by `2^(from - to - 1)`, which
/// rounds halves away from zero. Widening multiplies by `2^(to - from)`.
///
/// Every conversion between fraction widths in the crate goes through this
/// function, so constants and user conversions lose precision identically.
pub(crate) const fn rescale_raw(raw: i128, from: u32, to: u32, round: bool) -> i128 {
    if from > to {
        let shift = from - to;
        let quotient = raw / (1_i128 << shift);
        if round {
            quotient + (raw / (1_i128 << (shift - 1))) % 2
        } else {
            quotient
        }
    } else {
        raw << (to - from)
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    const FRACTION_IN_RANGE: () = assert!(
        F > 0 && F < S::BITS,
        "fraction bits must lie in 1..BITS of the storage type"
    );

    /// Number of fractional bits.
    pub const FRACTION_BITS: u32 = F;
    /// Whether multiply, divide and narrowing rescales round.
    pub const ROUNDING: bool = ROUND;
    /// Zero.
    pub const ZERO: Self = Self::from_raw(S::ZERO);
    /// Smallest representable value.
    pub const MIN: Self = Self::from_raw(S::MIN);
    /// Largest representable value.
    pub const MAX: Self = Self::from_raw(S::MAX);
    /// Smallest positive value (one raw unit).
    pub const DELTA: Self = Self::from_raw(S::UNIT);

    /// Wraps a raw bit pattern without any scaling.
    #[inline]
    pub const fn from_raw(raw: S) -> Self {
        let () = Self::FRACTION_IN_RANGE;
        Self { raw }
    }

    /// Raw integer backing this value.
    #[inline]
    pub const fn raw(self) -> S {
        self.raw
    }

    #[inline]
    pub(crate) fn from_i128(raw: i128) -> Self {
        Self::from_raw(S::wrapping_from_i128(raw))
    }

    #[inline]
    pub(crate) fn to_i128(self) -> i128 {
        self.raw.to_i128()
    }

    /// One.
    #[inline]
    pub fn one() -> Self {
        Self::from_i128(1_i128 << F)
    }

    /// Converts an integer by shifting it left by `F`. Wraps when out of range.
    #[inline]
    pub fn from_int(value: i64) -> Self {
        Self::from_i128(i128::from(value) << F)
    }

    /// Integer part, truncated toward zero.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_int(self) -> i64 {
        (self.to_i128() / (1_i128 << F)) as i64
    }

    /// Converts from any other fixed-point layout.
    ///
    /// Narrowing follows this type's rounding flag; widening is exact unless
    /// the integral part no longer fits, in which case it wraps.
    #[inline]
    pub fn from_fixed<S2: Storage, const F2: u32, const R2: bool>(
        other: Fixed<S2, F2, R2>,
    ) -> Self {
        Self::from_i128(rescale_raw(other.raw.to_i128(), F2, F, ROUND))
    }

    /// Materializes a reference-width constant at this fraction width.
    #[inline]
    pub fn from_constant(constant: Constant) -> Self {
        Self::from_i128(rescale_raw(constant.raw(), constant.fraction(), F, ROUND))
    }

    /// Tolerance used by the `nearly_*` comparisons (about `7.6e-5`).
    #[inline]
    pub fn epsilon() -> Self {
        Self::from_constant(consts::EPSILON)
    }

    /// Returns `true` when the sign bit is set.
    #[inline]
    pub fn signbit(self) -> bool {
        self.raw < S::ZERO
    }

    /// Returns `true` for zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.raw == S::ZERO
    }

    /// `raw >> F`: the floor of the value as a storage integer.
    #[inline]
    pub fn raw_integral_part(self) -> S {
        S::wrapping_from_i128(self.to_i128() >> F)
    }

    /// Magnitude of the integral part, so `-1.0` and `1.0` both yield `1`.
    ///
    /// Computed on the unsigned magnitude, which keeps `MIN` (whose negation
    /// does not fit `S`) correct.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    pub fn integral_part(self) -> S {
        S::wrapping_from_i128((self.to_i128().unsigned_abs() >> F) as i128)
    }

    /// `raw % 2^F`: the fractional bits, carrying the sign of the value.
    #[inline]
    pub fn fractional_part(self) -> S {
        S::wrapping_from_i128(self.to_i128() % (1_i128 << F))
    }

    /// Checked division.
    pub fn divide(self, rhs: Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(FixedError::DivideByZero);
        }
        Ok(self / rhs)
    }

    /// Checked division of the raw value by an integer.
    pub fn divide_int(self, rhs: i32) -> Result<Self> {
        if rhs == 0 {
            return Err(FixedError::DivideByZero);
        }
        Ok(self / rhs)
    }

    /// Adds one in place and returns the new value.
    pub fn increment(&mut self) -> Self {
        *self += Self::one();
        *self
    }

    /// Adds one in place and returns the previous value.
    pub fn post_increment(&mut self) -> Self {
        let previous = *self;
        *self += Self::one();
        previous
    }

    /// Subtracts one in place and returns the new value.
    pub fn decrement(&mut self) -> Self {
        *self -= Self::one();
        *self
    }

    /// Subtracts one in place and returns the previous value.
    pub fn post_decrement(&mut self) -> Self {
        let previous = *self;
        *self -= Self::one();
        previous
    }

    fn raw_distance(self, other: Self) -> i128 {
        self.to_i128() - other.to_i128()
    }

    /// `|self - other| <= epsilon`.
    pub fn nearly_eq(self, other: Self) -> bool {
        let eps = Self::epsilon().to_i128();
        let d = self.raw_distance(other);
        -eps <= d && d <= eps
    }

    /// Negation of [`Fixed::nearly_eq`].
    pub fn nearly_ne(self, other: Self) -> bool {
        !self.nearly_eq(other)
    }

    /// `self` exceeds `other` by more than epsilon.
    pub fn nearly_gt(self, other: Self) -> bool {
        self.raw_distance(other) > Self::epsilon().to_i128()
    }

    /// `self` is below `other` by more than epsilon.
    pub fn nearly_lt(self, other: Self) -> bool {
        self.raw_distance(other) < -Self::epsilon().to_i128()
    }

    /// Not nearly less than `other`.
    pub fn nearly_ge(self, other: Self) -> bool {
        !self.nearly_lt(other)
    }

    /// Not nearly greater than `other`.
    pub fn nearly_le(self, other: Self) -> bool {
        !self.nearly_gt(other)
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> From<i32> for Fixed<S, F, ROUND> {
    fn from(value: i32) -> Self {
        Self::from_int(i64::from(value))
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Add for Fixed<S, F, ROUND> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.wrapping_add(rhs.raw))
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Sub for Fixed<S, F, ROUND> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.wrapping_sub(rhs.raw))
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Mul for Fixed<S, F, ROUND> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.mul_shift(rhs.raw, F, ROUND))
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Div for Fixed<S, F, ROUND> {
    type Output = Self;

    /// # Panics
    ///
    /// Panics when `rhs` is zero. Use [`Fixed::divide`] for a checked result.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.div_shift(rhs.raw, F, ROUND))
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Rem for Fixed<S, F, ROUND> {
    type Output = Self;

    /// Remainder with the sign of `self`. Panics when `rhs` is zero.
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.wrapping_rem(rhs.raw))
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Neg for Fixed<S, F, ROUND> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_raw(self.raw.wrapping_neg())
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Mul<i32> for Fixed<S, F, ROUND> {
    type Output = Self;

    /// Scales the raw value by an integer, wrapping.
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::from_raw(
            self.raw
                .wrapping_mul(S::wrapping_from_i128(i128::from(rhs))),
        )
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> Div<i32> for Fixed<S, F, ROUND> {
    type Output = Self;

    /// Divides the raw value by an integer, truncating toward zero.
    /// Panics when `rhs` is zero.
    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self::from_raw(
            self.raw
                .wrapping_div(S::wrapping_from_i128(i128::from(rhs))),
        )
    }
}

macro_rules! assign_ops {
    ($($trait:ident::$method:ident => $op:tt;)+) => {
        $(
            impl<S: Storage, const F: u32, const ROUND: bool> $trait for Fixed<S, F, ROUND> {
                #[inline]
                fn $method(&mut self, rhs: Self) {
                    *self = *self $op rhs;
                }
            }
        )+
    };
}

assign_ops! {
    AddAssign::add_assign => +;
    SubAssign::sub_assign => -;
    MulAssign::mul_assign => *;
    DivAssign::div_assign => /;
    RemAssign::rem_assign => %;
}

impl<S: Storage, const F: u32, const ROUND: bool> MulAssign<i32> for Fixed<S, F, ROUND> {
    #[inline]
    fn mul_assign(&mut self, rhs: i32) {
        *self = *self * rhs;
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> DivAssign<i32> for Fixed<S, F, ROUND> {
    #[inline]
    fn div_assign(&mut self, rhs: i32) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::{rescale_raw, Fixed32, Fixed64};

    #[test]
    fn rescale_narrowing_rounds_half_away_from_zero() {
        assert_eq!(rescale_raw(3, 2, 1, false), 1);
        assert_eq!(rescale_raw(3, 2, 1, true), 2);
        assert_eq!(rescale_raw(-3, 2, 1, false), -1);
        assert_eq!(rescale_raw(-3, 2, 1, true), -2);
        assert_eq!(rescale_raw(5, 0, 4, false), 80);
    }

    #[test]
    fn raw_integral_part_is_the_floor() {
        let x = Fixed32::from_raw(-(3 << 15)); // -1.5
        assert_eq!(x.raw_integral_part(), -2);
        assert_eq!(x.integral_part(), 1);
        assert_eq!(x.fractional_part(), -(1 << 15));
    }

    #[test]
    fn min_integral_part_does_not_overflow() {
        assert_eq!(Fixed64::MIN.integral_part(), 1_i64 << 31);
        assert_eq!(Fixed32::MIN.integral_part(), 1_i32 << 15);
    }
}
