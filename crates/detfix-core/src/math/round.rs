// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rounding to integers, absolute value and modular helpers.

use crate::error::{FixedError, Result};
use crate::fixed::Fixed;
use crate::storage::Storage;

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    const FRACTION_MASK: i128 = (1_i128 << F) - 1;

    /// Largest integer not greater than `self`.
    ///
    /// Clearing the fraction bits of a two's complement value rounds toward
    /// negative infinity, so `MIN` (already integral) maps to itself.
    #[inline]
    pub fn floor(self) -> Self {
        Self::from_i128(self.to_i128() & !Self::FRACTION_MASK)
    }

    /// Smallest integer not less than `self`.
    ///
    /// When that integer is beyond `MAX`, the result saturates to the top of
    /// the integral band (`raw | (2^F - 1)`), less than one unit from the true
    /// ceiling, instead of wrapping to a negative number.
    #[inline]
    pub fn ceil(self) -> Self {
        let raw = self.to_i128();
        let ceiling = (raw + Self::FRACTION_MASK) & !Self::FRACTION_MASK;
        if ceiling > S::MAX.to_i128() {
            return Self::from_i128(raw | Self::FRACTION_MASK);
        }
        Self::from_i128(ceiling)
    }

    /// Integer part, rounding toward zero.
    #[inline]
    pub fn trunc(self) -> Self {
        let unit = 1_i128 << F;
        Self::from_i128(self.to_i128() / unit * unit)
    }

    /// Nearest integer, halves rounded away from zero.
    ///
    /// Counts whole halves (`raw / 2^(F-1)`, truncated) and folds the odd one
    /// back in: `2.5 -> 3`, `-2.5 -> -3`, `-2.4 -> -2`.
    #[inline]
    pub fn round(self) -> Self {
        let halves = self.to_i128() / (1_i128 << (F - 1));
        Self::from_i128((halves / 2 + halves % 2) << F)
    }

    /// Absolute value. `MIN` wraps to itself.
    #[inline]
    pub fn abs(self) -> Self {
        if self.signbit() {
            -self
        } else {
            self
        }
    }

    /// `self - rhs * floor(self / rhs)`: remainder with the sign of `rhs`.
    pub fn fmod(self, rhs: Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(FixedError::DivideByZero);
        }
        Ok(self - rhs * (self / rhs).floor())
    }

    /// Splits into `(floor(self), self - floor(self))`.
    ///
    /// The remainder is always in `[0, 1)`.
    pub fn modf(self) -> (Self, Self) {
        let whole = self.floor();
        (whole, self - whole)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Fixed32, Fixed64};

    #[test]
    fn ceil_saturates_inside_the_top_band() {
        let near_max = Fixed32::MAX - Fixed32::one();
        assert_eq!(near_max.ceil(), Fixed32::from_int(32767));
        assert_eq!(Fixed32::MAX.ceil(), Fixed32::MAX);
        assert_eq!(Fixed32::from_int(7).ceil(), Fixed32::from_int(7));
    }

    #[test]
    fn floor_at_the_most_negative_value() {
        assert_eq!(Fixed64::MIN.floor(), Fixed64::MIN);
        assert_eq!((Fixed64::MIN + Fixed64::DELTA).floor(), Fixed64::MIN);
        assert_eq!(Fixed64::MIN.ceil(), Fixed64::MIN);
    }

    #[test]
    fn modf_remainder_is_non_negative() {
        let (whole, rest) = Fixed32::from_f64(-2.25).modf();
        assert_eq!(whole, Fixed32::from_int(-3));
        assert_eq!(rest, Fixed32::from_f64(0.75));
    }
}
