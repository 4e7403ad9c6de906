// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic conversion between `f64` and fixed-point raw values.
//!
//! The float side is decomposed into sign, exponent and mantissa bits and
//! scaled with integer shifts, so the result does not depend on the host FPU
//! rounding mode:
//! - `NaN` maps to zero (fixed-point has no NaN).
//! - `+∞`/`-∞` and finite values beyond the storage range saturate to
//!   `MAX`/`MIN`.
//! - Bits below the fixed-point resolution are truncated toward zero, or
//!   rounded half away from zero for rounding types.

use crate::fixed::Fixed;
use crate::storage::Storage;

const MANTISSA_BITS: i32 = 52;
const EXPONENT_BIAS: i32 = 1023;

/// Shifts a non-negative magnitude right, optionally rounding half up.
fn shift_right_magnitude(value: u64, shift: u32, round: bool) -> u64 {
    if shift >= 64 {
        return u64::from(round && shift == 64 && value >= 1 << 63);
    }
    if shift == 0 {
        return value;
    }
    let quotient = value >> shift;
    if round && (value >> (shift - 1)) & 1 == 1 {
        quotient + 1
    } else {
        quotient
    }
}

/// Scaled magnitude of a finite `f64`, i.e. `|value| * 2^frac` as an integer.
///
/// Returns `None` when the magnitude does not fit an `i128`.
fn scaled_magnitude(value: f64, frac: u32, round: bool) -> Option<i128> {
    let bits = value.to_bits();
    // Masking yields a value in 0..=2047.
    #[allow(clippy::cast_possible_truncation)]
    let exp = ((bits >> 52) & 0x7ff) as i32;
    let mant = bits & 0x000f_ffff_ffff_ffff;

    if exp == 0 && mant == 0 {
        return Some(0);
    }

    let (mantissa, unbiased) = if exp == 0 {
        // subnormal: no implicit leading 1.
        (mant, 1 - EXPONENT_BIAS)
    } else {
        (mant | (1_u64 << 52), exp - EXPONENT_BIAS)
    };

    #[allow(clippy::cast_possible_wrap)]
    let shift = unbiased - MANTISSA_BITS + frac as i32;
    if shift >= 0 {
        let shift_u = shift.unsigned_abs();
        // mantissa is 53 bits; shifting beyond 74 leaves i128.
        if shift_u > 74 {
            None
        } else {
            Some(i128::from(mantissa) << shift_u)
        }
    } else {
        Some(i128::from(shift_right_magnitude(
            mantissa,
            shift.unsigned_abs(),
            round,
        )))
    }
}

/// `2^-frac` built directly from its exponent bits.
fn inverse_scale(frac: u32) -> f64 {
    f64::from_bits(u64::from(1023 - frac) << 52)
}

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    /// Converts an `f64`, saturating out-of-range values and mapping NaN to zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        let negative = value.is_sign_negative();
        let magnitude = if value.is_infinite() {
            None
        } else {
            scaled_magnitude(value, F, ROUND)
        };
        let (lo, hi) = (S::MIN.to_i128(), S::MAX.to_i128());
        let raw = match magnitude {
            Some(m) if negative => (-m).max(lo),
            Some(m) => m.min(hi),
            None if negative => lo,
            None => hi,
        };
        Self::from_i128(raw)
    }

    /// Converts an `f32` through its exact `f64` widening.
    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(f64::from(value))
    }

    /// Nearest `f64` to this value (ties to even at the `f64` boundary).
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(self) -> f64 {
        let raw = self.to_i128();
        if raw == 0 {
            return 0.0;
        }
        (raw as f64) * inverse_scale(F)
    }

    /// Converts to `f32` via [`Fixed::to_f64`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::shift_right_magnitude;
    use crate::{Fixed32, Fixed32R, Fixed64};

    #[test]
    fn shift_right_rounds_only_when_asked() {
        assert_eq!(shift_right_magnitude(0b1011, 2, false), 0b10);
        assert_eq!(shift_right_magnitude(0b1011, 2, true), 0b11);
        assert_eq!(shift_right_magnitude(0b1001, 2, true), 0b10);
        assert_eq!(shift_right_magnitude(u64::MAX, 70, true), 0);
    }

    #[test]
    fn exact_values_convert_bit_for_bit() {
        assert_eq!(Fixed64::from_f64(1.5).raw(), 3_i64 << 31);
        assert_eq!(Fixed64::from_f64(-0.25).raw(), -(1_i64 << 30));
        assert_eq!(Fixed32::from_f64(-0.0).raw(), 0);
        assert_eq!(Fixed64::from_f64(1.5).to_f64(), 1.5);
    }

    #[test]
    fn sub_resolution_bits_follow_the_rounding_flag() {
        // 0.75 ulp of Q16.16.
        let v = 0.75 / 65536.0;
        assert_eq!(Fixed32::from_f64(v).raw(), 0);
        assert_eq!(Fixed32R::from_f64(v).raw(), 1);
        assert_eq!(Fixed32::from_f64(-v).raw(), 0);
        assert_eq!(Fixed32R::from_f64(-v).raw(), -1);
    }

    #[test]
    fn non_finite_inputs_saturate_or_vanish() {
        assert_eq!(Fixed32::from_f64(f64::NAN), Fixed32::ZERO);
        assert_eq!(Fixed32::from_f64(f64::INFINITY), Fixed32::MAX);
        assert_eq!(Fixed32::from_f64(f64::NEG_INFINITY), Fixed32::MIN);
        assert_eq!(Fixed32::from_f64(1.0e9), Fixed32::MAX);
        assert_eq!(Fixed64::from_f64(-1.0e300), Fixed64::MIN);
    }
}
