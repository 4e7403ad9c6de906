// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Exponential and powers.

use crate::consts::Constant;
use crate::error::{FixedError, Result};
use crate::fixed::Fixed;
use crate::storage::Storage;

// e^x ≈ f + x·(e + x·(d + x·(c + x·(b + x·a)))) for x in [0, 1).
const EXP_A: Constant = Constant::new(0x01C798ECC0CBC856, 63);
const EXP_B: Constant = Constant::new(0x04745859810836DA, 63);
const EXP_C: Constant = Constant::new(0x15CFBB5C306F85F3, 63);
const EXP_D: Constant = Constant::new(0x3FE26186C531F98E, 63);
const EXP_E: Constant = Constant::new(0x40014D4407008BB0, 62);
const EXP_F: Constant = Constant::new(0x7FFFF686446F1B43, 63);

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    /// `x` such that `exp(x)` is the first power of two past `MAX`.
    #[allow(clippy::cast_possible_wrap)]
    fn exp_limit() -> Self {
        Self::ln_2() * (S::BITS - 1 - F) as i32
    }

    /// Raw `(F + 1)·ln 2`, as `i128` since it need not fit the storage.
    /// Below its negation `exp` is under half a raw unit.
    fn exp_floor_raw() -> i128 {
        Self::ln_2().to_i128() * i128::from(F + 1)
    }

    /// `self^exponent` for a non-negative exponent, by squaring.
    fn powu(self, mut exponent: u32) -> Self {
        let mut result = Self::one();
        let mut base = self;
        while exponent != 0 {
            if exponent & 1 == 1 {
                result *= base;
            }
            exponent >>= 1;
            if exponent != 0 {
                base *= base;
            }
        }
        result
    }

    /// `e^self` for `self >= 0` below the overflow limit.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn exp_expand(self) -> Self {
        let whole = self.floor();
        let x = self - whole;

        let mut poly = Self::from_constant(EXP_A);
        poly = Self::from_constant(EXP_B) + x * poly;
        poly = Self::from_constant(EXP_C) + x * poly;
        poly = Self::from_constant(EXP_D) + x * poly;
        poly = Self::from_constant(EXP_E) + x * poly;
        poly = Self::from_constant(EXP_F) + x * poly;

        poly * Self::e().powu(whole.to_int() as u32)
    }

    /// Natural exponential.
    ///
    /// Arguments below `-(F + 1)·ln 2` return zero; arguments whose result
    /// exceeds the range saturate to `MAX`. Negative arguments are evaluated
    /// as `1 / exp(-x)`, or as `exp(x / 2)^2` when `exp(-x)` itself would
    /// not fit.
    pub fn exp(self) -> Self {
        if self.is_zero() {
            return Self::one();
        }
        let limit = Self::exp_limit();
        if self.signbit() {
            let magnitude = -self;
            if magnitude.signbit() || magnitude.to_i128() > Self::exp_floor_raw() {
                return Self::ZERO;
            }
            if magnitude >= limit {
                let half = (self / 2).exp();
                return half * half;
            }
            return Self::one() / magnitude.exp_expand();
        }
        if self >= limit {
            return Self::MAX;
        }
        self.exp_expand()
    }

    /// Integer power by repeated squaring.
    ///
    /// Negative exponents square the reciprocal `1 / self`, so the squared
    /// base only wraps when the result itself is out of range. `0^0` is one;
    /// a negative power of zero fails with [`FixedError::DivideByZero`].
    pub fn powi(self, exponent: i32) -> Result<Self> {
        if exponent == 0 {
            return Ok(Self::one());
        }
        if self.is_zero() {
            return if exponent < 0 {
                Err(FixedError::DivideByZero)
            } else {
                Ok(Self::ZERO)
            };
        }
        if exponent > 0 {
            return Ok(self.powu(exponent.unsigned_abs()));
        }
        Ok(Self::one().divide(self)?.powu(exponent.unsigned_abs()))
    }

    /// `self^exponent` for a fixed-point exponent.
    ///
    /// The integer part of the exponent goes through [`Fixed::powi`], the
    /// fraction through `exp(frac * ln(self))`. A fractional power of a
    /// negative base is a domain error. `0^0` is one and `0^y` is zero.
    pub fn pow(self, exponent: Self) -> Result<Self> {
        if self.is_zero() {
            return Ok(if exponent.is_zero() {
                Self::one()
            } else {
                Self::ZERO
            });
        }

        let whole = exponent.trunc();
        let fraction = exponent - whole;
        let whole = i32::try_from(whole.to_int()).map_err(|_| FixedError::Overflow)?;

        let integral = self.powi(whole)?;
        if fraction.is_zero() {
            return Ok(integral);
        }
        let ln = self.ln().map_err(|_| FixedError::domain("pow"))?;
        Ok(integral * (fraction * ln).exp())
    }
}
