// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Polynomial sine family and the inverse circular functions.
//!
//! `sin` reduces its argument modulo 2π, measures it in quarter turns, folds
//! it into the first quadrant and evaluates an odd polynomial in Horner form:
//!
//! ```text
//! sin(π/2·x) ≈ π/2·x·(1 - a·x²·(1 - b·x²·(1 - c·x²·(1 - d·x²))))
//! a = π²/24, b = π²/80, c = π²/168, d = π²/288
//! ```
//!
//! The CORDIC path lives in a sibling module; callers choose between the two
//! with [`SineStrategy`].

use crate::consts::Constant;
use crate::error::{FixedError, Result};
use crate::fixed::Fixed;
use crate::storage::Storage;

/// Below this magnitude `sin(x)` is returned as `x` (0.00015).
const SMALL_ANGLE: Constant = Constant::new(0x13A92A3055326, 61);

const SIN_A: Constant = Constant::new(0x0D28D3312983E992, 61);
const SIN_B: Constant = Constant::new(0x03F2A5C1F2DAC612, 61);
const SIN_C: Constant = Constant::new(0x01E142BDE15BFCCC, 61);
const SIN_D: Constant = Constant::new(0x0118BC4418CAFE21, 61);

// atan(x) ≈ π/4·x - x·(|x| - 1)·(0.2447 + 0.0663·|x|) on [-1, 1].
const ATAN_A: Constant = Constant::new(0x07D495182A9930BE, 61);
const ATAN_B: Constant = Constant::new(0x021F212D77318FC5, 61);

/// Which sine implementation to evaluate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SineStrategy {
    /// Range reduction plus a four-term polynomial. Fast.
    #[default]
    Polynomial,
    /// 41-step CORDIC rotation. Slower, accurate to the last few bits.
    Cordic,
}

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    /// Sine by polynomial approximation (radians).
    pub fn sin(self) -> Self {
        if self.to_i128().abs() < Self::from_constant(SMALL_ANGLE).to_i128() {
            return self;
        }

        let one = Self::one();
        let two = Self::from_int(2);

        // Quarter turns in [-4, 4), then [0, 4).
        let mut x = (self % Self::two_pi()) / Self::frac_pi_2();
        if x.signbit() {
            x += Self::from_int(4);
        }
        let negative = x > two;
        if negative {
            x -= two;
        }
        if x > one {
            x = two - x;
        }

        let x2 = x * x;
        let mut t = one - Self::from_constant(SIN_D) * x2;
        t = one - Self::from_constant(SIN_C) * x2 * t;
        t = one - Self::from_constant(SIN_B) * x2 * t;
        t = one - Self::from_constant(SIN_A) * x2 * t;
        let result = Self::frac_pi_2() * x * t;

        if negative {
            -result
        } else {
            result
        }
    }

    /// Cosine by polynomial approximation (radians).
    ///
    /// Evaluated as a phase-shifted sine. Positive arguments shift back by
    /// 3π/2 instead of forward by π/2 so large inputs do not overflow.
    pub fn cos(self) -> Self {
        let shifted = if self > Self::ZERO {
            self - (Self::two_pi() - Self::frac_pi_2())
        } else {
            self + Self::frac_pi_2()
        };
        shifted.sin()
    }

    /// `(sin(self), cos(self))` by polynomial approximation.
    pub fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    /// Tangent. Fails where the cosine is within one raw unit of zero.
    pub fn tan(self) -> Result<Self> {
        let cos = self.cos();
        if cos.to_i128().abs() <= 1 {
            return Err(FixedError::domain("tan"));
        }
        Ok(self.sin() / cos)
    }

    /// Sine using the selected implementation.
    pub fn sin_with(self, strategy: SineStrategy) -> Self {
        match strategy {
            SineStrategy::Polynomial => self.sin(),
            SineStrategy::Cordic => self.cordic_sin(),
        }
    }

    /// Cosine using the selected implementation.
    pub fn cos_with(self, strategy: SineStrategy) -> Self {
        match strategy {
            SineStrategy::Polynomial => self.cos(),
            SineStrategy::Cordic => self.cordic_cos(),
        }
    }

    /// `atan` on `[-1, 1]`.
    fn atan_unit(self) -> Self {
        let magnitude = self.abs();
        let bend = Self::from_constant(ATAN_A) + Self::from_constant(ATAN_B) * magnitude;
        Self::frac_pi_4() * self - self * (magnitude - Self::one()) * bend
    }

    /// Arctangent in `(-π/2, π/2)`, absolute error below 0.0016.
    ///
    /// Arguments outside `[-1, 1]` use `atan(x) = ±π/2 - atan(1/x)`.
    pub fn atan(self) -> Self {
        let one = Self::one();
        if self.abs() <= one {
            return self.atan_unit();
        }
        let inner = (one / self).atan_unit();
        if self.signbit() {
            -Self::frac_pi_2() - inner
        } else {
            Self::frac_pi_2() - inner
        }
    }

    /// Four-quadrant arctangent of `self / x` in `[-π, π]`.
    ///
    /// `atan2(0, 0)` is zero.
    pub fn atan2(self, x: Self) -> Self {
        let y = self;
        if y.is_zero() && x.is_zero() {
            return Self::ZERO;
        }
        let (ay, ax) = (y.abs(), x.abs());
        let first_quadrant = if ay <= ax {
            (ay / ax).atan_unit()
        } else {
            Self::frac_pi_2() - (ax / ay).atan_unit()
        };
        let half_plane = if x.signbit() {
            Self::pi() - first_quadrant
        } else {
            first_quadrant
        };
        if y.signbit() {
            -half_plane
        } else {
            half_plane
        }
    }

    /// Arcsine, `atan(x / sqrt(1 - x²))`. Fails outside `[-1, 1]`.
    pub fn asin(self) -> Result<Self> {
        let one = Self::one();
        let magnitude = self.abs();
        if magnitude > one {
            return Err(FixedError::domain("asin"));
        }
        if magnitude == one {
            return Ok(if self.signbit() {
                -Self::frac_pi_2()
            } else {
                Self::frac_pi_2()
            });
        }
        let cosine = (one - self * self).sqrt();
        Ok(self.atan2(cosine))
    }

    /// Arccosine, `π/2 - asin(x)`. Fails outside `[-1, 1]`.
    pub fn acos(self) -> Result<Self> {
        match self.asin() {
            Ok(angle) => Ok(Self::frac_pi_2() - angle),
            Err(_) => Err(FixedError::domain("acos")),
        }
    }

    /// Radians to degrees.
    pub fn degrees(self) -> Self {
        self / Self::pi() * 180
    }

    /// Degrees to radians.
    pub fn radians(self) -> Self {
        self * Self::pi() / 180
    }
}
