// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CORDIC rotation-mode sine and cosine.
//!
//! The angle is folded into `[0, π/2]` while tracking the signs of sine and
//! cosine, then the unit vector `(K, 0)` is rotated toward it through 41
//! micro-rotations by `±atan(2^-i)`. Each step is a shift and an add; the gain
//! `K` pre-compensates the length growth of the rotations, so the final
//! `(x, y)` is `(cos, sin)` directly.
//!
//! The rotation runs on `i128` so the shifted terms never overflow, whatever
//! the storage width.

use crate::consts::{CORDIC_ANGLES, CORDIC_GAIN, CORDIC_ITERATIONS, REFERENCE_FRACTION};
use crate::fixed::{rescale_raw, Fixed};
use crate::storage::Storage;

/// The `atan(2^-i)` table rescaled to `frac` fraction bits.
const fn cordic_table(frac: u32, round: bool) -> [i128; CORDIC_ITERATIONS] {
    let mut table = [0_i128; CORDIC_ITERATIONS];
    let mut i = 0;
    while i < CORDIC_ITERATIONS {
        table[i] = rescale_raw(CORDIC_ANGLES[i], REFERENCE_FRACTION, frac, round);
        i += 1;
    }
    table
}

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    const CORDIC_TABLE: [i128; CORDIC_ITERATIONS] = cordic_table(F, ROUND);

    /// `(sin(self), cos(self))` from a single CORDIC rotation.
    pub fn cordic_sin_cos(self) -> (Self, Self) {
        let pi = Self::pi().to_i128();
        let half_pi = Self::frac_pi_2().to_i128();
        let two_pi = Self::two_pi().to_i128();

        let raw = self.to_i128();
        let mut sin_negative = raw < 0;
        let mut cos_negative = false;

        let mut target = raw.abs() % two_pi;
        if target > pi {
            target -= pi;
            sin_negative = !sin_negative;
            cos_negative = !cos_negative;
        }
        if target > half_pi {
            target = pi - target;
            cos_negative = !cos_negative;
        }

        let mut x = Self::from_constant(CORDIC_GAIN).to_i128();
        let mut y = 0_i128;
        let mut angle = 0_i128;
        for (i, step) in Self::CORDIC_TABLE.iter().enumerate() {
            let dx = y >> i;
            let dy = x >> i;
            if angle < target {
                x -= dx;
                y += dy;
                angle += step;
            } else {
                x += dx;
                y -= dy;
                angle -= step;
            }
        }

        let sin = if sin_negative { -y } else { y };
        let cos = if cos_negative { -x } else { x };
        (Self::from_i128(sin), Self::from_i128(cos))
    }

    /// Sine by CORDIC. Slower than [`Fixed::sin`] but far more accurate on
    /// wide fraction widths.
    pub fn cordic_sin(self) -> Self {
        self.cordic_sin_cos().0
    }

    /// Cosine by CORDIC.
    pub fn cordic_cos(self) -> Self {
        self.cordic_sin_cos().1
    }
}
