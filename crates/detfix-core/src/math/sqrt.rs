// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Square root, cube root and hypotenuse.
//!
//! `sqrt` picks its algorithm from the storage width at compile time:
//! - 32-bit storage with at least 16 fraction bits runs a non-restoring
//!   bit-by-bit square root on a Q16.16 working value (no division).
//! - Everything else runs Newton-Raphson on the widened raw value, seeded from
//!   a per-fraction-width table indexed by the operand's top set bit.
//!
//! Negative input returns `-1` as a sentinel rather than an error, matching
//! the established behaviour consumers depend on.

use crate::fixed::Fixed;
use crate::storage::Storage;

/// Upper bound on Newton steps for `sqrt`. The seed is within a factor of
/// √2 of the root, so five steps reach the exact integer root.
const SQRT_NEWTON_STEPS: usize = 5;

/// Upper bound on Newton steps for `cbrt`.
const CBRT_MAX_ITERATIONS: usize = 200;

/// Square root of a Q16.16 value, one bit per step from the top.
///
/// Inputs at or above `0x4000_0200` take the second loop, which halves the
/// working registers once the remainder reaches bit 31 so the trial
/// subtraction never overflows.
fn sqrt_q16(mut r: u32) -> u32 {
    let mut q: u32 = 0;
    let mut b: u32 = 0x4000_0000;

    if r < 0x4000_0200 {
        while b != 0x40 {
            let t = q.wrapping_add(b);
            if r >= t {
                r = r.wrapping_sub(t);
                q = t.wrapping_add(b);
            }
            r <<= 1;
            b >>= 1;
        }
        return q >> 8;
    }

    while b > 0x40 {
        let t = q.wrapping_add(b);
        if r >= t {
            r = r.wrapping_sub(t);
            q = t.wrapping_add(b);
        }
        if r & 0x8000_0000 != 0 {
            q >>= 1;
            b >>= 1;
            r >>= 1;
            while b > 0x20 {
                let t = q.wrapping_add(b);
                if r >= t {
                    r = r.wrapping_sub(t);
                    q = t.wrapping_add(b);
                }
                r <<= 1;
                b >>= 1;
            }
            return q >> 7;
        }
        r <<= 1;
        b >>= 1;
    }
    q >> 8
}

/// Initial Newton guesses for `sqrt`, one per bit length of the raw operand.
///
/// For a raw value whose top set bit is `e`, the root of `raw * 2^frac` lies
/// in `[2^((e+frac)/2), 2^((e+frac+1)/2))`; the entry is `2^(e/2)` (times 1.5
/// for odd `e`) shifted up by half the fraction width.
pub(crate) const fn sqrt_seed_table(frac: u32) -> [i128; 64] {
    let mut table = [0_i128; 64];
    let mut exponent = 0;
    while exponent < 64 {
        let base = 1_i128 << (exponent / 2);
        let value = if exponent % 2 == 1 { base | (base >> 1) } else { base };
        table[exponent] = value << (frac / 2 + frac % 2);
        exponent += 1;
    }
    table
}

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    const SQRT_SEEDS: [i128; 64] = sqrt_seed_table(F);

    /// Square root. Returns `-1` for negative input and `0` for zero.
    pub fn sqrt(self) -> Self {
        if self.signbit() {
            return -Self::one();
        }
        if self.is_zero() {
            return Self::ZERO;
        }
        if S::BITS == 32 && F >= 16 {
            self.sqrt_bitwise()
        } else {
            self.sqrt_newton()
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn sqrt_bitwise(self) -> Self {
        let shift = F.saturating_sub(16);
        let working = (self.to_i128() >> shift) as u32;
        Self::from_i128(i128::from(sqrt_q16(working)) << shift)
    }

    fn sqrt_newton(self) -> Self {
        let raw = self.to_i128();
        let target = raw << F;
        let top_bit = 127 - raw.leading_zeros();
        let index = top_bit.min(S::BITS - 1) as usize;

        let mut x = Self::SQRT_SEEDS[index];
        for _ in 0..SQRT_NEWTON_STEPS {
            let next = (x + target / x) / 2;
            if next == x {
                break;
            }
            x = next;
        }
        // A step can land one above the floor root when target + 1 is a square.
        if x * x > target {
            x -= 1;
        }
        Self::from_i128(x)
    }

    /// Cube root. Exact (to the last raw bit) for perfect cubes.
    ///
    /// Integer Newton iteration from an over-estimate derived from the top set
    /// bit; stops once the iterate no longer decreases, or after 200 steps.
    #[allow(clippy::cast_possible_wrap)]
    pub fn cbrt(self) -> Self {
        let magnitude = self.to_i128().unsigned_abs();
        if magnitude == 0 {
            return Self::ZERO;
        }
        let top_bit = 127 - magnitude.leading_zeros();
        let mut x: u128 = 1 << ((top_bit + 2 * F) / 3 + 1);
        // magnitude * 2^2F fits in 127 bits whenever F <= 32 on 64-bit storage.
        let single_division = magnitude.leading_zeros() > 2 * F;

        for _ in 0..CBRT_MAX_ITERATIONS {
            let quotient = if single_division {
                (magnitude << (2 * F)) / (x * x)
            } else {
                (((magnitude << F) / x) << F) / x
            };
            let next = (2 * x + quotient) / 3;
            if next >= x {
                break;
            }
            x = next;
        }

        let root = x as i128;
        Self::from_i128(if self.signbit() { -root } else { root })
    }

    /// `sqrt(self² + other²)`. The squares wrap like ordinary multiplication.
    pub fn hypot(self, other: Self) -> Self {
        (self * self + other * other).sqrt()
    }

    /// `sqrt(self² + y² + z²)`.
    pub fn hypot3(self, y: Self, z: Self) -> Self {
        (self * self + y * y + z * z).sqrt()
    }
}
