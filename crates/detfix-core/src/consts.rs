// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mathematical constants stored once at a high reference precision.
//!
//! Each [`Constant`] is a raw bit pattern plus the fraction width it was
//! encoded at (61 bits for most, leaving room for values below 4 in an `i64`).
//! A `Fixed` materializes a constant with [`Fixed::from_constant`], which runs
//! the same rescale rule as every other width conversion. Multiples of π by a
//! power of two reuse π's bits at a different width: `2π` is π read at 60 bits,
//! `π/2` at 62 and `π/4` at 63.

use crate::fixed::Fixed;
use crate::storage::Storage;

/// A constant encoded as `raw / 2^fraction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constant {
    raw: i128,
    fraction: u32,
}

impl Constant {
    /// Builds a constant from its raw encoding.
    pub const fn new(raw: i128, fraction: u32) -> Self {
        Self { raw, fraction }
    }

    /// Raw bit pattern at the reference width.
    pub const fn raw(self) -> i128 {
        self.raw
    }

    /// Reference fraction width.
    pub const fn fraction(self) -> u32 {
        self.fraction
    }
}

/// Reference width used by the constant table.
pub const REFERENCE_FRACTION: u32 = 61;

const fn reference(raw: i128) -> Constant {
    Constant::new(raw, REFERENCE_FRACTION)
}

const PI_BITS: i128 = 0x6487ED5110B4611A;

/// Euler's number.
pub const E: Constant = reference(0x56FC2A2C515DA54D);
/// π.
pub const PI: Constant = reference(PI_BITS);
/// 2π.
pub const TWO_PI: Constant = Constant::new(PI_BITS, 60);
/// π/2.
pub const FRAC_PI_2: Constant = Constant::new(PI_BITS, 62);
/// π/4.
pub const FRAC_PI_4: Constant = Constant::new(PI_BITS, 63);
/// log2(e).
pub const LOG2_E: Constant = reference(0x2E2A8ECA5705FC2F);
/// log10(e).
pub const LOG10_E: Constant = reference(0x0DE5BD8A93728719);
/// log2(10).
pub const LOG2_10: Constant = reference(0x6A4D3C25E68DC57F);
/// 1/π.
pub const FRAC_1_PI: Constant = reference(0x0A2F9836E4E44153);
/// 1/√π.
pub const FRAC_1_SQRT_PI: Constant = reference(0x120DD750429B6D12);
/// ln(2).
pub const LN_2: Constant = reference(0x162E42FEFA39EF35);
/// ln(10).
pub const LN_10: Constant = reference(0x49AEC6EED554560B);
/// √2.
pub const SQRT_2: Constant = reference(0x2D413CCCFE779921);
/// √3.
pub const SQRT_3: Constant = reference(0x376CF5D0B09954E7);
/// 1/√3.
pub const FRAC_1_SQRT_3: Constant = reference(0x1279A74590331C4D);
/// Euler–Mascheroni constant γ.
pub const EGAMMA: Constant = reference(0x12788CFC6FB618F5);
/// Golden ratio φ.
pub const PHI: Constant = reference(0x33C6EF372FE94F83);

/// Tolerance of the `nearly_*` comparisons: `5 * 2^-16`.
pub const EPSILON: Constant = Constant::new(0x5000000000000, 64);

/// CORDIC gain `K = prod(1 / sqrt(1 + 2^-2i))` for 41 iterations.
pub const CORDIC_GAIN: Constant = reference(0x136E9DB5086BCB4D);

/// Number of CORDIC micro-rotations.
pub const CORDIC_ITERATIONS: usize = 41;

/// `atan(2^-i)` for `i` in `0..41`, at the reference width.
///
/// Strictly decreasing and positive; beyond `i = 20` the entries are exactly
/// `2^-i` at this precision.
pub const CORDIC_ANGLES: [i128; CORDIC_ITERATIONS] = [
    0x1921FB54442D1847,
    0x0ED63382B0DDA7B4,
    0x07D6DD7E4B203759,
    0x03FAB7535585EDB9,
    0x01FF55BB72CFDE9C,
    0x00FFEAADDD4BB125,
    0x007FFD556EEDCA6B,
    0x003FFFAAAB77752E,
    0x001FFFF5555BBBB7,
    0x000FFFFEAAAADDDE,
    0x0007FFFFD55556EF,
    0x0003FFFFFAAAAAB7,
    0x0001FFFFFF555556,
    0x0000FFFFFFEAAAAB,
    0x00007FFFFFFD5555,
    0x00003FFFFFFFAAAB,
    0x00001FFFFFFFF555,
    0x00000FFFFFFFFEAB,
    0x000007FFFFFFFFD5,
    0x000003FFFFFFFFFB,
    0x000001FFFFFFFFFF,
    0x0000010000000000,
    0x0000008000000000,
    0x0000004000000000,
    0x0000002000000000,
    0x0000001000000000,
    0x0000000800000000,
    0x0000000400000000,
    0x0000000200000000,
    0x0000000100000000,
    0x0000000080000000,
    0x0000000040000000,
    0x0000000020000000,
    0x0000000010000000,
    0x0000000008000000,
    0x0000000004000000,
    0x0000000002000000,
    0x0000000001000000,
    0x0000000000800000,
    0x0000000000400000,
    0x0000000000200000,
];

macro_rules! constant_accessors {
    ($($(#[$doc:meta])* $name:ident => $constant:ident;)+) => {
        impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
            $(
                $(#[$doc])*
                #[inline]
                pub fn $name() -> Self {
                    Self::from_constant($constant)
                }
            )+
        }
    };
}

constant_accessors! {
    /// Euler's number.
    e => E;
    /// π.
    pi => PI;
    /// 2π.
    two_pi => TWO_PI;
    /// π/2.
    frac_pi_2 => FRAC_PI_2;
    /// π/4.
    frac_pi_4 => FRAC_PI_4;
    /// log2(e).
    log2_e => LOG2_E;
    /// log10(e).
    log10_e => LOG10_E;
    /// log2(10).
    log2_10 => LOG2_10;
    /// 1/π.
    frac_1_pi => FRAC_1_PI;
    /// 1/√π.
    frac_1_sqrt_pi => FRAC_1_SQRT_PI;
    /// ln(2).
    ln_2 => LN_2;
    /// ln(10).
    ln_10 => LN_10;
    /// √2.
    sqrt_2 => SQRT_2;
    /// √3.
    sqrt_3 => SQRT_3;
    /// 1/√3.
    frac_1_sqrt_3 => FRAC_1_SQRT_3;
    /// Euler–Mascheroni constant.
    egamma => EGAMMA;
    /// Golden ratio.
    phi => PHI;
}

#[cfg(test)]
mod tests {
    use super::{CORDIC_ANGLES, PI};
    use crate::{Fixed32, Fixed64};

    #[test]
    fn cordic_angles_strictly_decrease() {
        for pair in CORDIC_ANGLES.windows(2) {
            assert!(pair[0] > pair[1] && pair[1] > 0);
        }
    }

    #[test]
    fn pi_multiples_rescale_from_shared_bits() {
        // Reading π at 60 bits keeps one more bit than doubling π at 61.
        assert_eq!(Fixed64::pi().raw(), 13_493_037_704);
        assert_eq!(Fixed64::two_pi().raw(), 26_986_075_409);
        assert_eq!(Fixed64::frac_pi_2().raw(), 6_746_518_852);
        assert_eq!(Fixed32::from_constant(PI).raw(), 205_887);
    }
}
