// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Logarithms.
//!
//! `log2` is the shift-and-square method (Clay Turner, "A Fast Binary
//! Logarithm Algorithm", IEEE Signal Processing Magazine, 2010): normalise the
//! argument into `[1, 2)` to get the integer part, then square repeatedly;
//! each time the square reaches 2 the next fractional bit is one.

use crate::error::{FixedError, Result};
use crate::fixed::Fixed;
use crate::storage::Storage;

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    /// Base-2 logarithm. Fails for zero and negative input.
    #[allow(clippy::cast_possible_wrap)]
    pub fn log2(self) -> Result<Self> {
        if self <= Self::ZERO {
            return Err(FixedError::domain("log2"));
        }

        let one: u128 = 1 << F;
        let two: u128 = 2 << F;
        #[allow(clippy::cast_sign_loss)]
        let mut z = self.to_i128() as u128;
        let mut y: i128 = 0;

        while z < one {
            z <<= 1;
            y -= 1 << F;
        }
        while z >= two {
            z >>= 1;
            y += 1 << F;
        }

        let mut bit: i128 = 1 << (F - 1);
        for _ in 0..F {
            z = (z * z) >> F;
            if z >= two {
                z >>= 1;
                y += bit;
            }
            bit >>= 1;
        }

        Ok(Self::from_i128(y))
    }

    /// Natural logarithm, `log2(x) / log2(e)`.
    pub fn ln(self) -> Result<Self> {
        self.log2()
            .map(|l| l / Self::log2_e())
            .map_err(|_| FixedError::domain("ln"))
    }

    /// Base-10 logarithm, `log2(x) / log2(10)`.
    pub fn log10(self) -> Result<Self> {
        self.log2()
            .map(|l| l / Self::log2_10())
            .map_err(|_| FixedError::domain("log10"))
    }
}
