// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Uniform sampling without a built-in generator.
//!
//! [`Fixed::from_uniform_bits`] turns one uniformly distributed 64-bit word
//! into a value in a closed interval by multiply-high scaling, so any source
//! of random words (a replay log, a PCG stream, a hash) can drive it. With the
//! `rand` feature, [`UniformFixed`] plugs the same mapping into
//! `rand::distributions::Distribution`.

use crate::fixed::Fixed;
use crate::storage::Storage;

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    /// Maps `bits` onto the raw interval `[low, high]`.
    ///
    /// The offset is `bits * span >> 64` where `span` counts the raw values in
    /// the interval, so equal-width slices of the input space map to each raw
    /// value. Bounds given in the wrong order are swapped.
    ///
    /// ```
    /// use detfix_core::Fixed32;
    ///
    /// let (lo, hi) = (Fixed32::from_int(-1), Fixed32::from_int(1));
    /// assert_eq!(Fixed32::from_uniform_bits(0, lo, hi), lo);
    /// assert_eq!(Fixed32::from_uniform_bits(u64::MAX, lo, hi), hi);
    /// ```
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn from_uniform_bits(bits: u64, low: Self, high: Self) -> Self {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let span = (high.to_i128() - low.to_i128() + 1) as u128;
        let offset = (u128::from(bits) * span) >> 64;
        Self::from_i128(low.to_i128() + offset as i128)
    }
}

/// Uniform distribution over a closed interval of fixed-point values.
#[cfg(feature = "rand")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformFixed<S: Storage, const F: u32, const ROUND: bool> {
    low: Fixed<S, F, ROUND>,
    high: Fixed<S, F, ROUND>,
}

#[cfg(feature = "rand")]
impl<S: Storage, const F: u32, const ROUND: bool> UniformFixed<S, F, ROUND> {
    /// Distribution over `[low, high]`.
    pub fn new_inclusive(low: Fixed<S, F, ROUND>, high: Fixed<S, F, ROUND>) -> Self {
        Self { low, high }
    }
}

#[cfg(feature = "rand")]
impl<S: Storage, const F: u32, const ROUND: bool> rand::distributions::Distribution<Fixed<S, F, ROUND>>
    for UniformFixed<S, F, ROUND>
{
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Fixed<S, F, ROUND> {
        Fixed::from_uniform_bits(rng.next_u64(), self.low, self.high)
    }
}
