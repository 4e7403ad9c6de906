// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Decimal text to fixed-point, without going through floating point.
//!
//! Grammar: `[+-]? digits* ('.' digits*)?` with at least one digit overall.
//! The integral digits are accumulated exactly. Fraction digits are kept
//! until their count `D` satisfies `10^D >= 2^(F+1)`, which is enough to pick
//! the nearest raw value; any further digits are checked and dropped. The
//! kept fraction `dec / 10^D` is converted to `F` bits by binary long
//! division and rounded to nearest.

use core::str::FromStr;

use crate::error::{FixedError, Result};
use crate::fixed::Fixed;
use crate::storage::Storage;

/// Digits consumed from the fraction, as `numerator / denominator`.
struct DecimalFraction {
    numerator: u128,
    denominator: u128,
}

impl DecimalFraction {
    /// `round(numerator * 2^bits / denominator)`.
    fn to_bits(&self, bits: u32) -> u128 {
        let mut quotient = 0_u128;
        let mut remainder = self.numerator;
        for _ in 0..bits {
            remainder <<= 1;
            quotient <<= 1;
            if remainder >= self.denominator {
                remainder -= self.denominator;
                quotient |= 1;
            }
        }
        // Nearest, not truncated: "0.1" is raw 6554 at F = 16, not 6553.
        if remainder * 2 >= self.denominator {
            quotient += 1;
        }
        quotient
    }
}

fn digit_at(bytes: &[u8], index: usize) -> Option<u8> {
    bytes
        .get(index)
        .filter(|b| b.is_ascii_digit())
        .map(|b| b - b'0')
}

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    /// Parses a complete decimal string.
    ///
    /// ```
    /// use detfix_core::{Fixed32, FixedError};
    ///
    /// assert_eq!(Fixed32::parse("-2.5"), Ok(Fixed32::from_raw(-(5 << 15))));
    /// assert_eq!(Fixed32::parse("1.5x"), Err(FixedError::InvalidDigit { position: 3 }));
    /// assert_eq!(Fixed32::parse("40000"), Err(FixedError::Overflow));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let (value, consumed) = Self::parse_prefix(text)?;
        if consumed != text.len() {
            return Err(FixedError::InvalidDigit { position: consumed });
        }
        Ok(value)
    }

    /// Parses the longest numeric prefix of `text` and returns the value with
    /// the number of bytes consumed.
    pub fn parse_prefix(text: &str) -> Result<(Self, usize)> {
        let bytes = text.as_bytes();
        let mut pos = 0;

        let negative = match bytes.first() {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };
        let digits_start = pos;

        // Largest integral part whose shifted value can still fit.
        let integral_limit: u128 = 1 << (S::BITS - 1 - F);
        let mut integral: u128 = 0;
        while let Some(d) = digit_at(bytes, pos) {
            integral = integral * 10 + u128::from(d);
            if integral > integral_limit {
                return Err(FixedError::Overflow);
            }
            pos += 1;
        }
        let mut seen_digit = pos > digits_start;

        let mut fraction = DecimalFraction {
            numerator: 0,
            denominator: 1,
        };
        if bytes.get(pos) == Some(&b'.') {
            let precision_limit: u128 = 1 << (F + 1);
            let mut after_point = pos + 1;
            while let Some(d) = digit_at(bytes, after_point) {
                if fraction.denominator < precision_limit {
                    fraction.numerator = fraction.numerator * 10 + u128::from(d);
                    fraction.denominator *= 10;
                }
                after_point += 1;
            }
            seen_digit |= after_point > pos + 1;
            if seen_digit {
                pos = after_point;
            }
        }

        if !seen_digit {
            return Err(if digits_start == bytes.len() {
                FixedError::Empty
            } else {
                FixedError::InvalidDigit {
                    position: digits_start,
                }
            });
        }

        let magnitude = (integral << F) + fraction.to_bits(F);
        let limit = if negative {
            S::MIN.to_i128().unsigned_abs()
        } else {
            S::MAX.to_i128().unsigned_abs()
        };
        if magnitude > limit {
            return Err(FixedError::Overflow);
        }

        #[allow(clippy::cast_possible_wrap)]
        let raw = magnitude as i128;
        Ok((Self::from_i128(if negative { -raw } else { raw }), pos))
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> FromStr for Fixed<S, F, ROUND> {
    type Err = FixedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
