// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for checked fixed-point operations.

use thiserror::Error;

/// Failure modes of the checked operations.
///
/// Unchecked arithmetic never produces one of these: `+ - *` and negation
/// wrap, and the `/`/`%` operators panic on a zero divisor like primitive
/// integers do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum FixedError {
    /// Checked division (or a reciprocal) with a zero divisor.
    #[error("division by zero")]
    DivideByZero,
    /// Parsed value does not fit the storage range.
    #[error("value out of range for the fixed-point storage")]
    Overflow,
    /// Function evaluated outside of its mathematical domain.
    #[error("argument outside the domain of `{function}`")]
    Domain {
        /// Name of the rejecting function, e.g. `"log2"`.
        function: &'static str,
    },
    /// Parse input contains a character that is not part of a number.
    #[error("invalid digit at byte {position}")]
    InvalidDigit {
        /// Byte offset of the offending character.
        position: usize,
    },
    /// Parse input has no digits.
    #[error("cannot parse a fixed-point value from empty input")]
    Empty,
}

impl FixedError {
    pub(crate) const fn domain(function: &'static str) -> Self {
        Self::Domain { function }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, FixedError>;
