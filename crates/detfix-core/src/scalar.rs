// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Representation-independent numeric interface.
//!
//! Code that only needs arithmetic and the basic circular functions can be
//! written against [`Scalar`] and instantiated with any `Fixed` layout, so the
//! fraction width becomes a type parameter of the caller rather than a
//! hard-coded choice.
//!
//! Determinism contract:
//! - Operations are pure and return identical bits on every platform.
//! - Trigonometric functions take radians.
//! - `from_f64` is a boundary conversion only; its rounding follows the
//!   implementing type's rounding flag.

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::Result;
use crate::fixed::Fixed;
use crate::storage::Storage;

/// Deterministic scalar arithmetic and basic transcendentals.
///
/// The operator supertraits allow `+`, `-`, `*`, `/` and unary `-` in generic
/// code; `/` keeps the panicking contract of the concrete type, while
/// [`Scalar::checked_div`] reports a zero divisor as an error.
pub trait Scalar:
    Copy
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Sine of `self` (radians).
    fn sin(self) -> Self;

    /// Cosine of `self` (radians).
    fn cos(self) -> Self;

    /// Sine and cosine of `self` (radians).
    fn sin_cos(self) -> (Self, Self) {
        (Self::sin(self), Self::cos(self))
    }

    /// Division that fails on a zero divisor instead of panicking.
    fn checked_div(self, rhs: Self) -> Result<Self>;

    /// Tolerance comparison used by tests and convergence checks.
    fn nearly_eq(self, other: Self) -> bool;

    /// Converts from `f64` at an interop boundary.
    fn from_f64(value: f64) -> Self;

    /// Converts to `f64` for diagnostics.
    fn to_f64(self) -> f64;
}

impl<S: Storage, const F: u32, const ROUND: bool> Scalar for Fixed<S, F, ROUND> {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::one()
    }

    fn sin(self) -> Self {
        self.sin()
    }

    fn cos(self) -> Self {
        self.cos()
    }

    fn sin_cos(self) -> (Self, Self) {
        self.sin_cos()
    }

    fn checked_div(self, rhs: Self) -> Result<Self> {
        self.divide(rhs)
    }

    fn nearly_eq(self, other: Self) -> bool {
        self.nearly_eq(other)
    }

    fn from_f64(value: f64) -> Self {
        Self::from_f64(value)
    }

    fn to_f64(self) -> f64 {
        self.to_f64()
    }
}
