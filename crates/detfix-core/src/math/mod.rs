// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Integer-only elementary and transcendental functions.
//!
//! All functions are inherent methods on [`Fixed`](crate::Fixed) so call sites
//! read like the `f64` API (`x.sqrt()`, `x.sin()`, `x.ln()?`). Every routine
//! runs a bounded number of iterations and touches no global state.
//!
//! Accuracy (measured against `f64` over the documented domains):
//!
//! | Function | `Fixed32` | `Fixed64` |
//! |----------|-----------|-----------|
//! | `sqrt`, `cbrt` | 1 ulp | exact floor (`cbrt` within 1e-6) |
//! | `sin`/`cos` polynomial | 6e-5 | 4e-6 |
//! | `cordic_sin`/`cordic_cos` | 2e-4 | 4e-9 |
//! | `atan` | 2e-3 | 2e-3 |
//! | `log2` | 2e-5 | 1e-9 |
//! | `exp` (relative) | 2e-4 | 2e-6 |
//!
//! `min`, `max` and `clamp` come from the derived [`Ord`] on the raw value.

/// Square and cube roots, hypotenuse.
pub mod sqrt;

/// Circular functions: polynomial and CORDIC sine, inverse functions.
pub mod trig;

mod cordic;
mod exp;
mod log;
mod round;
