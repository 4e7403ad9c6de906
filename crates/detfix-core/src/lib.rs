// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! detfix-core: deterministic fixed-point numbers.
//!
//! [`Fixed`] stores a real number as `raw / 2^F` in a signed integer and
//! implements arithmetic, rounding, roots, trigonometry, logarithms and
//! exponentials using integer operations only. Results are bit-identical on
//! every platform, which is the point of the crate: simulations, lockstep
//! networking and scripting runtimes can replay the same numbers everywhere.
//!
//! ```
//! use detfix_core::Fixed64;
//!
//! let x: Fixed64 = "114.514".parse()?;
//! assert_eq!(x.round().to_int(), 115);
//! assert!((x.sqrt().to_f64() - 10.701_121).abs() < 1e-5);
//! # Ok::<(), detfix_core::FixedError>(())
//! ```
//!
//! Arithmetic operators wrap on overflow. Division has an unchecked operator
//! form (`/`, panics on zero like integer division) and a checked form
//! ([`Fixed::divide`]) returning [`FixedError::DivideByZero`].
#![deny(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self
)]

/// High-precision constants encoded at a reference fraction width.
pub mod consts;
mod convert;
mod error;
mod fixed;
/// Text rendering of fixed-point values.
pub mod format;
/// Elementary and transcendental functions.
pub mod math;
mod parse;
/// Construction from uniformly random bit patterns.
pub mod random;
mod scalar;
/// Batched angle reduction with runtime CPU feature detection.
pub mod simd;
mod storage;

pub use error::{FixedError, Result};
pub use fixed::{Fixed, Fixed32, Fixed32R, Fixed64, Fixed64R};
pub use format::{Align, FormatSpec, Formatted, SignMode, SpecError, Style};
pub use math::trig::SineStrategy;
pub use scalar::Scalar;
pub use storage::Storage;
