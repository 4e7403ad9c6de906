// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The functions exposed on the command line, their fixed-point evaluation
//! and their `libm` reference.

use clap::ValueEnum;
use detfix_core::{Fixed, FixedError, SineStrategy, Storage};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    Sqrt,
    Cbrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Exp,
    Ln,
    Log2,
    Log10,
    Pow,
    Hypot,
}

impl Function {
    pub const ALL: [Self; 15] = [
        Self::Sqrt,
        Self::Cbrt,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Atan2,
        Self::Exp,
        Self::Ln,
        Self::Log2,
        Self::Log10,
        Self::Pow,
        Self::Hypot,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Atan2 => "atan2",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Log2 => "log2",
            Self::Log10 => "log10",
            Self::Pow => "pow",
            Self::Hypot => "hypot",
        }
    }

    /// Number of operands.
    pub const fn arity(self) -> usize {
        match self {
            Self::Atan2 | Self::Pow | Self::Hypot => 2,
            _ => 1,
        }
    }

    /// Interval swept by the accuracy report. Binary functions sweep the
    /// first operand with the second held at [`Function::sweep_partner`].
    pub const fn sweep(self) -> (f64, f64) {
        match self {
            Self::Sqrt => (0.0, 1000.0),
            Self::Cbrt => (-1000.0, 1000.0),
            Self::Sin | Self::Cos => (-core::f64::consts::TAU, core::f64::consts::TAU),
            Self::Tan => (-1.5, 1.5),
            Self::Asin | Self::Acos => (-1.0, 1.0),
            Self::Atan => (-8.0, 8.0),
            Self::Atan2 => (-4.0, 4.0),
            Self::Exp => (-10.0, 10.0),
            Self::Ln | Self::Log2 | Self::Log10 => (0.01, 1000.0),
            Self::Pow => (0.5, 4.0),
            Self::Hypot => (-100.0, 100.0),
        }
    }

    /// Second operand used by the accuracy sweep of binary functions.
    pub const fn sweep_partner(self) -> f64 {
        match self {
            Self::Atan2 => 1.5,
            Self::Pow => 2.5,
            _ => 3.0,
        }
    }

    /// `f64` reference value.
    pub fn reference(self, x: f64, y: f64) -> f64 {
        match self {
            Self::Sqrt => libm::sqrt(x),
            Self::Cbrt => libm::cbrt(x),
            Self::Sin => libm::sin(x),
            Self::Cos => libm::cos(x),
            Self::Tan => libm::tan(x),
            Self::Asin => libm::asin(x),
            Self::Acos => libm::acos(x),
            Self::Atan => libm::atan(x),
            Self::Atan2 => libm::atan2(x, y),
            Self::Exp => libm::exp(x),
            Self::Ln => libm::log(x),
            Self::Log2 => libm::log2(x),
            Self::Log10 => libm::log10(x),
            Self::Pow => libm::pow(x, y),
            Self::Hypot => libm::hypot(x, y),
        }
    }

    /// Evaluates on a fixed-point operand pair. `y` is ignored by unary
    /// functions.
    pub fn evaluate<S: Storage, const F: u32>(
        self,
        x: Fixed<S, F>,
        y: Fixed<S, F>,
        strategy: SineStrategy,
    ) -> Result<Fixed<S, F>, FixedError> {
        match self {
            Self::Sqrt => Ok(x.sqrt()),
            Self::Cbrt => Ok(x.cbrt()),
            Self::Sin => Ok(x.sin_with(strategy)),
            Self::Cos => Ok(x.cos_with(strategy)),
            Self::Tan => match strategy {
                SineStrategy::Polynomial => x.tan(),
                SineStrategy::Cordic => {
                    let (sin, cos) = x.cordic_sin_cos();
                    if cos.abs() <= Fixed::DELTA {
                        Err(FixedError::Domain { function: "tan" })
                    } else {
                        Ok(sin / cos)
                    }
                }
            },
            Self::Asin => x.asin(),
            Self::Acos => x.acos(),
            Self::Atan => Ok(x.atan()),
            Self::Atan2 => Ok(x.atan2(y)),
            Self::Exp => Ok(x.exp()),
            Self::Ln => x.ln(),
            Self::Log2 => x.log2(),
            Self::Log10 => x.log10(),
            Self::Pow => x.pow(y),
            Self::Hypot => Ok(x.hypot(y)),
        }
    }
}
