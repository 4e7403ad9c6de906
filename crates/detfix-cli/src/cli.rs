// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::functions::Function;

/// Storage layout used to evaluate inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repr {
    /// Q16.16 in an `i32`.
    Fixed32,
    /// Q32.32 in an `i64`.
    Fixed64,
}

impl Repr {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
        }
    }
}

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// One JSON document.
    Json,
}

/// Sine/cosine algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Quarter-wave polynomial.
    Poly,
    /// CORDIC rotation.
    Cordic,
}

#[derive(Parser, Debug)]
#[command(
    name = "detfix",
    version,
    about = "Deterministic fixed-point math: evaluate, inspect and audit",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// JSON file with defaults for --repr, --format, --samples and --strategy.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number representation.
    #[arg(long, global = true)]
    pub repr: Option<Repr>,

    /// Output format.
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Sine/cosine algorithm for sin, cos and tan.
    #[arg(long, global = true)]
    pub strategy: Option<Strategy>,

    /// Log at debug level (RUST_LOG takes precedence when set).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate one function and compare it with an f64 reference.
    Eval(EvalArgs),
    /// Parse decimal text and show the stored value.
    Parse {
        /// Decimal text, e.g. `-12.375`.
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    /// Parse decimal text and render it with a format spec.
    Format {
        /// Decimal text.
        #[arg(allow_hyphen_values = true)]
        text: String,
        /// Spec such as `+08.3f`, `#x` or `?`.
        #[arg(allow_hyphen_values = true)]
        spec: String,
    },
    /// Sweep functions over their domains and report the worst error.
    Accuracy(AccuracyArgs),
    /// Show detected CPU features and the batch reduction path.
    Features,
}

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Function name.
    pub function: Function,
    /// First operand.
    #[arg(allow_hyphen_values = true)]
    pub x: String,
    /// Second operand for atan2, pow and hypot.
    #[arg(allow_hyphen_values = true)]
    pub y: Option<String>,
}

#[derive(Args, Debug)]
pub struct AccuracyArgs {
    /// Restrict the sweep to these functions (repeatable).
    #[arg(long = "function", short = 'f')]
    pub functions: Vec<Function>,
    /// Sample points per function.
    #[arg(long)]
    pub samples: Option<u32>,
}
