// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations. Each is generic over the storage layout and
//! dispatched on [`Repr`] once, at the top.

use anyhow::{bail, Context, Result};
use detfix_core::simd::{BatchPath, CpuFeatures};
use detfix_core::{Fixed, FormatSpec, SineStrategy, Storage, Style};
use tracing::debug;

use crate::cli::{AccuracyArgs, Commands, EvalArgs, Repr};
use crate::config::Settings;
use crate::functions::Function;
use crate::report::{
    Accuracy, AccuracyRow, Evaluation, FeatureRow, Features, Parsed, Rendered, Report,
};

const fn strategy_name(strategy: SineStrategy) -> &'static str {
    match strategy {
        SineStrategy::Polynomial => "poly",
        SineStrategy::Cordic => "cordic",
    }
}

/// `-0x18000` style: signed raw storage value.
fn raw_spec() -> FormatSpec {
    FormatSpec {
        alternate: true,
        style: Style::Raw,
        ..FormatSpec::default()
    }
}

fn parse_operand<S: Storage, const F: u32>(text: &str) -> Result<Fixed<S, F>> {
    Fixed::parse(text).with_context(|| format!("cannot parse {text:?}"))
}

pub fn run(command: &Commands, settings: &Settings) -> Result<Report> {
    match (command, settings.repr) {
        (Commands::Eval(args), Repr::Fixed32) => eval::<i32, 16>(args, settings).map(Report::Eval),
        (Commands::Eval(args), Repr::Fixed64) => eval::<i64, 32>(args, settings).map(Report::Eval),
        (Commands::Parse { text }, Repr::Fixed32) => parse::<i32, 16>(text, settings.repr),
        (Commands::Parse { text }, Repr::Fixed64) => parse::<i64, 32>(text, settings.repr),
        (Commands::Format { text, spec }, Repr::Fixed32) => render::<i32, 16>(text, spec),
        (Commands::Format { text, spec }, Repr::Fixed64) => render::<i64, 32>(text, spec),
        (Commands::Accuracy(args), Repr::Fixed32) => {
            Ok(Report::Accuracy(accuracy::<i32, 16>(args, settings)))
        }
        (Commands::Accuracy(args), Repr::Fixed64) => {
            Ok(Report::Accuracy(accuracy::<i64, 32>(args, settings)))
        }
        (Commands::Features, _) => Ok(features()),
    }
}

#[tracing::instrument(skip_all, fields(function = args.function.name()))]
fn eval<S: Storage, const F: u32>(args: &EvalArgs, settings: &Settings) -> Result<Evaluation> {
    let function = args.function;
    let x: Fixed<S, F> = parse_operand(&args.x)?;
    let y = match (function.arity(), args.y.as_deref()) {
        (2, Some(text)) => parse_operand(text)?,
        (2, None) => bail!("{} takes two operands", function.name()),
        (_, Some(_)) => bail!("{} takes one operand", function.name()),
        (_, None) => Fixed::ZERO,
    };

    let mut inputs = vec![x.to_string()];
    if function.arity() == 2 {
        inputs.push(y.to_string());
    }
    let result = function
        .evaluate(x, y, settings.strategy)
        .with_context(|| format!("{}({})", function.name(), inputs.join(", ")))?;
    let reference = function.reference(x.to_f64(), y.to_f64());
    debug!(%result, reference, "evaluated");

    Ok(Evaluation {
        function: function.name(),
        repr: settings.repr,
        strategy: strategy_name(settings.strategy),
        inputs,
        result: result.to_string(),
        raw: result.formatted(raw_spec()).to_string(),
        reference,
        abs_error: (result.to_f64() - reference).abs(),
    })
}

#[tracing::instrument(skip(repr))]
fn parse<S: Storage, const F: u32>(text: &str, repr: Repr) -> Result<Report> {
    let value: Fixed<S, F> = parse_operand(text)?;
    Ok(Report::Parse(Parsed {
        input: text.to_owned(),
        repr,
        value: value.to_string(),
        raw: value.formatted(raw_spec()).to_string(),
        debug: format!("{value:?}"),
        as_f64: value.to_f64(),
    }))
}

#[tracing::instrument]
fn render<S: Storage, const F: u32>(text: &str, spec: &str) -> Result<Report> {
    let value: Fixed<S, F> = parse_operand(text)?;
    let parsed: FormatSpec = spec
        .parse()
        .with_context(|| format!("invalid format spec {spec:?}"))?;
    Ok(Report::Format(Rendered {
        input: text.to_owned(),
        spec: spec.to_owned(),
        output: value.formatted(parsed).to_string(),
    }))
}

/// Sweeps one function over its interval at `samples + 1` evenly spaced
/// points. Points where the function reports a domain error are counted,
/// not compared.
fn sweep<S: Storage, const F: u32>(
    function: Function,
    samples: u32,
    strategy: SineStrategy,
) -> AccuracyRow {
    let (lo, hi) = function.sweep();
    let y = Fixed::<S, F>::from_f64(function.sweep_partner());
    let mut row = AccuracyRow {
        function: function.name(),
        lo,
        hi,
        samples,
        domain_errors: 0,
        max_abs_error: 0.0,
        worst_input: lo,
    };
    for i in 0..=samples {
        let x = Fixed::<S, F>::from_f64(lo + (hi - lo) * f64::from(i) / f64::from(samples));
        match function.evaluate(x, y, strategy) {
            Ok(result) => {
                let expected = function.reference(x.to_f64(), y.to_f64());
                let error = (result.to_f64() - expected).abs();
                if error > row.max_abs_error {
                    row.max_abs_error = error;
                    row.worst_input = x.to_f64();
                }
            }
            Err(_) => row.domain_errors += 1,
        }
    }
    row
}

#[tracing::instrument(skip_all, fields(samples = settings.samples))]
fn accuracy<S: Storage, const F: u32>(args: &AccuracyArgs, settings: &Settings) -> Accuracy {
    let functions: &[Function] = if args.functions.is_empty() {
        &Function::ALL
    } else {
        &args.functions
    };
    let rows = functions
        .iter()
        .map(|&function| {
            let row = sweep::<S, F>(function, settings.samples, settings.strategy);
            debug!(function = row.function, max_abs_error = row.max_abs_error, "swept");
            row
        })
        .collect();
    Accuracy {
        repr: settings.repr,
        strategy: strategy_name(settings.strategy),
        rows,
    }
}

fn features() -> Report {
    let detected = CpuFeatures::detect();
    let path = BatchPath::for_features(detected);
    Report::Features(Features {
        features: detected
            .iter_names()
            .map(|(name, present)| FeatureRow { name, present })
            .collect(),
        batch_path: path.as_str(),
        lanes: path.lanes(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::cli::OutputFormat;

    fn settings(repr: Repr) -> Settings {
        Settings {
            repr,
            format: OutputFormat::Json,
            samples: 64,
            strategy: SineStrategy::Polynomial,
        }
    }

    #[test]
    fn accuracy_rows_stay_within_published_bounds() {
        let args = AccuracyArgs {
            functions: vec![Function::Sin, Function::Sqrt, Function::Log2],
            samples: None,
        };
        let report = accuracy::<i64, 32>(&args, &settings(Repr::Fixed64));
        assert_eq!(report.rows.len(), 3);
        for row in &report.rows {
            assert_eq!(row.domain_errors, 0, "{}", row.function);
            assert!(row.max_abs_error < 1.0e-4, "{}: {}", row.function, row.max_abs_error);
        }
    }

    #[test]
    fn raw_column_is_signed_hex() {
        let Report::Parse(parsed) = parse::<i32, 16>("-1.5", Repr::Fixed32).unwrap() else {
            unreachable!("parse returns a parse report");
        };
        assert_eq!(parsed.raw, "-0x18000");
        assert_eq!(parsed.value, "-1.5");
    }

    #[test]
    fn eval_checks_operand_count() {
        let args = EvalArgs {
            function: Function::Pow,
            x: "2".to_owned(),
            y: None,
        };
        let err = eval::<i64, 32>(&args, &settings(Repr::Fixed64)).unwrap_err();
        assert!(err.to_string().contains("two operands"));
    }
}
