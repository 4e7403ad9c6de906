// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command results and their table/JSON rendering.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use crate::cli::{OutputFormat, Repr};

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub function: &'static str,
    pub repr: Repr,
    pub strategy: &'static str,
    pub inputs: Vec<String>,
    pub result: String,
    pub raw: String,
    pub reference: f64,
    pub abs_error: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Parsed {
    pub input: String,
    pub repr: Repr,
    pub value: String,
    pub raw: String,
    pub debug: String,
    pub as_f64: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    pub input: String,
    pub spec: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccuracyRow {
    pub function: &'static str,
    pub lo: f64,
    pub hi: f64,
    pub samples: u32,
    pub domain_errors: u32,
    pub max_abs_error: f64,
    pub worst_input: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Accuracy {
    pub repr: Repr,
    pub strategy: &'static str,
    pub rows: Vec<AccuracyRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureRow {
    pub name: &'static str,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Features {
    pub features: Vec<FeatureRow>,
    pub batch_path: &'static str,
    pub lanes: usize,
}

/// Output of one subcommand.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Eval(Evaluation),
    Parse(Parsed),
    Format(Rendered),
    Accuracy(Accuracy),
    Features(Features),
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(header.to_vec());
    table
}

fn key_values(rows: &[(&str, String)]) -> Table {
    let mut t = table(&["field", "value"]);
    for (key, value) in rows {
        t.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    t
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Table => Ok(self.to_table()),
        }
    }

    fn to_table(&self) -> String {
        match self {
            Self::Eval(e) => key_values(&[
                ("function", e.function.to_owned()),
                ("repr", e.repr.as_str().to_owned()),
                ("strategy", e.strategy.to_owned()),
                ("inputs", e.inputs.join(", ")),
                ("result", e.result.clone()),
                ("raw", e.raw.clone()),
                ("reference", format!("{:.17}", e.reference)),
                ("abs error", format!("{:.3e}", e.abs_error)),
            ])
            .to_string(),
            Self::Parse(p) => key_values(&[
                ("input", p.input.clone()),
                ("repr", p.repr.as_str().to_owned()),
                ("value", p.value.clone()),
                ("raw", p.raw.clone()),
                ("debug", p.debug.clone()),
                ("f64", p.as_f64.to_string()),
            ])
            .to_string(),
            // Plain text so the output can be piped.
            Self::Format(r) => r.output.clone(),
            Self::Accuracy(a) => {
                let mut t = table(&["function", "range", "samples", "domain errors", "max abs error", "at"]);
                for row in &a.rows {
                    t.add_row(vec![
                        Cell::new(row.function),
                        Cell::new(format!("[{}, {}]", row.lo, row.hi)),
                        Cell::new(row.samples).set_alignment(CellAlignment::Right),
                        Cell::new(row.domain_errors).set_alignment(CellAlignment::Right),
                        Cell::new(format!("{:.3e}", row.max_abs_error))
                            .set_alignment(CellAlignment::Right),
                        Cell::new(format!("{:.6}", row.worst_input))
                            .set_alignment(CellAlignment::Right),
                    ]);
                }
                format!("{t}\nrepr: {}, strategy: {}", a.repr.as_str(), a.strategy)
            }
            Self::Features(f) => {
                let mut t = table(&["feature", "present"]);
                for row in &f.features {
                    t.add_row(vec![
                        Cell::new(row.name),
                        Cell::new(if row.present { "yes" } else { "no" }),
                    ]);
                }
                format!("{t}\nbatch path: {} ({} lanes)", f.batch_path, f.lanes)
            }
        }
    }
}
