/*
 * output.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Printing expressions and their diagnostics.

use anyhow::Result;
use fieldmap_error_reporting::DiagnosticMessage;
use fieldmap_expression::{Expression, ExpressionNode};
use fieldmap_model::MappingModel;
use serde::Serialize;

/// Everything a command reports about an expression.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub simple: &'a str,
    pub qualified: &'a str,
    pub nodes: Vec<ExpressionNode>,
    /// User-mapped source fields after the command ran
    pub sources: Vec<String>,
    pub diagnostics: Vec<serde_json::Value>,
}

impl<'a> Report<'a> {
    pub fn new(
        expr: &'a Expression,
        mapping: &MappingModel,
        diagnostics: &[DiagnosticMessage],
    ) -> Self {
        Report {
            simple: expr.to_text(false),
            qualified: expr.to_text(true),
            nodes: expr.nodes(),
            sources: mapping
                .user_mapped_fields(true)
                .iter()
                .filter_map(|m| m.key())
                .map(|key| key.to_string())
                .collect(),
            diagnostics: diagnostics.iter().map(DiagnosticMessage::to_json).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable summary for the terminal.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(self.simple);
        out.push_str("\n\nqualified:\n");
        out.push_str(self.qualified);
        out.push('\n');

        let fields: Vec<_> = self.nodes.iter().filter_map(ExpressionNode::as_field).collect();
        if !fields.is_empty() {
            out.push_str("\nfields:\n");
            for node in fields {
                out.push_str(&format!(
                    "  {:<6} {:<20} {}\n",
                    node.position.to_string(),
                    node.display,
                    node.key
                ));
            }
        }
        out
    }
}

/// Print the report to stdout and, in text mode, diagnostics to stderr.
pub fn emit(report: &Report<'_>, diagnostics: &[DiagnosticMessage], json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }
    print!("{}", report.to_text());
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.to_text());
    }
    Ok(())
}
