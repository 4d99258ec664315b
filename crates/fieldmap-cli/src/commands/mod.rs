/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Command implementations for fieldmap-expr
//!
//! Each command loads a [`Session`], runs one engine operation and prints
//! a report. Commands return `true` when an error diagnostic was reported.

pub mod init;
pub mod parse;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::Result;
use fieldmap_error_reporting::DiagnosticCollector;
use fieldmap_expression::{Expression, ExpressionConfig, ExpressionContext};
use fieldmap_model::DocumentCatalog;
use tracing::debug;

use crate::input::{MappingFile, load_config};
use crate::output::{Report, emit};

/// Options shared by every command
#[derive(Debug, Default)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// A loaded mapping plus everything an expression needs to run against it.
pub struct Session {
    pub file: MappingFile,
    pub catalog: DocumentCatalog,
    pub config: ExpressionConfig,
    pub diagnostics: DiagnosticCollector,
}

impl Session {
    pub fn open(mapping: &Path, options: &Options) -> Result<Self> {
        let file = MappingFile::load(mapping)?;
        let config = load_config(options.config.as_deref())?;
        let catalog = file.catalog();
        debug!(
            mapping = %file.mapping.id,
            fields = catalog.len(),
            "Loaded mapping"
        );
        Ok(Session {
            file,
            catalog,
            config,
            diagnostics: DiagnosticCollector::new(),
        })
    }

    pub fn expression(&self) -> Expression {
        Expression::new(self.config.clone())
    }

    pub fn context(&mut self) -> ExpressionContext<'_> {
        ExpressionContext::new(
            &mut self.file.mapping,
            &self.catalog,
            &mut self.diagnostics,
        )
    }

    /// Print the report for `expr`, returning whether errors were reported.
    pub fn finish(self, expr: &Expression, options: &Options) -> Result<bool> {
        let diagnostics = self.diagnostics.diagnostics();
        let report = Report::new(expr, &self.file.mapping, diagnostics);
        emit(&report, diagnostics, options.json)?;
        Ok(self.diagnostics.has_errors())
    }
}
