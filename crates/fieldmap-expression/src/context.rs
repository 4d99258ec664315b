/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Collaborators borrowed for the duration of an expression operation.

use fieldmap_error_reporting::{DiagnosticMessage, DiagnosticSink};
use fieldmap_model::{FieldCatalog, MappingModel};

/// Context threaded through every mutating expression operation.
///
/// The expression never stores a reference to its mapping. Each call
/// borrows the mapping mutably, so only one editor can work on a mapping
/// at a time.
pub struct ExpressionContext<'a> {
    /// Mapping the expression belongs to.
    pub mapping: &'a mut MappingModel,

    /// Fields of the loaded documents.
    pub catalog: &'a dyn FieldCatalog,

    /// Where unresolved fields and internal problems are reported.
    pub diagnostics: &'a mut dyn DiagnosticSink,
}

impl<'a> ExpressionContext<'a> {
    pub fn new(
        mapping: &'a mut MappingModel,
        catalog: &'a dyn FieldCatalog,
        diagnostics: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            mapping,
            catalog,
            diagnostics,
        }
    }

    pub fn report(&mut self, diagnostic: DiagnosticMessage) {
        self.diagnostics.report(diagnostic);
    }
}
