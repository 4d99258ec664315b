//! Destinations for diagnostic messages.

use crate::diagnostic::{DiagnosticKind, DiagnosticMessage};

/// Anything that accepts diagnostics from the engine.
///
/// The engine only ever pushes into a sink; it never reads back what it
/// reported. Hosts that show errors in a panel implement this directly,
/// everything else can use [`DiagnosticCollector`].
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: DiagnosticMessage);
}

/// Collector that keeps every diagnostic in report order.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<DiagnosticMessage>,
}

impl DiagnosticCollector {
    /// Create a new empty diagnostic collector.
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Check if any errors were collected (warnings don't count).
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }

    /// Get a reference to the collected diagnostics.
    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        &self.diagnostics
    }

    /// Consume the collector and return the diagnostics, sorted by position.
    ///
    /// Diagnostics without a position come first; the sort is stable.
    pub fn into_diagnostics(mut self) -> Vec<DiagnosticMessage> {
        self.diagnostics.sort_by_key(|diag| diag.location);
        self.diagnostics
    }

    /// Drop everything collected so far.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: DiagnosticMessage) {
        self.diagnostics.push(diagnostic);
    }
}

impl DiagnosticSink for Vec<DiagnosticMessage> {
    fn report(&mut self, diagnostic: DiagnosticMessage) {
        self.push(diagnostic);
    }
}
