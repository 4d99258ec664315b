/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for expression parsing and editing.
//!
//! None of these cross the public editing API: they are converted into
//! [`DiagnosticMessage`]s and handed to the caller's sink.

use fieldmap_error_reporting::{
    DiagnosticKind, DiagnosticMessage, DiagnosticMessageBuilder, ErrorType,
};
use fieldmap_model::FieldKey;
use fieldmap_source_map::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while resolving or rendering field references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// A placeholder names no mapped, reference, or positional field.
    #[error("Unresolved field reference: {token}")]
    UnresolvedField { token: String },

    /// A positional placeholder points past the user-mapped source fields.
    #[error("Field index {index} is out of range: {count} source fields are mapped")]
    IndexOutOfRange { index: usize, count: usize },

    /// A field node's span no longer holds its display name.
    #[error("Field node {key} at {position} no longer matches the expression text")]
    PositionDrift { key: FieldKey, position: Position },
}

impl ExpressionError {
    /// Catalog code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ExpressionError::UnresolvedField { .. } => "FM-1-1",
            ExpressionError::IndexOutOfRange { .. } => "FM-1-2",
            ExpressionError::PositionDrift { .. } => "FM-0-2",
        }
    }

    /// Convert into a diagnostic for the error sink.
    ///
    /// `level` applies to user errors; drift is always an internal error.
    pub fn to_diagnostic(&self, position: Option<Position>, level: DiagnosticKind) -> DiagnosticMessage {
        let builder = match self {
            ExpressionError::UnresolvedField { token } => {
                DiagnosticMessageBuilder::with_kind(level, "Unresolved field reference")
                    .problem(format!(
                        "`{}` does not name a mapped, reference, or positional field",
                        token
                    ))
                    .add_info("The rest of the line was kept as plain text")
                    .add_hint("Map the field before referencing it?")
            }
            ExpressionError::IndexOutOfRange { index, count } => {
                DiagnosticMessageBuilder::with_kind(level, "Field index out of range")
                    .problem(format!(
                        "Placeholder `{{{}}}` refers to source field {}, but only {} are mapped",
                        index, index, count
                    ))
                    .add_info("The rest of the line was kept as plain text")
            }
            ExpressionError::PositionDrift { key, .. } => {
                DiagnosticMessageBuilder::error("Field reference out of sync with text")
                    .with_type(ErrorType::Internal)
                    .problem(format!("`{}` could not be located in the expression text", key))
                    .add_info("The field was left in its display form")
            }
        };

        let builder = builder.with_code(self.code());
        match position {
            Some(position) => builder.at(position).build(),
            None => builder.build(),
        }
    }
}

/// Errors loading an [`ExpressionConfig`](crate::ExpressionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid expression config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_diagnostic() {
        let err = ExpressionError::UnresolvedField {
            token: "${DOC1:/zip}".to_string(),
        };
        let diag = err.to_diagnostic(Some(Position::new(2, 5)), DiagnosticKind::Warning);

        assert_eq!(diag.kind, DiagnosticKind::Warning);
        assert_eq!(diag.code.as_deref(), Some("FM-1-1"));
        assert_eq!(diag.error_type, ErrorType::User);
        assert_eq!(diag.location, Some(Position::new(2, 5)));
        assert!(diag.problem.unwrap().as_str().contains("${DOC1:/zip}"));
    }

    #[test]
    fn test_index_out_of_range_diagnostic() {
        let err = ExpressionError::IndexOutOfRange { index: 4, count: 3 };
        assert_eq!(
            err.to_string(),
            "Field index 4 is out of range: 3 source fields are mapped"
        );
        let diag = err.to_diagnostic(None, DiagnosticKind::Error);
        assert_eq!(diag.code.as_deref(), Some("FM-1-2"));
        assert!(diag.problem.unwrap().as_str().contains("`{4}`"));
    }

    #[test]
    fn test_drift_is_always_internal_error() {
        let err = ExpressionError::PositionDrift {
            key: FieldKey::new("DOC1", "/a"),
            position: Position::new(1, 1),
        };
        let diag = err.to_diagnostic(Some(Position::new(1, 1)), DiagnosticKind::Warning);
        assert_eq!(diag.kind, DiagnosticKind::Error);
        assert_eq!(diag.error_type, ErrorType::Internal);
    }
}
