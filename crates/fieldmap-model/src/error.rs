/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for mapping model operations.

use crate::field::FieldKey;
use fieldmap_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, ErrorScope, ErrorType};
use thiserror::Error;

/// Errors that can occur when editing a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The field is already mapped on that side.
    #[error("Field already mapped: {key}")]
    DuplicateField { key: FieldKey },

    /// The field is not part of any loaded document.
    #[error("Unknown field: {key}")]
    UnknownField { key: FieldKey },
}

impl ModelError {
    /// Diagnostic for showing the failure to the user.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            ModelError::DuplicateField { key } => {
                DiagnosticMessageBuilder::warning("Field already mapped")
                    .problem(format!("`{}` is already mapped on this side", key))
                    .build()
            }
            ModelError::UnknownField { key } => DiagnosticMessageBuilder::error("Unknown field")
                .with_code("FM-2-2")
                .with_scope(ErrorScope::Document)
                .with_type(ErrorType::Validation)
                .problem(format!("`{}` is not part of any loaded document", key))
                .add_hint("Check the document id and the field path?")
                .build(),
        }
    }
}

/// Result type for mapping model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_error_reporting::DiagnosticKind;

    #[test]
    fn test_unknown_field_diagnostic() {
        let err = ModelError::UnknownField {
            key: FieldKey::new("DOC1", "/nope"),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.kind, DiagnosticKind::Error);
        assert_eq!(diag.code.as_deref(), Some("FM-2-2"));
        assert_eq!(diag.scope, ErrorScope::Document);
        assert!(diag.to_text().contains("DOC1:/nope"));
    }

    #[test]
    fn test_duplicate_is_a_warning() {
        let err = ModelError::DuplicateField {
            key: FieldKey::new("DOC1", "/a"),
        };
        assert_eq!(err.to_diagnostic().kind, DiagnosticKind::Warning);
    }
}
