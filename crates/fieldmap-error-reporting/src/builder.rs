//! Builder API for diagnostic messages.
//!
//! The builder encodes the tidyverse-style structure: a short title, an
//! optional problem statement, details, and hints that end with `?`.

use crate::diagnostic::{
    DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, ErrorScope, ErrorType,
    MessageContent,
};
use fieldmap_source_map::Position;

/// Builder for [`DiagnosticMessage`].
///
/// # Example
///
/// ```
/// use fieldmap_error_reporting::{DiagnosticMessageBuilder, ErrorType};
/// use fieldmap_source_map::Position;
///
/// let msg = DiagnosticMessageBuilder::warning("Index out of range")
///     .with_code("FM-1-2")
///     .with_type(ErrorType::User)
///     .at(Position::new(1, 3))
///     .add_hint("Use an index between 1 and 2?")
///     .build();
/// assert_eq!(msg.location, Some(Position::new(1, 3)));
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    /// Start a diagnostic whose level is decided at runtime.
    pub fn with_kind(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::with_kind(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::with_kind(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::with_kind(DiagnosticKind::Info, title)
    }

    /// Generic internal error tagged with the call site.
    ///
    /// Used through [`generic_error!`](crate::generic_error).
    pub fn generic_error(message: impl Into<String>, file: &str, line: u32) -> DiagnosticMessage {
        Self::error(format!("{} ({}:{})", message.into(), file, line))
            .with_code("FM-0-99")
            .with_type(ErrorType::Internal)
            .build()
    }

    /// Generic warning tagged with the call site.
    ///
    /// Used through [`generic_warning!`](crate::generic_warning).
    pub fn generic_warning(
        message: impl Into<String>,
        file: &str,
        line: u32,
    ) -> DiagnosticMessage {
        Self::warning(format!("{} ({}:{})", message.into(), file, line))
            .with_code("FM-0-99")
            .with_type(ErrorType::Internal)
            .build()
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn with_scope(mut self, scope: ErrorScope) -> Self {
        self.message.scope = scope;
        self
    }

    pub fn with_type(mut self, error_type: ErrorType) -> Self {
        self.message.error_type = error_type;
        self
    }

    /// Attach the expression position the diagnostic refers to.
    pub fn at(mut self, position: Position) -> Self {
        self.message.location = Some(position);
        self
    }

    pub fn problem(mut self, problem: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Add an error detail (✖ bullet).
    pub fn add_detail(mut self, detail: impl Into<MessageContent>) -> Self {
        self.message.details.push(DetailItem {
            kind: DetailKind::Error,
            content: detail.into(),
            location: None,
        });
        self
    }

    /// Add an info detail (ℹ bullet).
    pub fn add_info(mut self, info: impl Into<MessageContent>) -> Self {
        self.message.details.push(DetailItem {
            kind: DetailKind::Info,
            content: info.into(),
            location: None,
        });
        self
    }

    /// Add an info detail pointing at another position in the expression.
    pub fn add_info_at(mut self, info: impl Into<MessageContent>, position: Position) -> Self {
        self.message.details.push(DetailItem {
            kind: DetailKind::Info,
            content: info.into(),
            location: Some(position),
        });
        self
    }

    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_all_fields() {
        let msg = DiagnosticMessageBuilder::error("Unresolved field")
            .with_code("FM-1-1")
            .with_scope(ErrorScope::Mapping)
            .with_type(ErrorType::Validation)
            .at(Position::new(3, 2))
            .problem("`${DOC1:/zip}` is not mapped")
            .add_detail("No source field has path `/zip`")
            .add_info_at("Collection context started here", Position::new(1, 1))
            .add_hint("Add `/zip` to the mapping?")
            .build();

        assert_eq!(msg.kind, DiagnosticKind::Error);
        assert_eq!(msg.code.as_deref(), Some("FM-1-1"));
        assert_eq!(msg.error_type, ErrorType::Validation);
        assert_eq!(msg.location, Some(Position::new(3, 2)));
        assert_eq!(msg.details.len(), 2);
        assert_eq!(msg.details[0].kind, DetailKind::Error);
        assert_eq!(msg.details[1].location, Some(Position::new(1, 1)));
        assert_eq!(msg.hints.len(), 1);
    }

    #[test]
    fn test_with_kind() {
        let msg = DiagnosticMessageBuilder::with_kind(DiagnosticKind::Note, "x").build();
        assert_eq!(msg.kind, DiagnosticKind::Note);
        assert_eq!(msg.scope, ErrorScope::Mapping);
    }
}
