//! Core diagnostic message types.
//!
//! This module defines the records handed to the error sink. Each record
//! carries a level ([`DiagnosticKind`]), the scope it applies to
//! ([`ErrorScope`]) and a coarse classification ([`ErrorType`]) on top of
//! the tidyverse-style title/problem/details/hints content.

use crate::catalog::{ErrorCodeInfo, get_error_info};
use fieldmap_source_map::Position;
use serde::{Deserialize, Serialize};

/// The kind (level) of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
    /// Informational message
    Info,
    /// A note providing additional context
    Note,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
            DiagnosticKind::Note => "note",
        }
    }
}

/// What part of the application a diagnostic applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorScope {
    /// Application-wide problems (configuration, startup)
    Application,
    /// A loaded document or its field tree
    Document,
    /// A single mapping and its expression
    #[default]
    Mapping,
}

/// Coarse classification of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// A bug or broken invariant inside the engine
    Internal,
    /// Something the user typed or selected
    #[default]
    User,
    /// A mapping that is structurally invalid
    Validation,
}

/// How detail items should be presented (tidyverse x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// Error detail (✖ bullet in tidyverse style)
    Error,
    /// Info detail (i bullet in tidyverse style)
    Info,
}

impl DetailKind {
    fn bullet(&self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
        }
    }
}

/// The content of a message or detail item.
///
/// Field placeholders are quoted with backticks, so every piece of content
/// is markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    Markdown(String),
}

impl MessageContent {
    /// Get the raw string content for display
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Markdown(s) => s,
        }
    }

    /// Convert to JSON value with type information
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            MessageContent::Markdown(s) => serde_json::json!({
                "type": "markdown",
                "content": s
            }),
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Markdown(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Markdown(s.to_string())
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    /// The kind of detail (error, info)
    pub kind: DetailKind,
    /// The content of the detail
    pub content: MessageContent,
    /// Optional expression position this detail points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Position>,
}

/// A diagnostic message reported by the expression engine.
///
/// Structure:
/// 1. **Code**: Optional catalog code (e.g., "FM-1-1") for searchability
/// 2. **Title**: Brief message
/// 3. **Kind**: Error, Warning, Info (the level)
/// 4. **Scope** and **Type**: Where the problem lives and what class it is
/// 5. **Problem**: What went wrong
/// 6. **Details** and **Hints**
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Optional error code (e.g., "FM-1-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Brief title for the error
    pub title: String,

    /// The kind of diagnostic (Error, Warning, Info)
    pub kind: DiagnosticKind,

    /// Scope the diagnostic applies to
    pub scope: ErrorScope,

    /// Classification of the diagnostic
    #[serde(rename = "type")]
    pub error_type: ErrorType,

    /// The problem statement
    pub problem: Option<MessageContent>,

    /// Specific error details
    pub details: Vec<DetailItem>,

    /// Optional hints for fixing (ends with ?)
    pub hints: Vec<MessageContent>,

    /// Position in the expression text, when the problem has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Position>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    ///
    /// Scope defaults to [`ErrorScope::Mapping`] and type to [`ErrorType::User`].
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            scope: ErrorScope::default(),
            error_type: ErrorType::default(),
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Set the error code.
    ///
    /// Error codes follow the format `FM-<subsystem>-<number>` (e.g., "FM-1-1").
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Catalog entry for this message's code, if the code is known.
    pub fn code_info(&self) -> Option<&'static ErrorCodeInfo> {
        self.code.as_deref().and_then(get_error_info)
    }

    /// Documentation page for this message's code.
    ///
    /// ```
    /// use fieldmap_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Unresolved field").with_code("FM-1-1");
    /// assert!(msg.docs_url().unwrap().ends_with("/FM-1-1"));
    /// ```
    pub fn docs_url(&self) -> Option<&'static str> {
        self.code_info().and_then(|info| info.docs_url.as_deref())
    }

    /// Render this diagnostic message as text following tidyverse style.
    ///
    /// Format:
    /// ```text
    /// Error [FM-1-1]: title (at 1:5)
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// ? Hint
    /// ```
    pub fn to_text(&self) -> String {
        use std::fmt::Write;

        let kind_str = match self.kind {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
            DiagnosticKind::Note => "Note",
        };

        let mut result = String::new();
        result.push_str(kind_str);
        if let Some(code) = &self.code {
            let _ = write!(result, " [{}]", code);
        }
        let _ = write!(result, ": {}", self.title);
        if let Some(location) = &self.location {
            let _ = write!(result, " (at {})", location);
        }
        result.push('\n');

        if let Some(problem) = &self.problem {
            let _ = writeln!(result, "{}", problem.as_str());
        }

        for detail in &self.details {
            let _ = writeln!(result, "{} {}", detail.kind.bullet(), detail.content.as_str());
        }

        for hint in &self.hints {
            let _ = writeln!(result, "? {}", hint.as_str());
        }

        result
    }

    /// Render this diagnostic message as a JSON value.
    ///
    /// ```json
    /// {
    ///   "kind": "error",
    ///   "scope": "mapping",
    ///   "type": "user",
    ///   "title": "Unresolved field",
    ///   "code": "FM-1-1",
    ///   "subsystem": "expression",
    ///   "docs_url": "https://fieldmap.dev/docs/errors/FM-1-1",
    ///   "location": {"line": 1, "column": 5}
    /// }
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "kind": self.kind.as_str(),
            "scope": self.scope,
            "type": self.error_type,
            "title": self.title,
        });

        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }
        if let Some(info) = self.code_info() {
            obj["subsystem"] = json!(info.subsystem);
            if let Some(url) = &info.docs_url {
                obj["docs_url"] = json!(url);
            }
        }

        if let Some(problem) = &self.problem {
            obj["problem"] = problem.to_json();
        }

        if !self.details.is_empty() {
            let details: Vec<_> = self
                .details
                .iter()
                .map(|d| {
                    let mut detail_obj = json!({
                        "kind": d.kind,
                        "content": d.content.to_json()
                    });
                    if let Some(location) = &d.location {
                        detail_obj["location"] = json!(location);
                    }
                    detail_obj
                })
                .collect();
            obj["details"] = json!(details);
        }

        if !self.hints.is_empty() {
            let hints: Vec<_> = self.hints.iter().map(|h| h.to_json()).collect();
            obj["hints"] = json!(hints);
        }

        if let Some(location) = &self.location {
            obj["location"] = json!(location);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_defaults_to_mapping_scope() {
        let msg = DiagnosticMessage::error("Something broke");
        assert_eq!(msg.kind, DiagnosticKind::Error);
        assert_eq!(msg.scope, ErrorScope::Mapping);
        assert_eq!(msg.error_type, ErrorType::User);
        assert!(msg.code.is_none());
        assert!(msg.location.is_none());
    }

    #[test]
    fn test_to_text_minimal() {
        let msg = DiagnosticMessage::warning("Field not mapped");
        assert_eq!(msg.to_text(), "Warning: Field not mapped\n");
    }

    #[test]
    fn test_to_text_full() {
        let mut msg = DiagnosticMessage::error("Unresolved field").with_code("FM-1-1");
        msg.location = Some(Position::new(2, 4));
        msg.problem = Some("`${DOC1:/zip}` does not name a mapped field".into());
        msg.details.push(DetailItem {
            kind: DetailKind::Info,
            content: "The rest of line 2 was left as text".into(),
            location: None,
        });
        msg.hints.push("Map the field before referencing it?".into());

        assert_eq!(
            msg.to_text(),
            "Error [FM-1-1]: Unresolved field (at 2:4)\n\
             `${DOC1:/zip}` does not name a mapped field\n\
             ℹ The rest of line 2 was left as text\n\
             ? Map the field before referencing it?\n"
        );
    }

    #[test]
    fn test_to_json() {
        let mut msg = DiagnosticMessage::error("Unresolved field").with_code("FM-1-1");
        msg.location = Some(Position::new(1, 5));

        let json = msg.to_json();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["scope"], "mapping");
        assert_eq!(json["type"], "user");
        assert_eq!(json["title"], "Unresolved field");
        assert_eq!(json["code"], "FM-1-1");
        assert_eq!(json["location"]["line"], 1);
        assert_eq!(json["location"]["column"], 5);
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_to_json_adds_catalog_metadata() {
        let json = DiagnosticMessage::warning("Index out of range")
            .with_code("FM-1-2")
            .to_json();
        assert_eq!(json["subsystem"], "expression");
        assert_eq!(json["docs_url"], "https://fieldmap.dev/docs/errors/FM-1-2");

        // Known code without a page
        let json = DiagnosticMessage::error("Broken").with_code("FM-0-99").to_json();
        assert_eq!(json["subsystem"], "internal");
        assert!(json.get("docs_url").is_none());

        let json = DiagnosticMessage::error("Unknown").with_code("FM-9-9").to_json();
        assert_eq!(json["code"], "FM-9-9");
        assert!(json.get("subsystem").is_none());
    }

    #[test]
    fn test_detail_content_is_markdown() {
        let mut msg = DiagnosticMessage::error("Unresolved field");
        msg.details.push(DetailItem {
            kind: DetailKind::Error,
            content: "`${DOC1:/zip}` is not mapped".into(),
            location: Some(Position::new(1, 1)),
        });

        let detail = &msg.to_json()["details"][0];
        assert_eq!(detail["kind"], "error");
        assert_eq!(detail["content"]["type"], "markdown");
        assert_eq!(detail["content"]["content"], "`${DOC1:/zip}` is not mapped");
        assert_eq!(detail["location"]["line"], 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let msg = DiagnosticMessage::info("Expression updated").with_code("FM-0-99");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"user""#));
        let back: DiagnosticMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
