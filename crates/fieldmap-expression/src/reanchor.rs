/*
 * reanchor.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Re-anchoring field nodes after free-form edits in an editor.
//!
//! The editor owns the text while the user types. Afterwards it hands back
//! the new text together with its tokenizer output, and field nodes are
//! matched, in order, to identifier tokens spelling their display names.

use crate::context::ExpressionContext;
use crate::expression::Expression;
use fieldmap_source_map::{Position, char_len, char_to_byte};
use serde::{Deserialize, Serialize};

/// Token classes reported by the editor's tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Identifier,
    Operator,
    Keyword,
    String,
    Number,
    Whitespace,
    #[serde(other)]
    Other,
}

/// Start of one token within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorToken {
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// 0-based character offset within the line
    pub offset: usize,
}

impl EditorToken {
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        EditorToken { kind, offset }
    }
}

struct Identifier<'t> {
    position: Position,
    text: &'t str,
}

impl Expression {
    /// Adopt text edited in the editor and move field nodes onto it.
    ///
    /// `line_tokens[i]` holds the tokens of line `i + 1` of `new_text`, in
    /// offset order. A field node with no matching identifier left was
    /// deleted by the user: it is dropped, and its field is deregistered
    /// if nothing else refers to it.
    pub fn apply_text_edit(
        &mut self,
        new_text: &str,
        line_tokens: &[Vec<EditorToken>],
        ctx: &mut ExpressionContext<'_>,
    ) {
        let identifiers = identifiers(new_text, line_tokens);

        let mut kept = Vec::with_capacity(self.fields.len());
        let mut dropped = Vec::new();
        let mut next = 0;
        for mut node in std::mem::take(&mut self.fields) {
            let found = identifiers[next..]
                .iter()
                .position(|ident| starts_with_word(ident.text, &node.display));
            match found {
                Some(idx) => {
                    node.position = identifiers[next + idx].position;
                    next += idx + 1;
                    kept.push(node);
                }
                None => dropped.push(node),
            }
        }

        self.text.content = new_text.to_string();
        self.fields = kept;
        for node in dropped {
            tracing::debug!(field = %node.key, "Field removed in editor");
            self.release(&node.key, ctx);
        }
        self.refresh(ctx);
    }
}

fn identifiers<'t>(text: &'t str, line_tokens: &[Vec<EditorToken>]) -> Vec<Identifier<'t>> {
    let mut out = Vec::new();
    for (line_idx, (line, tokens)) in text.split('\n').zip(line_tokens).enumerate() {
        let line_len = char_len(line);
        for (idx, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Identifier {
                continue;
            }
            let end = tokens
                .get(idx + 1)
                .map_or(line_len, |next| next.offset.min(line_len));
            let (Some(start), Some(end)) = (
                char_to_byte(line, token.offset),
                char_to_byte(line, end.max(token.offset)),
            ) else {
                continue;
            };
            out.push(Identifier {
                position: Position::new(line_idx + 1, token.offset + 1),
                text: &line[start..end],
            });
        }
    }
    out
}

/// `text` begins with `word` and the word is not cut out of a longer name.
fn starts_with_word(text: &str, word: &str) -> bool {
    match text.strip_prefix(word) {
        Some(rest) => !rest
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_error_reporting::DiagnosticCollector;
    use fieldmap_model::{DocumentCatalog, Field, FieldType, MappingModel};
    use pretty_assertions::assert_eq;

    use super::TokenKind::{Identifier as Id, Operator as Op, Whitespace as Ws};

    fn tok(kind: TokenKind, offset: usize) -> EditorToken {
        EditorToken::new(kind, offset)
    }

    fn mapping() -> MappingModel {
        let mut mapping = MappingModel::new("m1");
        for path in ["/a", "/b"] {
            mapping
                .add_source_field(Field::new("DOC1", path, FieldType::String))
                .unwrap();
        }
        mapping
    }

    #[test]
    fn test_nodes_follow_typed_text() {
        let catalog = DocumentCatalog::new();
        let mut mapping = mapping();
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.set_text("${DOC1:/a} + ${DOC1:/b}", &mut ctx);

        // User typed "trim(" before a and a newline before the operator
        let new_text = "trim(a)\n + b";
        let tokens = vec![
            vec![tok(Id, 0), tok(Op, 4), tok(Id, 5), tok(Op, 6)],
            vec![tok(Ws, 0), tok(Op, 1), tok(Ws, 2), tok(Id, 3)],
        ];
        expr.apply_text_edit(new_text, &tokens, &mut ctx);

        assert_eq!(expr.to_text(false), new_text);
        let positions: Vec<_> = expr.field_nodes().iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![Position::new(1, 6), Position::new(2, 4)]);
        assert_eq!(expr.to_text(true), "trim(${DOC1:/a})\n + ${DOC1:/b}");
    }

    #[test]
    fn test_deleted_field_is_released() {
        let catalog = DocumentCatalog::new();
        let mut mapping = mapping();
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.set_text("${DOC1:/a} + ${DOC1:/b}", &mut ctx);

        expr.apply_text_edit("ab + ", &[vec![tok(Id, 0), tok(Ws, 2), tok(Op, 3)]], &mut ctx);

        assert!(expr.field_nodes().is_empty());
        assert!(ctx.mapping.user_mapped_fields(true).is_empty());
        assert_eq!(expr.to_text(true), "ab + ");
    }

    #[test]
    fn test_partial_identifier_does_not_match() {
        assert!(starts_with_word("city", "city"));
        assert!(starts_with_word("city.name", "city"));
        assert!(!starts_with_word("cityName", "city"));
        assert!(!starts_with_word("ci", "city"));
    }

    #[test]
    fn test_token_json() {
        let tokens: Vec<EditorToken> = serde_json::from_str(
            r#"[{"type":"identifier","offset":0},{"type":"delimiter.parenthesis","offset":4}]"#,
        )
        .unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Other);
    }
}
