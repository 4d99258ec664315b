/*
 * codec.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion between placeholder text and nodes.
//!
//! Parsing replaces each resolvable placeholder with the field's display
//! name and records where that name landed. A placeholder that cannot be
//! resolved is reported, and the rest of its line is kept verbatim.

use crate::context::ExpressionContext;
use crate::error::ExpressionError;
use crate::expression::Expression;
use crate::node::{ExpressionNode, FieldNode, TextNode};
use crate::resolver::FieldResolver;
use crate::token::scan_line;
use fieldmap_source_map::{Position, char_len};

impl Expression {
    /// Parse placeholder text into nodes without installing them.
    ///
    /// The result starts with a text node holding the display form,
    /// followed by field nodes in source order.
    pub fn parse_text(
        &mut self,
        text: &str,
        ctx: &mut ExpressionContext<'_>,
    ) -> Vec<ExpressionNode> {
        let (content, fields) = self.parse_parts(text, ctx);
        let mut nodes = Vec::with_capacity(fields.len() + 1);
        nodes.push(ExpressionNode::Text(TextNode {
            id: self.ids.next_id(),
            content,
        }));
        nodes.extend(fields.into_iter().map(ExpressionNode::Field));
        nodes
    }

    /// Replace the whole expression with parsed placeholder text.
    pub fn set_text(&mut self, text: &str, ctx: &mut ExpressionContext<'_>) {
        let (content, fields) = self.parse_parts(text, ctx);
        self.text.content = content;
        self.fields = fields;
        self.refresh(ctx);
    }

    fn parse_parts(
        &mut self,
        text: &str,
        ctx: &mut ExpressionContext<'_>,
    ) -> (String, Vec<FieldNode>) {
        let mut resolver = FieldResolver::new();
        let mut fields = Vec::new();
        let mut lines = Vec::new();

        for (line_idx, line) in text.split('\n').enumerate() {
            let line_no = line_idx + 1;
            let mut out = String::with_capacity(line.len());
            let mut copied = 0;

            for found in scan_line(line, self.config.positional_placeholders) {
                out.push_str(&line[copied..found.range.start]);
                let position = Position::new(line_no, char_len(&out) + 1);

                let resolved = match &found.placeholder {
                    Some(placeholder) => resolver.resolve(placeholder, found.raw, ctx),
                    None => Err(ExpressionError::UnresolvedField {
                        token: found.raw.to_string(),
                    }),
                };
                match resolved {
                    Ok(resolved) => {
                        out.push_str(&resolved.display);
                        fields.push(FieldNode {
                            id: self.ids.next_id(),
                            key: resolved.key(),
                            display: resolved.display,
                            position,
                            collection_context_path: resolved.collection_context_path,
                        });
                        copied = found.range.end;
                    }
                    Err(err) => {
                        tracing::debug!(
                            line = line_no,
                            column = position.column,
                            token = found.raw,
                            "Unresolved placeholder, keeping rest of line"
                        );
                        ctx.report(err.to_diagnostic(Some(position), self.config.unresolved_level));
                        copied = found.range.start;
                        break;
                    }
                }
            }

            out.push_str(&line[copied..]);
            lines.push(out);
        }

        (lines.join("\n"), fields)
    }

    /// Qualified text: every field span replaced by its placeholder.
    ///
    /// Enumeration fields are written as their quoted selected value.
    pub(crate) fn render_qualified(&self, ctx: &mut ExpressionContext<'_>) -> String {
        let mut out = self.text.content.clone();

        for node in self.fields.iter().rev() {
            let Some(range) = self.display_range(node) else {
                let err = ExpressionError::PositionDrift {
                    key: node.key.clone(),
                    position: node.position,
                };
                ctx.report(err.to_diagnostic(Some(node.position), self.config.unresolved_level));
                continue;
            };

            let enum_value = ctx
                .mapping
                .find_mapped_field(&node.key)
                .filter(|m| m.field.as_ref().is_some_and(|f| f.is_enumeration()))
                .map(|m| m.value.clone().unwrap_or_default());
            let replacement = match enum_value {
                Some(value) => format!("\"{}\"", value),
                None => node.qualified_text(),
            };
            out.replace_range(range, &replacement);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_error_reporting::{DiagnosticCollector, DiagnosticKind};
    use fieldmap_model::{DocumentCatalog, Field, FieldKey, FieldType, MappedField, MappingModel};
    use pretty_assertions::assert_eq;

    fn mapping() -> MappingModel {
        let mut mapping = MappingModel::new("m1");
        for path in ["/a", "/b", "/c"] {
            mapping
                .add_source_field(Field::new("DOC1", path, FieldType::String))
                .unwrap();
        }
        mapping
    }

    fn columns(nodes: &[ExpressionNode]) -> Vec<(usize, usize)> {
        nodes
            .iter()
            .filter_map(ExpressionNode::as_field)
            .map(|n| (n.position.line, n.position.column))
            .collect()
    }

    #[test]
    fn test_parse_qualified_tokens() {
        let catalog = DocumentCatalog::new();
        let mut mapping = mapping();
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        let nodes = expr.parse_text("${DOC1:/a} + ${DOC1:/b}", &mut ctx);

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].as_text().unwrap().content, "a + b");
        assert_eq!(columns(&nodes), vec![(1, 1), (1, 5)]);
        // Parsing alone does not install anything
        assert_eq!(expr.to_text(false), "");
    }

    #[test]
    fn test_unresolved_token_keeps_rest_of_line() {
        let catalog = DocumentCatalog::new();
        let mut mapping = mapping();
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.set_text("${DOC1:/a} + ${DOC1:/zip} + ${DOC1:/b}\n{3}", &mut ctx);

        assert_eq!(expr.to_text(false), "a + ${DOC1:/zip} + ${DOC1:/b}\nc");
        let paths: Vec<_> = expr.field_nodes().iter().map(|n| n.key.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/c"]);
        assert_eq!(expr.field_nodes()[1].position, Position::new(2, 1));

        let diagnostics = sink.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code.as_deref(), Some("FM-1-1"));
        assert_eq!(diagnostics[0].location, Some(Position::new(1, 5)));
    }

    #[test]
    fn test_index_out_of_range_uses_configured_level() {
        let catalog = DocumentCatalog::new();
        let mut mapping = mapping();
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let config = crate::ExpressionConfig {
            unresolved_level: DiagnosticKind::Warning,
            ..Default::default()
        };
        let mut expr = Expression::new(config);
        expr.set_text("{0} + {1}", &mut ctx);

        assert_eq!(expr.to_text(false), "{0} + {1}");
        assert!(expr.field_nodes().is_empty());
        assert!(!sink.has_errors());
        assert_eq!(sink.diagnostics()[0].code.as_deref(), Some("FM-1-2"));
    }

    #[test]
    fn test_qualified_round_trip() {
        let catalog = DocumentCatalog::new();
        let mut mapping = mapping();
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.set_text("concat(${a}, {2},\n  ${DOC1:/c})", &mut ctx);
        assert_eq!(expr.to_text(false), "concat(a, b,\n  c)");

        let qualified = expr.to_text(true).to_string();
        assert_eq!(qualified, "concat(${DOC1:/a}, ${DOC1:/b},\n  ${DOC1:/c})");

        let mut again = Expression::default();
        again.set_text(&qualified, &mut ctx);
        assert_eq!(again.to_text(false), expr.to_text(false));
        assert_eq!(again.to_text(true), qualified);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_enumeration_renders_selected_value() {
        let catalog = DocumentCatalog::new();
        let mut mapping = mapping();
        mapping.push_source(
            MappedField::user(Field::enumeration("DOC1", "/color", ["RED", "BLUE"]))
                .with_value("BLUE"),
        );
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.set_text("if(${DOC1:/a}, ${DOC1:/color})", &mut ctx);
        assert_eq!(expr.to_text(false), "if(a, color)");
        assert_eq!(expr.to_text(true), "if(${DOC1:/a}, \"BLUE\")");
    }

    #[test]
    fn test_bare_positional_can_be_disabled() {
        let catalog = DocumentCatalog::new();
        let mut mapping = mapping();
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let config = crate::ExpressionConfig {
            positional_placeholders: false,
            ..Default::default()
        };
        let mut expr = Expression::new(config);
        expr.set_text("{1} + ${1}", &mut ctx);
        assert_eq!(expr.to_text(false), "{1} + a");
        assert_eq!(
            expr.field_nodes()[0].key,
            FieldKey::new("DOC1", "/a")
        );
    }
}
