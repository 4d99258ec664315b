/*
 * edit.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Inserting and removing nodes.
//!
//! Text edits go through `insert_text_at` and `remove_text_at`, which move
//! every field node across the edit. Field insertion injects the configured
//! separator when the new display name would otherwise touch another field,
//! on either side.

use crate::context::ExpressionContext;
use crate::error::ExpressionError;
use crate::expression::Expression;
use crate::node::{ExpressionNode, FieldNode, NodeId, TextNode};
use crate::resolver::FieldResolver;
use fieldmap_model::{Field, FieldKey};
use fieldmap_source_map::{
    LineOffsets, Position, advance, char_len, char_to_byte, shift_for_insert, shift_for_remove,
};
use std::ops::Range;

impl Expression {
    /// A text node with a fresh id, not yet part of the expression.
    pub fn create_text_node(&mut self, content: impl Into<String>) -> ExpressionNode {
        ExpressionNode::Text(TextNode {
            id: self.ids.next_id(),
            content: content.into(),
        })
    }

    /// A field node with a fresh id, not yet part of the expression.
    ///
    /// The field must be mapped or present in the catalog; otherwise an
    /// unresolved-field diagnostic is reported and None returned.
    pub fn create_field_node(
        &mut self,
        key: &FieldKey,
        ctx: &mut ExpressionContext<'_>,
    ) -> Option<ExpressionNode> {
        let field = ctx
            .mapping
            .find_mapped_field(key)
            .and_then(|m| m.field.as_ref())
            .or_else(|| ctx.catalog.field(key))
            .cloned();
        let Some(field) = field else {
            self.report_unresolved(key, ctx);
            return None;
        };

        let display = if field.name.is_empty() {
            field.path.clone()
        } else {
            field.name.clone()
        };
        Some(ExpressionNode::Field(FieldNode {
            id: self.ids.next_id(),
            key: key.clone(),
            display,
            position: Position::START,
            collection_context_path: None,
        }))
    }

    /// Append a reference to `key` at the end of the expression.
    ///
    /// A catalog field that is not mapped yet is registered first: complex
    /// fields as reference fields, others as user source fields.
    pub fn append_field_node(
        &mut self,
        key: &FieldKey,
        ctx: &mut ExpressionContext<'_>,
    ) -> Option<NodeId> {
        let id = self.ids.next_id();
        let node = FieldNode {
            id,
            key: key.clone(),
            display: String::new(),
            position: Position::START,
            collection_context_path: None,
        };
        let placed = self.place_field(node, None, ctx).map(|_| id);
        self.refresh(ctx);
        placed
    }

    /// Insert nodes one after the other.
    ///
    /// Without a position, text is appended and fields behave as
    /// [`append_field_node`](Expression::append_field_node). With a
    /// position, each node goes where the previous one ended. Positions
    /// past the end of the text are clamped to the end.
    pub fn insert_nodes(
        &mut self,
        nodes: Vec<ExpressionNode>,
        at: Option<Position>,
        ctx: &mut ExpressionContext<'_>,
    ) {
        let mut cursor = at;
        let mut inserted = Vec::new();
        for node in nodes {
            match node {
                ExpressionNode::Text(text) => match cursor {
                    None => self.push_text(&text.content),
                    Some(position) => {
                        let position = self.normalize_insert_position(position);
                        self.insert_text_at(position, &text.content);
                        cursor = Some(advance(position, &text.content));
                    }
                },
                ExpressionNode::Field(field) => {
                    let id = field.id;
                    let end = self.place_field(field, cursor, ctx);
                    if end.is_some() {
                        inserted.push(id);
                    }
                    if cursor.is_some() {
                        cursor = end.or(cursor);
                    }
                }
            }
        }
        self.separate_following(&inserted);
        self.refresh(ctx);
    }

    /// Remove the field node starting exactly at `position`.
    ///
    /// Returns false, and changes nothing, when no field node starts there.
    pub fn remove_node_at_position(
        &mut self,
        position: Position,
        ctx: &mut ExpressionContext<'_>,
    ) -> bool {
        let Some(idx) = self.fields.iter().position(|n| n.position == position) else {
            tracing::debug!(%position, "No field node to remove");
            return false;
        };
        let node = self.remove_field_at(idx, ctx);
        self.release(&node.key, ctx);
        self.refresh(ctx);
        true
    }

    /// Backspace-style removal.
    ///
    /// With a position this is [`remove_node_at_position`]. Without one the
    /// last field node is removed if it ends the text, otherwise the last
    /// character is trimmed.
    ///
    /// [`remove_node_at_position`]: Expression::remove_node_at_position
    pub fn remove_token(&mut self, at: Option<Position>, ctx: &mut ExpressionContext<'_>) -> bool {
        if let Some(position) = at {
            return self.remove_node_at_position(position, ctx);
        }

        if self.abuts_end() {
            let idx = self.fields.len() - 1;
            let node = self.remove_field_at(idx, ctx);
            self.release(&node.key, ctx);
        } else {
            let Some(last) = self.text.content.chars().last() else {
                return false;
            };
            let total = self.line_offsets.total_length();
            let Some(position) = self.line_offsets.position_of(total - 1) else {
                return false;
            };
            self.remove_text_at(position, last.encode_utf8(&mut [0; 4]));
        }
        self.refresh(ctx);
        true
    }

    /// Register (if needed), bind, and insert a field node.
    ///
    /// Returns the position just after the inserted text, or None when the
    /// field could not be found.
    pub(crate) fn place_field(
        &mut self,
        mut node: FieldNode,
        at: Option<Position>,
        ctx: &mut ExpressionContext<'_>,
    ) -> Option<Position> {
        let Some(field) = ensure_registered(&node.key, ctx) else {
            self.report_unresolved(&node.key, ctx);
            return None;
        };

        let at = at.map(|position| self.normalize_insert_position(position));
        let idx = match at {
            Some(position) => self.fields.partition_point(|n| n.position < position),
            None => self.fields.len(),
        };
        let resolved = FieldResolver::replay(&self.fields[..idx], &*ctx.mapping).bind(field);
        node.display = resolved.display;
        node.collection_context_path = resolved.collection_context_path;

        tracing::debug!(field = %node.key, at = ?at, "Inserting field node");
        Some(match at {
            Some(position) => self.insert_field_at(node, position),
            None => {
                self.push_field(node);
                self.line_offsets.end_position()
            }
        })
    }

    /// Append a field node, separating it from a field that ends the text.
    pub(crate) fn push_field(&mut self, mut node: FieldNode) {
        if self.abuts_end() {
            let separator = self.config.separator.clone();
            self.push_text(&separator);
        }
        node.position = self.line_offsets.end_position();
        self.push_text(&node.display);
        self.fields.push(node);
    }

    /// Splice a field node in at `at`, returning the position after it.
    fn insert_field_at(&mut self, mut node: FieldNode, at: Position) -> Position {
        if at == self.line_offsets.end_position() {
            self.push_field(node);
            return self.line_offsets.end_position();
        }

        let separator = self.config.separator.clone();
        let mut at = at;
        if self.fields.iter().any(|n| n.span().end() == at) {
            self.insert_text_at(at, &separator);
            at = advance(at, &separator);
        }

        let idx = self.fields.partition_point(|n| n.position < at);
        let display = node.display.clone();
        self.insert_text_at(at, &display);
        node.position = at;
        self.fields.insert(idx, node);

        advance(at, &display)
    }

    /// Inject the separator after each inserted field that a field
    /// directly follows.
    pub(crate) fn separate_following(&mut self, inserted: &[NodeId]) {
        let separator = self.config.separator.clone();
        for idx in 1..self.fields.len() {
            let (previous, next) = (&self.fields[idx - 1], &self.fields[idx]);
            if inserted.contains(&previous.id) && previous.span().end() == next.position {
                let at = next.position;
                self.insert_text_at(at, &separator);
            }
        }
    }

    /// Remove the field node at `idx` and its display text.
    ///
    /// If the text no longer holds the display name at the node's position,
    /// only the node is dropped and the drift is reported.
    pub(crate) fn remove_field_at(
        &mut self,
        idx: usize,
        ctx: &mut ExpressionContext<'_>,
    ) -> FieldNode {
        let node = self.fields.remove(idx);
        if self.display_range(&node).is_some() {
            self.remove_text_at(node.position, &node.display);
        } else {
            tracing::warn!(field = %node.key, position = %node.position, "Field node out of sync with text");
            let err = ExpressionError::PositionDrift {
                key: node.key.clone(),
                position: node.position,
            };
            ctx.report(err.to_diagnostic(Some(node.position), self.config.unresolved_level));
        }
        node
    }

    /// Deregister a field no longer referenced by any node.
    ///
    /// Reference fields stay in the mapping.
    pub(crate) fn release(&mut self, key: &FieldKey, ctx: &mut ExpressionContext<'_>) {
        if self.fields.iter().any(|n| &n.key == key) {
            return;
        }
        if ctx.mapping.reference_field(key).is_some() {
            return;
        }
        if ctx.mapping.remove_field(key).is_some() {
            tracing::debug!(field = %key, "Deregistered field with no remaining node");
        }
    }

    pub(crate) fn report_unresolved(&self, key: &FieldKey, ctx: &mut ExpressionContext<'_>) {
        let err = ExpressionError::UnresolvedField {
            token: format!("${{{}:{}}}", key.doc_id, key.path),
        };
        ctx.report(err.to_diagnostic(None, self.config.unresolved_level));
    }

    /// True if the last field node's span ends the text.
    pub(crate) fn abuts_end(&self) -> bool {
        self.fields
            .last()
            .is_some_and(|n| n.span().end() == self.line_offsets.end_position())
    }

    /// Clamp `position` into the text and move it out of any field span.
    pub(crate) fn normalize_insert_position(&self, position: Position) -> Position {
        let position = if self.line_offsets.offset_of(position).is_some() {
            position
        } else {
            tracing::debug!(%position, "Insert position past end of text, clamping");
            self.line_offsets.end_position()
        };

        match self
            .fields
            .iter()
            .find(|n| n.position < position && position < n.span().end())
        {
            Some(node) => node.span().end(),
            None => position,
        }
    }

    /// Byte range of a node's display text, if the text still holds it.
    pub(crate) fn display_range(&self, node: &FieldNode) -> Option<Range<usize>> {
        let range = self.byte_range(node.position, &node.display)?;
        (self.text.content.get(range.clone()) == Some(node.display.as_str())).then_some(range)
    }

    fn byte_range(&self, at: Position, text: &str) -> Option<Range<usize>> {
        let start = self.line_offsets.offset_of(at)?;
        let content = &self.text.content;
        Some(char_to_byte(content, start)?..char_to_byte(content, start + char_len(text))?)
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.content.push_str(text);
        self.line_offsets = LineOffsets::new(&self.text.content);
    }

    /// Write `inserted` at `at`, moving field nodes at or after it.
    pub(crate) fn insert_text_at(&mut self, at: Position, inserted: &str) {
        if inserted.is_empty() {
            return;
        }
        let Some(byte) = self
            .line_offsets
            .offset_of(at)
            .and_then(|offset| char_to_byte(&self.text.content, offset))
        else {
            tracing::warn!(%at, "Insert position outside text");
            return;
        };

        self.text.content.insert_str(byte, inserted);
        for node in &mut self.fields {
            node.position = shift_for_insert(node.position, at, inserted);
        }
        self.line_offsets = LineOffsets::new(&self.text.content);
    }

    /// Delete `removed` starting at `at`, moving later field nodes back.
    pub(crate) fn remove_text_at(&mut self, at: Position, removed: &str) {
        let Some(range) = self.byte_range(at, removed) else {
            tracing::warn!(%at, "Remove range outside text");
            return;
        };
        self.text.content.replace_range(range, "");
        for node in &mut self.fields {
            node.position = shift_for_remove(node.position, at, removed);
        }
        self.line_offsets = LineOffsets::new(&self.text.content);
    }
}

/// The mapped field for `key`, registering catalog fields on first use.
fn ensure_registered(key: &FieldKey, ctx: &mut ExpressionContext<'_>) -> Option<Field> {
    if let Some(mapped) = ctx.mapping.find_mapped_field(key) {
        return mapped.field.clone();
    }

    let field = ctx.catalog.field(key)?.clone();
    if field.is_complex() {
        return ctx
            .mapping
            .get_or_create_reference_field(key, ctx.catalog)
            .and_then(|m| m.field.clone());
    }
    match ctx.mapping.add_source_field(field) {
        Ok(mapped) => mapped.field.clone(),
        Err(err) => {
            tracing::warn!(field = %key, error = %err, "Could not register field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_error_reporting::{DiagnosticCollector, DiagnosticKind};
    use fieldmap_model::{DocumentCatalog, FieldType, MappingModel};
    use pretty_assertions::assert_eq;

    fn key(path: &str) -> FieldKey {
        FieldKey::new("DOC1", path)
    }

    fn catalog() -> DocumentCatalog {
        DocumentCatalog::with_fields(
            ["/x", "/y", "/z"].map(|p| Field::new("DOC1", p, FieldType::String)),
        )
    }

    fn columns(expr: &Expression) -> Vec<usize> {
        expr.field_nodes().iter().map(|n| n.position.column).collect()
    }

    #[test]
    fn test_append_injects_separator() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        assert!(expr.append_field_node(&key("/x"), &mut ctx).is_some());
        assert!(expr.append_field_node(&key("/y"), &mut ctx).is_some());

        assert_eq!(expr.to_text(false), "x + y");
        assert_eq!(columns(&expr), vec![1, 5]);
        // Both catalog fields were registered as sources
        assert_eq!(ctx.mapping.user_mapped_fields(true).len(), 2);
    }

    #[test]
    fn test_append_after_text_has_no_separator() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        let text = expr.create_text_node("trim(");
        expr.insert_nodes(vec![text], None, &mut ctx);
        expr.append_field_node(&key("/x"), &mut ctx);
        let close = expr.create_text_node(")");
        expr.insert_nodes(vec![close], None, &mut ctx);

        assert_eq!(expr.to_text(false), "trim(x)");
        assert_eq!(expr.to_text(true), "trim(${DOC1:/x})");
    }

    #[test]
    fn test_insert_before_existing_field_shifts_it() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.append_field_node(&key("/x"), &mut ctx);
        let y = expr.create_field_node(&key("/y"), &mut ctx).unwrap();
        let comma = expr.create_text_node(", ");
        expr.insert_nodes(vec![y, comma], Some(Position::new(1, 1)), &mut ctx);

        assert_eq!(expr.to_text(false), "y, x");
        assert_eq!(columns(&expr), vec![1, 4]);
        let paths: Vec<_> = expr.field_nodes().iter().map(|n| n.key.path.as_str()).collect();
        assert_eq!(paths, vec!["/y", "/x"]);
    }

    #[test]
    fn test_insert_right_after_field_injects_separator() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        let nodes = vec![
            expr.create_field_node(&key("/x"), &mut ctx).unwrap(),
            expr.create_text_node(")"),
        ];
        expr.insert_nodes(nodes, None, &mut ctx);
        assert_eq!(expr.to_text(false), "x)");

        let z = expr.create_field_node(&key("/z"), &mut ctx).unwrap();
        expr.insert_nodes(vec![z], Some(Position::new(1, 2)), &mut ctx);
        assert_eq!(expr.to_text(false), "x + z)");
        assert_eq!(columns(&expr), vec![1, 5]);
    }

    #[test]
    fn test_insert_directly_before_field_is_separated() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.append_field_node(&key("/x"), &mut ctx);
        let y = expr.create_field_node(&key("/y"), &mut ctx).unwrap();
        expr.insert_nodes(vec![y], Some(Position::new(1, 1)), &mut ctx);

        assert_eq!(expr.to_text(false), "y + x");
        assert_eq!(expr.to_text(true), "${DOC1:/y} + ${DOC1:/x}");
        assert_eq!(columns(&expr), vec![1, 5]);
    }

    #[test]
    fn test_insert_two_fields_before_field() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.append_field_node(&key("/x"), &mut ctx);
        let nodes = vec![
            expr.create_field_node(&key("/y"), &mut ctx).unwrap(),
            expr.create_field_node(&key("/z"), &mut ctx).unwrap(),
        ];
        expr.insert_nodes(nodes, Some(Position::new(1, 1)), &mut ctx);

        assert_eq!(expr.to_text(false), "y + z + x");
        assert_eq!(columns(&expr), vec![1, 5, 9]);
    }

    #[test]
    fn test_insert_position_is_clamped() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.append_field_node(&key("/x"), &mut ctx);
        let y = expr.create_field_node(&key("/y"), &mut ctx).unwrap();
        expr.insert_nodes(vec![y], Some(Position::new(9, 9)), &mut ctx);
        assert_eq!(expr.to_text(false), "x + y");
    }

    #[test]
    fn test_remove_node_deregisters_last_reference() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.append_field_node(&key("/x"), &mut ctx);
        expr.append_field_node(&key("/y"), &mut ctx);
        expr.append_field_node(&key("/x"), &mut ctx);
        assert_eq!(expr.to_text(false), "x + y + x");

        // One of two x nodes: the field stays mapped
        assert!(expr.remove_node_at_position(Position::new(1, 1), &mut ctx));
        assert_eq!(expr.to_text(false), " + y + x");
        assert!(ctx.mapping.find_mapped_field(&key("/x")).is_some());

        let revision = ctx.mapping.revision();
        assert!(expr.remove_node_at_position(Position::new(1, 8), &mut ctx));
        assert_eq!(expr.to_text(false), " + y + ");
        assert!(ctx.mapping.find_mapped_field(&key("/x")).is_none());
        assert!(ctx.mapping.revision() > revision);
    }

    #[test]
    fn test_remove_unknown_position_is_noop() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.append_field_node(&key("/x"), &mut ctx);
        assert!(!expr.remove_node_at_position(Position::new(1, 2), &mut ctx));
        assert!(!expr.remove_node_at_position(Position::new(4, 1), &mut ctx));
        assert_eq!(expr.to_text(false), "x");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_remove_token_without_position() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.append_field_node(&key("/x"), &mut ctx);
        expr.append_field_node(&key("/y"), &mut ctx);

        assert!(expr.remove_token(None, &mut ctx));
        assert_eq!(expr.to_text(false), "x + ");
        assert!(expr.remove_token(None, &mut ctx));
        assert_eq!(expr.to_text(false), "x +");
        assert_eq!(expr.field_nodes().len(), 1);

        for _ in 0..2 {
            expr.remove_token(None, &mut ctx);
        }
        assert!(expr.remove_token(None, &mut ctx));
        assert_eq!(expr.to_text(false), "");
        assert!(!expr.remove_token(None, &mut ctx));
        assert_eq!(expr.node_count(), 1);
    }

    #[test]
    fn test_unknown_field_is_reported() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        assert!(expr.create_field_node(&key("/nope"), &mut ctx).is_none());
        assert!(expr.append_field_node(&key("/nope"), &mut ctx).is_none());
        assert_eq!(expr.to_text(false), "");

        let diagnostics = sink.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Error);
        assert_eq!(diagnostics[0].code.as_deref(), Some("FM-1-1"));
    }

    #[test]
    fn test_multiline_shift() {
        let catalog = catalog();
        let mut mapping = MappingModel::new("m1");
        let mut sink = DiagnosticCollector::new();
        let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut sink);

        let mut expr = Expression::default();
        expr.append_field_node(&key("/x"), &mut ctx);
        let nodes = vec![expr.create_text_node("if(\n  ")];
        expr.insert_nodes(nodes, Some(Position::START), &mut ctx);

        assert_eq!(expr.to_text(false), "if(\n  x");
        assert_eq!(expr.field_nodes()[0].position, Position::new(2, 3));
        assert_eq!(expr.to_text(true), "if(\n  ${DOC1:/x}");
    }
}
