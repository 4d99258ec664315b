/*
 * expression.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The expression and its cached text forms.

use crate::config::ExpressionConfig;
use crate::context::ExpressionContext;
use crate::node::{ExpressionNode, FieldNode, NodeIdGenerator, TextNode};
use crate::resolver::FieldResolver;
use fieldmap_error_reporting::generic_error;
use fieldmap_source_map::{LineOffsets, Position};

/// A mapping expression kept as text plus field nodes.
///
/// The text node always comes first in [`nodes`](Expression::nodes), and
/// field nodes follow in text order. Every public mutator leaves both
/// cached text forms up to date before it returns.
#[derive(Debug, Clone)]
pub struct Expression {
    pub(crate) text: TextNode,
    pub(crate) fields: Vec<FieldNode>,
    pub(crate) line_offsets: LineOffsets,
    pub(crate) ids: NodeIdGenerator,
    pub(crate) config: ExpressionConfig,
    qualified_text: String,
}

impl Default for Expression {
    fn default() -> Self {
        Self::new(ExpressionConfig::default())
    }
}

impl Expression {
    pub fn new(config: ExpressionConfig) -> Self {
        let mut ids = NodeIdGenerator::default();
        let text = TextNode {
            id: ids.next_id(),
            content: String::new(),
        };
        Self {
            text,
            fields: Vec::new(),
            line_offsets: LineOffsets::default(),
            ids,
            config,
            qualified_text: String::new(),
        }
    }

    pub fn config(&self) -> &ExpressionConfig {
        &self.config
    }

    /// Snapshot of the node sequence: the text node, then the field nodes.
    pub fn nodes(&self) -> Vec<ExpressionNode> {
        std::iter::once(ExpressionNode::Text(self.text.clone()))
            .chain(self.fields.iter().cloned().map(ExpressionNode::Field))
            .collect()
    }

    pub fn text_node(&self) -> &TextNode {
        &self.text
    }

    pub fn field_nodes(&self) -> &[FieldNode] {
        &self.fields
    }

    pub fn node_count(&self) -> usize {
        self.fields.len() + 1
    }

    /// Field node whose display span covers `position`.
    pub fn field_node_at(&self, position: Position) -> Option<&FieldNode> {
        self.fields.iter().find(|node| node.contains(position))
    }

    pub fn line_offsets(&self) -> &LineOffsets {
        &self.line_offsets
    }

    /// The expression as text.
    ///
    /// The simple form shows field display names. The qualified form
    /// writes every field as `${docId:path}` and is what gets persisted.
    pub fn to_text(&self, qualified: bool) -> &str {
        if qualified {
            &self.qualified_text
        } else {
            &self.text.content
        }
    }

    /// Reset to a single empty text node.
    pub fn clear(&mut self) {
        self.text = TextNode {
            id: self.ids.next_id(),
            content: String::new(),
        };
        self.fields.clear();
        self.line_offsets = LineOffsets::default();
        self.qualified_text.clear();
    }

    /// Build an expression joining every user-mapped source field with the
    /// separator.
    pub fn generate_initial_expression(&mut self, ctx: &mut ExpressionContext<'_>) {
        self.clear();

        let fields: Vec<_> = ctx
            .mapping
            .user_mapped_fields(true)
            .into_iter()
            .filter_map(|m| m.field.clone())
            .collect();

        let mut resolver = FieldResolver::new();
        for field in fields {
            let resolved = resolver.bind(field);
            let node = FieldNode {
                id: self.ids.next_id(),
                key: resolved.key(),
                display: resolved.display,
                position: Position::START,
                collection_context_path: resolved.collection_context_path,
            };
            self.push_field(node);
        }

        tracing::debug!(
            mapping = %ctx.mapping.id,
            fields = self.fields.len(),
            "Generated initial expression"
        );
        self.refresh(ctx);
    }

    /// Recompute offsets and the qualified text after a mutation.
    pub(crate) fn refresh(&mut self, ctx: &mut ExpressionContext<'_>) {
        self.line_offsets = LineOffsets::new(&self.text.content);

        let ordered = self
            .fields
            .windows(2)
            .all(|pair| pair[0].position <= pair[1].position);
        if !ordered {
            tracing::warn!("Field nodes out of text order, re-sorting");
            ctx.report(generic_error!("Field nodes out of text order"));
            self.fields.sort_by_key(|node| node.position);
        }

        self.qualified_text = self.render_qualified(ctx);
        tracing::trace!(
            text = %self.text.content,
            fields = self.fields.len(),
            "Expression refreshed"
        );
    }
}
