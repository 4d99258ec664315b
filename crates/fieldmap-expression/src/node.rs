/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Expression nodes.
//!
//! An expression is one [`TextNode`] holding the whole editable text plus
//! any number of [`FieldNode`]s. A field node does not own its field: it
//! records the field's key and where its display name sits in the text.

use fieldmap_model::FieldKey;
use fieldmap_source_map::{Position, Span, char_len};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node, unique within one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expression-node-{}", self.0)
    }
}

/// Monotonic id source owned by each expression.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeIdGenerator {
    next: u64,
}

impl NodeIdGenerator {
    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// The free-text skeleton of the expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub id: NodeId,
    pub content: String,
}

/// A reference to a mapped field, shown by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNode {
    pub id: NodeId,

    /// Key of the mapped source or reference field
    pub key: FieldKey,

    /// Text occupied by this node in the text node
    pub display: String,

    /// Where `display` starts
    pub position: Position,

    /// Path of the collection field this node is relative to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_context_path: Option<String>,
}

impl FieldNode {
    pub fn span(&self) -> Span {
        Span::new(self.position, char_len(&self.display))
    }

    /// Placeholder form written in qualified text.
    pub fn qualified_text(&self) -> String {
        format!("${{{}:{}}}", self.key.doc_id, self.key.path)
    }

    /// True if `position` falls inside the display span.
    pub fn contains(&self, position: Position) -> bool {
        let span = self.span();
        span.start <= position && position < span.end()
    }
}

/// One node of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpressionNode {
    Text(TextNode),
    Field(FieldNode),
}

impl ExpressionNode {
    pub fn id(&self) -> NodeId {
        match self {
            ExpressionNode::Text(node) => node.id,
            ExpressionNode::Field(node) => node.id,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            ExpressionNode::Text(node) => Some(node),
            ExpressionNode::Field(_) => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldNode> {
        match self {
            ExpressionNode::Field(node) => Some(node),
            ExpressionNode::Text(_) => None,
        }
    }

    /// Text this node contributes to the simple (unqualified) form.
    pub fn simple_text(&self) -> &str {
        match self {
            ExpressionNode::Text(node) => &node.content,
            ExpressionNode::Field(node) => &node.display,
        }
    }
}
