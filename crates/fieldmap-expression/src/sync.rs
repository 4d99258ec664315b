/*
 * sync.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reconciling an expression with its mapping's field list.

use crate::context::ExpressionContext;
use crate::expression::Expression;
use crate::node::FieldNode;
use fieldmap_model::{Field, FieldKey};
use fieldmap_source_map::{Position, shift_for_remove};

impl Expression {
    /// Bring the field nodes in line with the mapping.
    ///
    /// Field nodes whose field is neither a user-mapped source nor a
    /// reference field are removed, unless another node uses them as its
    /// collection context. Every user-mapped source without a node is then
    /// inserted at `at` (advancing) or appended. Calling this twice in a
    /// row changes nothing the second time.
    pub fn update_field_reference(&mut self, at: Option<Position>, ctx: &mut ExpressionContext<'_>) {
        let mapped: Vec<Field> = ctx
            .mapping
            .user_mapped_fields(true)
            .into_iter()
            .filter_map(|m| m.field.clone())
            .collect();

        let stale: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                let live = mapped.iter().any(|f| f.matches(&node.key))
                    || ctx.mapping.reference_field(&node.key).is_some();
                !live && !self.is_collection_context(node)
            })
            .map(|(idx, _)| idx)
            .collect();

        let mut cursor = at;
        for idx in stale.into_iter().rev() {
            let node = &self.fields[idx];
            tracing::debug!(field = %node.key, "Removing field no longer mapped");
            if let Some(position) = cursor {
                if self.display_range(node).is_some() {
                    cursor = Some(shift_for_remove(position, node.position, &node.display));
                }
            }
            self.remove_field_at(idx, ctx);
        }

        let mut inserted = Vec::new();
        for field in mapped {
            let key = field.key();
            if self.references(&key) {
                continue;
            }
            let node = FieldNode {
                id: self.ids.next_id(),
                key,
                display: String::new(),
                position: Position::START,
                collection_context_path: None,
            };
            let id = node.id;
            let end = self.place_field(node, cursor, ctx);
            if end.is_some() {
                inserted.push(id);
            }
            if cursor.is_some() {
                cursor = end.or(cursor);
            }
        }

        self.separate_following(&inserted);
        self.refresh(ctx);
    }

    fn references(&self, key: &FieldKey) -> bool {
        self.fields.iter().any(|n| &n.key == key)
    }

    /// True if another node resolves relative to this one.
    fn is_collection_context(&self, node: &FieldNode) -> bool {
        self.fields.iter().any(|other| {
            other.id != node.id
                && other.key.doc_id == node.key.doc_id
                && other.collection_context_path.as_deref() == Some(node.key.path.as_str())
        })
    }
}
