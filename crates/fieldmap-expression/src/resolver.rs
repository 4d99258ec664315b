/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resolution of placeholders to mapped fields.
//!
//! A resolver lives for one pass over an expression. It remembers the last
//! collection-typed field it produced so that later relative placeholders
//! (`${city}` after `${DOC1:/addressList<>}`) resolve inside that
//! collection.

use crate::context::ExpressionContext;
use crate::error::ExpressionError;
use crate::node::FieldNode;
use crate::token::Placeholder;
use fieldmap_model::{Field, FieldKey, MappingModel, join_path, leaf_name};

/// A placeholder bound to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub field: Field,

    /// Name written into the expression text
    pub display: String,

    /// Set when the field lies inside the active collection context
    pub collection_context_path: Option<String>,
}

impl ResolvedField {
    pub fn key(&self) -> FieldKey {
        self.field.key()
    }
}

/// Resolves placeholders against a mapping, tracking collection context.
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    collection_context: Option<FieldKey>,
}

impl FieldResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver in the state it would have after resolving `nodes` in order.
    pub(crate) fn replay(nodes: &[FieldNode], mapping: &MappingModel) -> Self {
        let mut resolver = Self::new();
        for node in nodes {
            let is_collection = mapping
                .find_mapped_field(&node.key)
                .and_then(|m| m.field.as_ref())
                .is_some_and(Field::is_collection);
            if is_collection {
                resolver.collection_context = Some(node.key.clone());
            }
        }
        resolver
    }

    /// The collection field relative paths currently resolve against.
    pub fn collection_context(&self) -> Option<&FieldKey> {
        self.collection_context.as_ref()
    }

    /// Resolve a placeholder and bind the result to the current context.
    ///
    /// `raw` is the placeholder as written, used in error reports.
    pub fn resolve(
        &mut self,
        placeholder: &Placeholder,
        raw: &str,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ResolvedField, ExpressionError> {
        let field = self.lookup(placeholder, raw, ctx)?;
        Ok(self.bind(field))
    }

    fn lookup(
        &self,
        placeholder: &Placeholder,
        raw: &str,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<Field, ExpressionError> {
        let unresolved = || ExpressionError::UnresolvedField {
            token: raw.to_string(),
        };

        match placeholder {
            Placeholder::Qualified { doc_id, path } => {
                let key = FieldKey::new(doc_id.as_str(), path.as_str());
                source_or_reference(&key, ctx).ok_or_else(unresolved)
            }
            Placeholder::Relative { path } => match &self.collection_context {
                Some(context) => {
                    let key = FieldKey::new(context.doc_id.clone(), join_path(&context.path, path));
                    source_or_reference(&key, ctx).ok_or_else(unresolved)
                }
                None => ctx
                    .mapping
                    .mapped_field_by_path(None, path, true)
                    .and_then(|m| m.field.clone())
                    .ok_or_else(unresolved),
            },
            Placeholder::Positional(index) => ctx
                .mapping
                .mapped_field_for_index(*index, true)
                .and_then(|m| m.field.clone())
                .ok_or_else(|| ExpressionError::IndexOutOfRange {
                    index: *index,
                    count: ctx.mapping.user_mapped_fields(true).len(),
                }),
        }
    }

    /// Bind a field to the current collection context.
    ///
    /// A field under the context is displayed by its leaf name. A
    /// collection field becomes the context for what follows.
    pub fn bind(&mut self, field: Field) -> ResolvedField {
        let collection_context_path = self
            .collection_context
            .as_ref()
            .filter(|context| is_under(&field, context))
            .map(|context| context.path.clone());

        let display = match &collection_context_path {
            Some(_) => leaf_name(&field.path).to_string(),
            None => field.name.clone(),
        };
        let display = if display.is_empty() {
            field.path.clone()
        } else {
            display
        };

        if field.is_collection() {
            tracing::trace!(field = %field.key(), "Entering collection context");
            self.collection_context = Some(field.key());
        }

        ResolvedField {
            field,
            display,
            collection_context_path,
        }
    }
}

/// A mapped source field with this key, else its reference field.
fn source_or_reference(key: &FieldKey, ctx: &mut ExpressionContext<'_>) -> Option<Field> {
    if let Some(mapped) = ctx.mapping.mapped_field_by_path(Some(&key.doc_id), &key.path, true) {
        return mapped.field.clone();
    }
    ctx.mapping
        .get_or_create_reference_field(key, ctx.catalog)
        .and_then(|m| m.field.clone())
}

fn is_under(field: &Field, context: &FieldKey) -> bool {
    let prefix = format!("{}/", context.path.trim_end_matches('/'));
    field.doc_id == context.doc_id && field.path.starts_with(&prefix)
}
