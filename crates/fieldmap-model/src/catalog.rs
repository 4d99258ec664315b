/*
 * catalog.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Lookup of fields across loaded documents.

use crate::field::{Field, FieldKey};
use indexmap::IndexMap;

/// Trait for looking up fields of the loaded documents.
///
/// The expression engine uses this to create reference fields for complex
/// fields that are not yet part of the mapping, and to register fields that
/// are inserted into an expression.
pub trait FieldCatalog {
    /// Find a field by key, or `None` if no loaded document has it.
    fn field(&self, key: &FieldKey) -> Option<&Field>;
}

/// In-memory catalog keeping fields in document order.
#[derive(Debug, Clone, Default)]
pub struct DocumentCatalog {
    fields: IndexMap<FieldKey, Field>,
}

impl DocumentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous field with the same key.
    pub fn add(&mut self, field: Field) -> &mut Self {
        self.fields.insert(field.key(), field);
        self
    }

    /// Create a catalog with the given fields.
    pub fn with_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut catalog = Self::new();
        for field in fields {
            catalog.add(field);
        }
        catalog
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Direct children of a complex field, in document order.
    pub fn children<'a>(&'a self, parent: &'a FieldKey) -> impl Iterator<Item = &'a Field> + 'a {
        let prefix = format!("{}/", parent.path.trim_end_matches('/'));
        self.fields.values().filter(move |f| {
            f.doc_id == parent.doc_id
                && f.path
                    .strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldCatalog for DocumentCatalog {
    fn field(&self, key: &FieldKey) -> Option<&Field> {
        self.fields.get(key)
    }
}
