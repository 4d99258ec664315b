/*
 * field.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document fields and their lookup keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a loaded document (e.g. `DOC1`, `JSONSchemaSource-abc`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

/// Stable lookup key for a field: document id plus path.
///
/// Expression nodes hold keys rather than fields so that they never point
/// into the mapping's object graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey {
    pub doc_id: DocumentId,
    pub path: String,
}

impl FieldKey {
    pub fn new(doc_id: impl Into<DocumentId>, path: impl Into<String>) -> Self {
        FieldKey {
            doc_id: doc_id.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.doc_id, self.path)
    }
}

/// Value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Date,
    /// A field with child fields
    Complex,
    /// A field restricted to a fixed list of values
    Enumeration,
}

/// A field of a loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub doc_id: DocumentId,
    pub path: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Collection-typed field (`/items<>`, `/items[]`)
    #[serde(default)]
    pub collection: bool,
    /// Allowed values of an enumeration field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

impl Field {
    /// Create a field, deriving its name and collection flag from the path.
    ///
    /// # Example
    ///
    /// ```
    /// use fieldmap_model::{Field, FieldType};
    ///
    /// let field = Field::new("DOC1", "/addressList<>", FieldType::Complex);
    /// assert_eq!(field.name, "addressList");
    /// assert!(field.collection);
    /// ```
    pub fn new(doc_id: impl Into<DocumentId>, path: impl Into<String>, field_type: FieldType) -> Self {
        let path = path.into();
        Field {
            doc_id: doc_id.into(),
            name: leaf_name(&path).to_string(),
            collection: is_collection_segment(last_segment(&path)),
            path,
            field_type,
            enum_values: Vec::new(),
        }
    }

    pub fn enumeration(
        doc_id: impl Into<DocumentId>,
        path: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut field = Field::new(doc_id, path, FieldType::Enumeration);
        field.enum_values = values.into_iter().map(Into::into).collect();
        field
    }

    pub fn key(&self) -> FieldKey {
        FieldKey::new(self.doc_id.clone(), self.path.clone())
    }

    pub fn is_complex(&self) -> bool {
        self.field_type == FieldType::Complex
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    pub fn is_enumeration(&self) -> bool {
        self.field_type == FieldType::Enumeration
    }

    pub fn matches(&self, key: &FieldKey) -> bool {
        self.doc_id == key.doc_id && self.path == key.path
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn is_collection_segment(segment: &str) -> bool {
    segment.ends_with('>') || segment.ends_with(']')
}

/// Last path segment with collection markers removed.
///
/// `/addressList<>/city` gives `city`, `/orders[2]` gives `orders`.
pub fn leaf_name(path: &str) -> &str {
    let segment = last_segment(path);
    match segment.find(['<', '[']) {
        Some(idx) if is_collection_segment(segment) => &segment[..idx],
        _ => segment,
    }
}

/// Join a collection context path and a path relative to it.
///
/// # Example
///
/// ```
/// use fieldmap_model::join_path;
///
/// assert_eq!(join_path("/addressList<>", "city"), "/addressList<>/city");
/// assert_eq!(join_path("/addressList<>/", "/city"), "/addressList<>/city");
/// ```
pub fn join_path(context: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        context.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_name() {
        assert_eq!(leaf_name("/a"), "a");
        assert_eq!(leaf_name("/addressList<>/city"), "city");
        assert_eq!(leaf_name("/addressList<>"), "addressList");
        assert_eq!(leaf_name("/orders[]"), "orders");
        assert_eq!(leaf_name("/orders[3]"), "orders");
        assert_eq!(leaf_name("plain"), "plain");
    }

    #[test]
    fn test_field_new_derives_name_and_collection() {
        let city = Field::new("DOC1", "/addressList<>/city", FieldType::String);
        assert_eq!(city.name, "city");
        assert!(!city.collection);

        let list = Field::new("DOC1", "/items[]", FieldType::Complex);
        assert!(list.collection);
        assert!(list.is_complex());
    }

    #[test]
    fn test_key_display() {
        let key = FieldKey::new("DOC1", "/a/b");
        assert_eq!(key.to_string(), "DOC1:/a/b");
    }

    #[test]
    fn test_field_json_shape() {
        let field: Field = serde_json::from_str(
            r#"{"doc_id":"DOC1","path":"/color","name":"color","type":"enumeration","enum_values":["RED","BLUE"]}"#,
        )
        .unwrap();
        assert!(field.is_enumeration());
        assert_eq!(field.enum_values, vec!["RED", "BLUE"]);
        assert!(!field.collection);

        let minimal: Field =
            serde_json::from_str(r#"{"doc_id":"DOC1","path":"/a","name":"a"}"#).unwrap();
        assert_eq!(minimal.field_type, FieldType::String);
    }
}
