/*
 * mapped_field.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fields bound to a mapping.

use crate::field::{Field, FieldKey};
use serde::{Deserialize, Serialize};

/// A transformation applied to a mapped field (e.g. `Trim`, `Concatenate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

impl FieldAction {
    pub fn new(name: impl Into<String>) -> Self {
        FieldAction {
            name: name.into(),
            arguments: Vec::new(),
        }
    }
}

/// How a mapped field takes part in its mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    /// A regular mapping endpoint chosen by the user
    #[default]
    User,
    /// Placeholder keeping source/target arrays index-aligned
    Padding,
    /// Complex field pulled in only through an expression
    Reference,
}

/// A field bound to one endpoint of a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedField {
    /// The bound field; `None` only for padding fields
    #[serde(default)]
    pub field: Option<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<FieldAction>,
    /// Selected value for enumeration fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub role: FieldRole,
}

impl MappedField {
    pub fn user(field: Field) -> Self {
        MappedField {
            field: Some(field),
            actions: Vec::new(),
            value: None,
            role: FieldRole::User,
        }
    }

    pub fn padding() -> Self {
        MappedField {
            field: None,
            actions: Vec::new(),
            value: None,
            role: FieldRole::Padding,
        }
    }

    pub fn reference(field: Field) -> Self {
        MappedField {
            role: FieldRole::Reference,
            ..MappedField::user(field)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_action(mut self, action: FieldAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn key(&self) -> Option<FieldKey> {
        self.field.as_ref().map(Field::key)
    }

    pub fn is_padding(&self) -> bool {
        self.role == FieldRole::Padding || self.field.is_none()
    }

    pub fn is_reference(&self) -> bool {
        self.role == FieldRole::Reference
    }

    /// Regular, user-visible mapping endpoint.
    pub fn is_user(&self) -> bool {
        self.role == FieldRole::User && self.field.is_some()
    }

    pub fn matches(&self, key: &FieldKey) -> bool {
        self.field.as_ref().is_some_and(|f| f.matches(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    #[test]
    fn test_roles() {
        let field = Field::new("DOC1", "/a", FieldType::String);
        assert!(MappedField::user(field.clone()).is_user());
        assert!(MappedField::reference(field).is_reference());

        let padding = MappedField::padding();
        assert!(padding.is_padding());
        assert!(!padding.is_user());
        assert!(padding.key().is_none());
    }

    #[test]
    fn test_matches() {
        let mapped = MappedField::user(Field::new("DOC1", "/a", FieldType::String));
        assert!(mapped.matches(&FieldKey::new("DOC1", "/a")));
        assert!(!mapped.matches(&FieldKey::new("DOC2", "/a")));
        assert!(!MappedField::padding().matches(&FieldKey::new("DOC1", "/a")));
    }
}
