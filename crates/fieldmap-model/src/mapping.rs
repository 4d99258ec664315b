/*
 * mapping.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A single field-to-field mapping.

use crate::catalog::FieldCatalog;
use crate::error::{ModelError, ModelResult};
use crate::field::{DocumentId, Field, FieldKey};
use crate::mapped_field::MappedField;
use fieldmap_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, ErrorType};
use serde::{Deserialize, Serialize};

/// How source fields flow into target fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    #[default]
    OneToOne,
    ManyToOne,
    OneToMany,
    /// Sources are combined by a mapping expression
    Expression,
}

/// A mapping between source and target fields.
///
/// The order of `source_fields` is meaningful: positional expression
/// placeholders (`{2}`) index into the user-mapped source fields, 1-based.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingModel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    transition: TransitionMode,
    #[serde(default)]
    source_fields: Vec<MappedField>,
    #[serde(default)]
    target_fields: Vec<MappedField>,
    #[serde(default)]
    reference_fields: Vec<MappedField>,
    /// Bumped by every structural change
    #[serde(skip)]
    revision: u64,
}

impl MappingModel {
    pub fn new(id: impl Into<String>) -> Self {
        MappingModel {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn transition(&self) -> TransitionMode {
        self.transition
    }

    pub fn set_transition(&mut self, transition: TransitionMode) {
        self.transition = transition;
        self.notify_changed();
    }

    pub fn source_fields(&self) -> &[MappedField] {
        &self.source_fields
    }

    pub fn target_fields(&self) -> &[MappedField] {
        &self.target_fields
    }

    pub fn reference_fields(&self) -> &[MappedField] {
        &self.reference_fields
    }

    fn side(&self, is_source: bool) -> &[MappedField] {
        if is_source {
            &self.source_fields
        } else {
            &self.target_fields
        }
    }

    fn side_mut(&mut self, is_source: bool) -> &mut Vec<MappedField> {
        if is_source {
            &mut self.source_fields
        } else {
            &mut self.target_fields
        }
    }

    fn add_field(&mut self, field: Field, is_source: bool) -> ModelResult<&MappedField> {
        let key = field.key();
        if self.side(is_source).iter().any(|m| m.matches(&key)) {
            return Err(ModelError::DuplicateField { key });
        }
        tracing::debug!(mapping = %self.id, field = %key, is_source, "Adding mapped field");
        let side = self.side_mut(is_source);
        side.push(MappedField::user(field));
        let idx = side.len() - 1;
        self.notify_changed();
        Ok(&self.side(is_source)[idx])
    }

    /// Append a user source field.
    pub fn add_source_field(&mut self, field: Field) -> ModelResult<&MappedField> {
        self.add_field(field, true)
    }

    /// Append a user target field.
    pub fn add_target_field(&mut self, field: Field) -> ModelResult<&MappedField> {
        self.add_field(field, false)
    }

    /// Map a catalog field as a user source field.
    pub fn map_source_from(
        &mut self,
        key: &FieldKey,
        catalog: &dyn FieldCatalog,
    ) -> ModelResult<&MappedField> {
        let field = catalog
            .field(key)
            .cloned()
            .ok_or_else(|| ModelError::UnknownField { key: key.clone() })?;
        self.add_field(field, true)
    }

    /// Append a prepared mapped field (e.g. one carrying actions or a value).
    pub fn push_source(&mut self, mapped: MappedField) {
        self.source_fields.push(mapped);
        self.notify_changed();
    }

    /// Append a padding placeholder to the source side.
    pub fn add_padding_source(&mut self) {
        self.push_source(MappedField::padding());
    }

    /// Remove a user source or target field.
    ///
    /// Source fields are searched first. Reference fields are never removed
    /// by this call.
    pub fn remove_field(&mut self, key: &FieldKey) -> Option<MappedField> {
        let removed = [true, false].into_iter().find_map(|is_source| {
            let side = self.side_mut(is_source);
            let idx = side.iter().position(|m| m.matches(key))?;
            Some(side.remove(idx))
        });
        if removed.is_some() {
            tracing::debug!(mapping = %self.id, field = %key, "Removed mapped field");
            self.notify_changed();
        }
        removed
    }

    /// User-mapped fields of one side, in order, without padding.
    pub fn user_mapped_fields(&self, is_source: bool) -> Vec<&MappedField> {
        self.side(is_source)
            .iter()
            .filter(|m| m.is_user())
            .collect()
    }

    /// Find a user-mapped field by path.
    ///
    /// With `doc_id` the document must match as well. A missing leading `/`
    /// on `path` is tolerated.
    pub fn mapped_field_by_path(
        &self,
        doc_id: Option<&DocumentId>,
        path: &str,
        is_source: bool,
    ) -> Option<&MappedField> {
        self.side(is_source).iter().filter(|m| m.is_user()).find(|m| {
            m.field.as_ref().is_some_and(|f| {
                doc_id.is_none_or(|d| &f.doc_id == d)
                    && (f.path == path || f.path.strip_prefix('/') == Some(path))
            })
        })
    }

    /// The `index`-th (1-based) user-mapped field of one side.
    pub fn mapped_field_for_index(&self, index: usize, is_source: bool) -> Option<&MappedField> {
        let idx = index.checked_sub(1)?;
        self.side(is_source).iter().filter(|m| m.is_user()).nth(idx)
    }

    pub fn reference_field(&self, key: &FieldKey) -> Option<&MappedField> {
        self.reference_fields.iter().find(|m| m.matches(key))
    }

    /// Existing reference field for `key`, or a new one when the catalog
    /// field is complex.
    pub fn get_or_create_reference_field(
        &mut self,
        key: &FieldKey,
        catalog: &dyn FieldCatalog,
    ) -> Option<&MappedField> {
        if let Some(idx) = self.reference_fields.iter().position(|m| m.matches(key)) {
            return Some(&self.reference_fields[idx]);
        }
        let field = catalog.field(key).filter(|f| f.is_complex())?.clone();
        tracing::debug!(mapping = %self.id, field = %key, "Creating reference field");
        self.reference_fields.push(MappedField::reference(field));
        self.notify_changed();
        self.reference_fields.last()
    }

    /// Remove a reference field no longer used by the expression.
    pub fn remove_reference_field(&mut self, key: &FieldKey) -> Option<MappedField> {
        let idx = self.reference_fields.iter().position(|m| m.matches(key))?;
        self.notify_changed();
        Some(self.reference_fields.remove(idx))
    }

    /// A user source field or reference field with this key.
    pub fn find_mapped_field(&self, key: &FieldKey) -> Option<&MappedField> {
        self.source_fields
            .iter()
            .filter(|m| m.is_user())
            .find(|m| m.matches(key))
            .or_else(|| self.reference_field(key))
    }

    /// Record that the mapping changed so observers can refresh.
    pub fn notify_changed(&mut self) {
        self.revision += 1;
        tracing::trace!(mapping = %self.id, revision = self.revision, "Mapping changed");
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Warning to show before switching this mapping to expression mode.
    ///
    /// Expressions combine many sources into one target, so a fixed
    /// transition with several targets cannot take one. Returns None when
    /// an expression can be enabled.
    pub fn check_expression_mode(&self) -> Option<DiagnosticMessage> {
        let targets = self.user_mapped_fields(false).len();
        if self.transition == TransitionMode::Expression || targets <= 1 {
            return None;
        }
        Some(
            DiagnosticMessageBuilder::warning("Invalid multiplicity")
                .with_code("FM-2-1")
                .with_type(ErrorType::Validation)
                .problem(format!(
                    "Expressions need a single target field, but {} are mapped",
                    targets
                ))
                .add_hint("Remove the extra target fields first?")
                .build(),
        )
    }
}
