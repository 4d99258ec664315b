/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mapping model for the field mapping expression engine.
//!
//! This crate holds the data the expression engine reads and mutates but does
//! not own:
//!
//! - [`Field`]: a field in a loaded document, addressed by [`FieldKey`]
//!   (document id + path)
//! - [`MappedField`]: a field bound to a mapping, with its actions; may be a
//!   padding or reference field
//! - [`MappingModel`]: ordered source/target fields plus reference fields
//! - [`FieldCatalog`]: lookup of every field known to the loaded documents
//!
//! Building field trees from schemas is not done here; hosts fill a
//! [`DocumentCatalog`] with whatever their inspection produced.

pub mod catalog;
pub mod error;
pub mod field;
pub mod mapped_field;
pub mod mapping;

pub use catalog::{DocumentCatalog, FieldCatalog};
pub use error::{ModelError, ModelResult};
pub use field::{DocumentId, Field, FieldKey, FieldType, join_path, leaf_name};
pub use mapped_field::{FieldAction, FieldRole, MappedField};
pub use mapping::{MappingModel, TransitionMode};
