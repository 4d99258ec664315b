/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mapping expression engine.
//!
//! A mapping expression mixes free text (operators, function calls) with
//! references to mapped fields. It exists in two forms that this crate
//! keeps consistent:
//!
//! - **Text**: what the user edits. Field references appear by display
//!   name (`trim(city) + zip`); the persisted, qualified form writes them
//!   as placeholders (`trim(${DOC1:/addressList<>/city}) + ${DOC1:/zip}`).
//! - **Nodes**: one [`TextNode`] with the whole text, followed by a
//!   [`FieldNode`] per reference recording the field key and the position
//!   of its display name.
//!
//! Every operation borrows an [`ExpressionContext`] with the mapping, the
//! document catalog and a diagnostic sink. Unresolvable placeholders never
//! fail an operation; they are reported to the sink.
//!
//! # Example
//!
//! ```
//! use fieldmap_error_reporting::DiagnosticCollector;
//! use fieldmap_expression::{Expression, ExpressionContext};
//! use fieldmap_model::{DocumentCatalog, Field, FieldType, MappingModel};
//!
//! let catalog = DocumentCatalog::new();
//! let mut mapping = MappingModel::new("m1");
//! mapping.add_source_field(Field::new("DOC1", "/a", FieldType::String)).unwrap();
//! mapping.add_source_field(Field::new("DOC1", "/b", FieldType::String)).unwrap();
//!
//! let mut diagnostics = DiagnosticCollector::new();
//! let mut ctx = ExpressionContext::new(&mut mapping, &catalog, &mut diagnostics);
//!
//! let mut expr = Expression::default();
//! expr.set_text("${DOC1:/a} + {2}", &mut ctx);
//! assert_eq!(expr.to_text(false), "a + b");
//! assert_eq!(expr.to_text(true), "${DOC1:/a} + ${DOC1:/b}");
//! ```

pub mod codec;
pub mod config;
pub mod context;
pub mod edit;
pub mod error;
pub mod expression;
pub mod node;
pub mod reanchor;
pub mod resolver;
pub mod sync;
pub mod token;

pub use config::ExpressionConfig;
pub use context::ExpressionContext;
pub use error::{ConfigError, ExpressionError};
pub use expression::Expression;
pub use node::{ExpressionNode, FieldNode, NodeId, TextNode};
pub use reanchor::{EditorToken, TokenKind};
pub use resolver::{FieldResolver, ResolvedField};
pub use token::Placeholder;
