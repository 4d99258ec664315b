//! Error reporting and diagnostic messages for mapping expressions.
//!
//! Expression editing never fails across its public API for expected
//! problems such as an unresolved field placeholder. Instead, problems are
//! turned into structured [`DiagnosticMessage`] records and handed to a
//! [`DiagnosticSink`] owned by the caller.
//!
//! # Architecture
//!
//! - [`DiagnosticMessage`]: The record (`title`, `kind`, `scope`, `error_type`, `code`)
//! - [`DiagnosticMessageBuilder`]: Tidyverse-style builder (`.problem()`, `.add_detail()`, `.add_hint()`)
//! - [`DiagnosticSink`] / [`DiagnosticCollector`]: Where records go
//! - [`ERROR_CATALOG`]: Code metadata embedded from `error_catalog.json`
//!
//! # Example
//!
//! ```
//! use fieldmap_error_reporting::{DiagnosticCollector, DiagnosticMessageBuilder, DiagnosticSink};
//!
//! let mut sink = DiagnosticCollector::new();
//! sink.report(
//!     DiagnosticMessageBuilder::error("Unresolved field")
//!         .with_code("FM-1-1")
//!         .problem("`${DOC1:/missing}` is not mapped")
//!         .build(),
//! );
//! assert!(sink.has_errors());
//! ```

pub mod builder;
pub mod catalog;
pub mod collector;
pub mod diagnostic;
pub mod macros;

// Re-export main types for convenience
pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info};
pub use collector::{DiagnosticCollector, DiagnosticSink};
pub use diagnostic::{
    DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, ErrorScope, ErrorType,
    MessageContent,
};
