//! Position tracking for mapping expressions
//!
//! Expression editors address text by 1-based `(line, column)` pairs while
//! the expression buffer itself is a flat string. This crate converts between
//! the two and moves positions across text edits so that field references
//! embedded in the buffer stay anchored to their display spans.
//!
//! # Overview
//!
//! The core types are:
//! - [`Position`]: A 1-based line/column pair, ordered line first
//! - [`Span`]: A position plus a length in characters
//! - [`LineOffsets`]: Cumulative per-line offset table for a text buffer
//!
//! # Example
//!
//! ```rust
//! use fieldmap_source_map::*;
//!
//! let offsets = LineOffsets::new("first + 1\nsecond");
//! assert_eq!(offsets.offset_of(Position::new(2, 1)), Some(10));
//! assert_eq!(offsets.position_of(10), Some(Position::new(2, 1)));
//! ```

pub mod line_offsets;
pub mod types;
pub mod utils;

// Re-export main types
pub use line_offsets::LineOffsets;
pub use types::{Position, Span};
pub use utils::{advance, char_len, char_to_byte, shift_for_insert, shift_for_remove};
