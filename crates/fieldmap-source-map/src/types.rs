//! Core types for position tracking

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in expression text (1-indexed, matching editor conventions)
///
/// Positions order by line first, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// The first character of the first line.
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single-line run of characters starting at a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// First character of the span
    pub start: Position,
    /// Length in characters
    pub len: usize,
}

impl Span {
    pub fn new(start: Position, len: usize) -> Self {
        Span { start, len }
    }

    /// Position just past the last character of the span.
    pub fn end(&self) -> Position {
        Position::new(self.start.line, self.start.column + self.len)
    }
}
