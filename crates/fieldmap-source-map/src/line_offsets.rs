//! Cumulative line offsets for position lookups

use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Per-line offset table for a text buffer
///
/// `offsets[i]` is the character offset of the first character of line
/// `i + 1`. The table is built by walking the text line by line and
/// accumulating `length + 1` per line (the `+ 1` accounts for the newline),
/// so it has to be rebuilt whenever the text changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOffsets {
    offsets: Vec<usize>,

    /// Total length of the text in characters
    total_length: usize,
}

impl LineOffsets {
    /// Build the offset table for `text`.
    ///
    /// # Example
    ///
    /// ```
    /// use fieldmap_source_map::LineOffsets;
    ///
    /// let offsets = LineOffsets::new("a + b\nc");
    /// assert_eq!(offsets.line_count(), 2);
    /// ```
    pub fn new(text: &str) -> Self {
        let mut offsets = Vec::new();
        let mut current = 0;
        for line in text.split('\n') {
            offsets.push(current);
            current += line.chars().count() + 1;
        }

        LineOffsets {
            offsets,
            total_length: text.chars().count(),
        }
    }

    /// Convert a 1-based position to an absolute character offset.
    ///
    /// Returns None if the line does not exist or the column runs past the
    /// end of the line. The column just after the last character is valid.
    ///
    /// # Example
    ///
    /// ```
    /// use fieldmap_source_map::{LineOffsets, Position};
    ///
    /// let offsets = LineOffsets::new("hello\nworld");
    /// assert_eq!(offsets.offset_of(Position::new(2, 3)), Some(8));
    /// assert_eq!(offsets.offset_of(Position::new(3, 1)), None);
    /// ```
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        if position.line == 0 || position.column == 0 {
            return None;
        }
        let start = *self.offsets.get(position.line - 1)?;
        if position.column - 1 > self.line_length(position.line)? {
            return None;
        }
        Some(start + position.column - 1)
    }

    /// Convert an absolute character offset to a 1-based position.
    ///
    /// An offset pointing at a newline belongs to the line it terminates.
    /// Returns None if the offset is past the end of the text.
    pub fn position_of(&self, offset: usize) -> Option<Position> {
        if offset > self.total_length {
            return None;
        }

        // offsets[0] is always 0, so the partition point is at least 1
        let idx = self.offsets.partition_point(|&start| start <= offset) - 1;
        Some(Position::new(idx + 1, offset - self.offsets[idx] + 1))
    }

    /// Length in characters of a 1-based line, excluding its newline.
    pub fn line_length(&self, line: usize) -> Option<usize> {
        if line == 0 {
            return None;
        }
        let start = *self.offsets.get(line - 1)?;
        let end = match self.offsets.get(line) {
            Some(next) => next - 1,
            None => self.total_length,
        };
        Some(end - start)
    }

    /// Position just after the last character of the text.
    pub fn end_position(&self) -> Position {
        let line = self.line_count();
        let column = self.line_length(line).unwrap_or(0) + 1;
        Position::new(line, column)
    }

    /// Get the total length of the text in characters
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Get the number of lines in the text
    pub fn line_count(&self) -> usize {
        // "".split('\n') still yields one empty line
        self.offsets.len()
    }
}

impl Default for LineOffsets {
    fn default() -> Self {
        LineOffsets::new("")
    }
}
