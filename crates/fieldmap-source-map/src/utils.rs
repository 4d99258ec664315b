//! Utility functions for moving positions across text edits

use crate::types::Position;

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a character offset to a byte offset
///
/// The offset just past the last character maps to `text.len()`.
/// Returns None if the offset is out of bounds.
pub fn char_to_byte(text: &str, char_offset: usize) -> Option<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
}

/// Position just after `text` when it is written starting at `position`
pub fn advance(position: Position, text: &str) -> Position {
    match text.rfind('\n') {
        None => Position::new(position.line, position.column + char_len(text)),
        Some(idx) => {
            let newlines = text.matches('\n').count();
            Position::new(position.line + newlines, char_len(&text[idx + 1..]) + 1)
        }
    }
}

/// Move `position` to account for `inserted` being written at `at`
///
/// Positions before `at` are unaffected. A position exactly at `at` moves
/// along with the text that followed it.
pub fn shift_for_insert(position: Position, at: Position, inserted: &str) -> Position {
    if position < at {
        return position;
    }

    let end = advance(at, inserted);
    if position.line == at.line {
        Position::new(end.line, end.column + (position.column - at.column))
    } else {
        Position::new(position.line + (end.line - at.line), position.column)
    }
}

/// Move `position` to account for `removed` being deleted starting at `at`
///
/// Positions inside the removed region collapse onto `at`.
pub fn shift_for_remove(position: Position, at: Position, removed: &str) -> Position {
    if position < at {
        return position;
    }

    let end = advance(at, removed);
    if position < end {
        return at;
    }
    if position.line == end.line {
        Position::new(at.line, at.column + (position.column - end.column))
    } else {
        Position::new(position.line - (end.line - at.line), position.column)
    }
}
