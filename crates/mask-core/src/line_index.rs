//! Rope-backed line index.
//!
//! Converts between document character offsets and logical `(line, column)` positions, and
//! supports the small set of edits the headless host needs.

use crate::text::Position;
use ropey::Rope;

/// Document text with O(log N) offset and line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// An empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Index `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get the position of a character offset (clamped to the document end).
    pub fn char_offset_to_position(&self, char_offset: usize) -> Position {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);

        Position::new(line_idx, char_offset - line_start_char)
    }

    /// Get the character offset of a position.
    ///
    /// Columns past the end of the line clamp to the line end; lines past the end of the
    /// document clamp to the document end.
    pub fn position_to_char_offset(&self, position: Position) -> usize {
        if position.line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start_char = self.rope.line_to_char(position.line);
        let line_len = if position.line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(position.line + 1) - line_start_char - 1 // -1 for newline
        } else {
            self.rope.len_chars() - line_start_char
        };

        line_start_char + position.column.min(line_len)
    }

    /// Number of lines; an empty document has one.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Insert `text` at a character offset, clamped to the document end.
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Remove up to `len_chars` characters starting at `start_char`.
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = (start_char + len_chars).min(self.rope.len_chars());

        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
    }

    /// The whole document.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.char_count(), 0);
    }

    #[test]
    fn test_char_offset_to_position() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.char_offset_to_position(0), Position::new(0, 0)); // A
        assert_eq!(index.char_offset_to_position(2), Position::new(0, 2)); // C
        assert_eq!(index.char_offset_to_position(4), Position::new(1, 0)); // D
        assert_eq!(index.char_offset_to_position(8), Position::new(2, 0)); // G
        assert_eq!(index.char_offset_to_position(99), Position::new(2, 3));
    }

    #[test]
    fn test_position_to_char_offset() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.position_to_char_offset(Position::new(0, 2)), 2);
        assert_eq!(index.position_to_char_offset(Position::new(1, 0)), 4);
        assert_eq!(index.position_to_char_offset(Position::new(1, 50)), 7);
        assert_eq!(index.position_to_char_offset(Position::new(9, 0)), 11);
    }

    #[test]
    fn test_utf8_cjk() {
        let text = "你好\n世界";
        let index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.char_count(), 5);
        assert_eq!(index.char_offset_to_position(1), Position::new(0, 1));
        assert_eq!(index.char_offset_to_position(3), Position::new(1, 0));
    }

    #[test]
    fn test_insert_delete_text() {
        let mut index = LineIndex::from_text("Hello World");

        index.insert(6, "Beautiful ");
        assert_eq!(index.get_text(), "Hello Beautiful World");

        index.delete(6, 10);
        assert_eq!(index.get_text(), "Hello World");
    }
}
