//! Insertion and deletion at the caret.

use crate::{
    buffer::TextBuffer,
    cursor::TextCursor,
    error::Result,
    utf8::{encode_repeated, is_char_start},
};
use tracing::trace;

impl TextCursor {
    /// Insert `ch` repeated `amount` times at the caret.
    ///
    /// The caret moves past the inserted text; a marker at or after the caret
    /// moves with it.
    pub fn insert(&mut self, buffer: &mut TextBuffer, ch: char, amount: usize) -> Result<bool> {
        let encoded = encode_repeated(ch, amount);
        self.insert_string(buffer, &encoded)
    }

    /// Insert raw bytes at the caret. Same marker rules as [`Self::insert`].
    pub fn insert_string(&mut self, buffer: &mut TextBuffer, text: &[u8]) -> Result<bool> {
        if text.is_empty() {
            return Ok(false);
        }
        buffer.insert(self.offset, text)?;
        if self.marker_offset >= self.offset {
            self.marker_offset += text.len();
        }
        self.offset += text.len();
        Ok(true)
    }

    /// Delete `amount` scalar values before the caret. A no-op at offset 0.
    pub fn delete_backward(&mut self, buffer: &mut TextBuffer, amount: usize) -> Result<bool> {
        let mut it = self.offset;
        let mut remaining = amount;
        while remaining > 0 && it > 0 {
            it -= 1;
            if is_char_start(buffer.sample(it)) {
                remaining -= 1;
            }
        }
        let len = self.offset - it;
        if len == 0 {
            return Ok(false);
        }

        buffer.delete(it, len)?;
        self.follow_removal(&(it..self.offset));
        Ok(true)
    }

    /// Delete the selection and collapse both ends to where it started.
    pub fn delete_to_marker(&mut self, buffer: &mut TextBuffer) -> Result<bool> {
        if !self.has_selection() {
            return Ok(false);
        }
        let range = self.selection();
        buffer.delete(range.start, range.len())?;
        trace!(?range, "deleted selection");
        *self = Self::new(range.start);
        Ok(true)
    }

    /// Delete the caret's line including its line break.
    pub fn delete_line(&mut self, buffer: &mut TextBuffer) -> Result<bool> {
        let store = buffer.store();
        let start = store.line_start(self.offset);
        let mut end = store.line_end(self.offset);
        if end < buffer.len() {
            end += 1;
        }
        let len = end - start;
        if len == 0 {
            return Ok(false);
        }

        buffer.delete(start, len)?;
        self.follow_removal(&(start..end));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::TestEditor;

    #[test]
    fn insert_advances_caret() {
        let mut e = TestEditor::new("ab|c");
        assert!(e.cursor.insert(&mut e.buffer, 'é', 2).unwrap());
        e.assert_notation("abéé|c");
    }

    #[test]
    fn insert_zero_times_is_a_no_op() {
        let mut e = TestEditor::new("ab|c");
        assert!(!e.cursor.insert(&mut e.buffer, 'x', 0).unwrap());
        assert!(!e.buffer.history().can_undo());
    }

    #[test]
    fn insert_moves_marker_at_or_after_caret() {
        let mut e = TestEditor::new("<||ab|>c");
        e.cursor.insert_string(&mut e.buffer, b"xy").unwrap();
        e.assert_notation("xy<||ab|>c");

        let mut e = TestEditor::new("<|ab||>c");
        e.cursor.insert_string(&mut e.buffer, b"xy").unwrap();
        e.assert_notation("<|abxy||>c");
    }

    #[test]
    fn delete_backward_by_scalar_values() {
        let mut e = TestEditor::new("a€é|b");
        assert!(e.cursor.delete_backward(&mut e.buffer, 2).unwrap());
        e.assert_notation("a|b");
    }

    #[test]
    fn delete_backward_at_start_is_a_no_op() {
        let mut e = TestEditor::new("|ab");
        assert!(!e.cursor.delete_backward(&mut e.buffer, 1).unwrap());
        e.assert_notation("|ab");
    }

    #[test]
    fn delete_backward_moves_marker_after_caret() {
        let mut e = TestEditor::new("ab<||cd|>");
        e.cursor.delete_backward(&mut e.buffer, 1).unwrap();
        e.assert_notation("a<||cd|>");
    }

    #[test]
    fn delete_to_marker_either_direction() {
        let mut e = TestEditor::new("a<|bc||>d");
        assert!(e.cursor.delete_to_marker(&mut e.buffer).unwrap());
        e.assert_notation("a|d");

        let mut e = TestEditor::new("a<||bc|>d");
        assert!(e.cursor.delete_to_marker(&mut e.buffer).unwrap());
        e.assert_notation("a|d");

        let mut e = TestEditor::new("a|d");
        assert!(!e.cursor.delete_to_marker(&mut e.buffer).unwrap());
    }

    #[test]
    fn delete_backward_collapses_marker_inside_deleted_span() {
        let mut e = TestEditor::new("ab<|c||>");
        assert!(e.cursor.delete_backward(&mut e.buffer, 2).unwrap());
        e.assert_notation("a|");
        assert!(!e.cursor.delete_to_marker(&mut e.buffer).unwrap());
        e.assert_notation("a|");
    }

    #[test]
    fn delete_backward_shifts_marker_after_caret() {
        let mut e = TestEditor::new("ab<||c|>d");
        e.cursor.delete_backward(&mut e.buffer, 1).unwrap();
        e.assert_notation("a<||c|>d");
    }

    #[test]
    fn delete_line_includes_line_break() {
        let mut e = TestEditor::new("one\ntw|o\nthree");
        assert!(e.cursor.delete_line(&mut e.buffer).unwrap());
        e.assert_notation("one\n|three");
    }

    #[test]
    fn delete_last_line() {
        let mut e = TestEditor::new("one\ntw|o");
        e.cursor.delete_line(&mut e.buffer).unwrap();
        e.assert_notation("one\n|");
        e.cursor.delete_line(&mut e.buffer).unwrap();
        e.assert_notation("one\n|");
    }

    #[test]
    fn delete_line_marker_follows() {
        let mut e = TestEditor::new("a<||b\nc|>d\ne");
        e.cursor.delete_line(&mut e.buffer).unwrap();
        e.assert_notation("<||c|>d\ne");
    }
}
