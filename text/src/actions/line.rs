//! Duplicating and reordering lines.
//!
//! Reordering swaps the caret's line with its neighbour through a single
//! transpose edit, so one undo restores the previous order.

use crate::{
    buffer::TextBuffer,
    cursor::TextCursor,
    error::{Result, TextError},
    range::transposed,
};
use std::ops::Range;
use tracing::trace;

impl TextCursor {
    /// Insert `amount` copies of the caret's line below it. The caret ends on the
    /// last copy at the column it had.
    pub fn duplicate_line(&mut self, buffer: &mut TextBuffer, amount: usize) -> Result<bool> {
        if amount == 0 {
            return Ok(false);
        }
        let store = buffer.store();
        let start = store.line_start(self.offset);
        let end = store.line_end(self.offset);
        let column = self.offset - start;

        let copy_len = end - start + 1;
        let total = copy_len * amount;
        let mut copies = Vec::new();
        copies
            .try_reserve_exact(total)
            .map_err(|err| TextError::out_of_memory(total, err))?;
        let (left, right) = store.range_slices(start..end);
        for _ in 0..amount {
            copies.push(b'\n');
            copies.extend_from_slice(left);
            copies.extend_from_slice(right);
        }

        self.offset = end;
        self.insert_string(buffer, &copies)?;
        self.offset = self.offset - copy_len + 1 + column;
        trace!(line = ?(start..end), amount, "duplicated line");
        Ok(true)
    }

    /// Swap the caret's line with the one above, `amount` times. Stops at the first line.
    pub fn move_line_up(&mut self, buffer: &mut TextBuffer, amount: usize) -> Result<bool> {
        let mut moved = false;
        for _ in 0..amount {
            let store = buffer.store();
            let current = store.line_start(self.offset)..store.line_end(self.offset);
            if current.start == 0 {
                break;
            }
            let above = store.line_start(current.start - 1)..current.start - 1;
            self.swap_lines(buffer, current, above)?;
            moved = true;
        }
        Ok(moved)
    }

    /// Swap the caret's line with the one below, `amount` times. Stops at the last line.
    pub fn move_line_down(&mut self, buffer: &mut TextBuffer, amount: usize) -> Result<bool> {
        let mut moved = false;
        for _ in 0..amount {
            let store = buffer.store();
            let current = store.line_start(self.offset)..store.line_end(self.offset);
            if current.end == buffer.len() {
                break;
            }
            let below = current.end + 1..store.line_end(current.end + 1);
            self.swap_lines(buffer, current, below)?;
            moved = true;
        }
        Ok(moved)
    }

    /// Transpose `current` with `other` and follow `current` to its new place.
    fn swap_lines(
        &mut self,
        buffer: &mut TextBuffer,
        current: Range<usize>,
        other: Range<usize>,
    ) -> Result<()> {
        let column = self.offset - current.start;
        buffer.transpose(current.clone(), other.clone())?;
        let (_, moved) = transposed(&current, &other);
        trace!(from = ?current, to = ?moved, "moved line");
        *self = Self::new(moved.start + column);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::TestEditor;

    #[test]
    fn duplicate_line_keeps_column_on_last_copy() {
        let mut e = TestEditor::new("a\nfo|o\nb");
        assert!(e.cursor.duplicate_line(&mut e.buffer, 2).unwrap());
        e.assert_notation("a\nfoo\nfoo\nfo|o\nb");
        e.buffer.undo().unwrap();
        assert_eq!(e.text(), "a\nfoo\nb");
    }

    #[test]
    fn duplicate_last_line_without_break() {
        let mut e = TestEditor::new("x\n|yz");
        e.cursor.duplicate_line(&mut e.buffer, 1).unwrap();
        e.assert_notation("x\nyz\n|yz");
    }

    #[test]
    fn duplicate_empty_line() {
        let mut e = TestEditor::new("a\n|\nb");
        e.cursor.duplicate_line(&mut e.buffer, 1).unwrap();
        e.assert_notation("a\n\n|\nb");
    }

    #[test]
    fn move_line_down_keeps_column() {
        let mut e = TestEditor::new("line1\nli|ne2\nline3");
        assert!(e.cursor.move_line_down(&mut e.buffer, 1).unwrap());
        e.assert_notation("line1\nline3\nli|ne2");
        assert!(!e.cursor.move_line_down(&mut e.buffer, 1).unwrap());
        e.assert_notation("line1\nline3\nli|ne2");
    }

    #[test]
    fn move_line_up_with_unequal_lengths() {
        let mut e = TestEditor::new("a\nlonger\nx|yz");
        assert!(e.cursor.move_line_up(&mut e.buffer, 5).unwrap());
        e.assert_notation("x|yz\na\nlonger");
        assert!(!e.cursor.move_line_up(&mut e.buffer, 1).unwrap());
    }

    #[test]
    fn move_line_is_one_undo_step() {
        let mut e = TestEditor::new("one\n|two");
        e.cursor.move_line_up(&mut e.buffer, 1).unwrap();
        assert_eq!(e.text(), "two\none");
        assert_eq!(e.buffer.history().committed().len(), 1);
        e.buffer.undo().unwrap();
        assert_eq!(e.text(), "one\ntwo");
    }

    #[test]
    fn move_line_collapses_selection() {
        let mut e = TestEditor::new("<|ab||>\ncd");
        e.cursor.move_line_down(&mut e.buffer, 1).unwrap();
        e.assert_notation("cd\nab|");
    }
}
