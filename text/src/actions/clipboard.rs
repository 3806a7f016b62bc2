//! Copy, cut and paste through a [`Clipboard`].

use crate::{buffer::TextBuffer, clipboard::Clipboard, cursor::TextCursor, error::Result};

impl TextCursor {
    /// Put the selection on the clipboard. An empty selection copies nothing
    /// and clears the clipboard.
    pub fn copy(&self, buffer: &TextBuffer, clipboard: &mut dyn Clipboard) {
        let selected = buffer.string_from_range(self.selection());
        clipboard.set_text(&selected);
    }

    /// Copy the selection, then delete it.
    pub fn cut(&mut self, buffer: &mut TextBuffer, clipboard: &mut dyn Clipboard) -> Result<bool> {
        self.copy(buffer, clipboard);
        self.delete_to_marker(buffer)
    }

    /// Insert the clipboard contents `amount` times at the caret.
    pub fn paste(
        &mut self,
        buffer: &mut TextBuffer,
        clipboard: &mut dyn Clipboard,
        amount: usize,
    ) -> Result<bool> {
        let text = clipboard.get_text();
        let mut changed = false;
        for _ in 0..amount {
            changed |= self.insert_string(buffer, &text)?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::TestEditor;

    #[test]
    fn copy_then_paste() {
        let mut e = TestEditor::new("<|ab||>c");
        e.cursor.copy(&e.buffer, &mut e.clipboard);
        assert_eq!(e.clipboard.contents(), b"ab");
        e.cursor.place_marker();
        assert!(e.cursor.paste(&mut e.buffer, &mut e.clipboard, 2).unwrap());
        e.assert_notation("ababab|c");
    }

    #[test]
    fn cut_removes_selection() {
        let mut e = TestEditor::new("x<||yz|>");
        assert!(e.cursor.cut(&mut e.buffer, &mut e.clipboard).unwrap());
        e.assert_notation("x|");
        assert_eq!(e.clipboard.contents(), b"yz");
    }

    #[test]
    fn paste_empty_clipboard_is_a_no_op() {
        let mut e = TestEditor::new("a|b");
        assert!(!e.cursor.paste(&mut e.buffer, &mut e.clipboard, 3).unwrap());
        e.assert_notation("a|b");
    }
}
