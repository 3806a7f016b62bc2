//! Movement by scalar value, line and paragraph.
//!
//! Vertical movement keeps the column measured in scalar values (tabs count as
//! one) and clamps at the ends of the buffer.

use crate::{
    buffer::{LineCol, TextBuffer},
    cursor::TextCursor,
    utf8::is_char_start,
};
use tracing::trace;

/// First offset at or after `start` that is `cols` scalar values into the line,
/// stopping at the line break or the end of the buffer.
fn advance_columns(buffer: &TextBuffer, start: usize, cols: usize) -> usize {
    let len = buffer.len();
    let mut it = start;
    let mut remaining = cols;
    while it < len {
        let byte = buffer.sample(it);
        if byte == b'\n' {
            break;
        }
        if is_char_start(byte) {
            if remaining == 0 {
                break;
            }
            remaining -= 1;
        }
        it += 1;
    }
    it
}

/// True if the line starting at `start` holds only spaces and tabs.
fn is_blank_line(buffer: &TextBuffer, start: usize) -> bool {
    let len = buffer.len();
    (start..len)
        .map(|it| buffer.sample(it))
        .take_while(|&byte| byte != b'\n')
        .all(|byte| byte == b' ' || byte == b'\t')
}

impl TextCursor {
    fn moved_to(&mut self, offset: usize, command: &'static str) -> bool {
        let from = self.offset;
        self.offset = offset;
        trace!(from, to = offset, command, "move");
        from != offset
    }

    /// Scalar values between the start of the caret's line and the caret.
    fn column(&self, buffer: &TextBuffer) -> usize {
        buffer.col_from_offset(self.offset, 1) - 1
    }

    /// Move left by `amount` scalar values. A no-op at offset 0.
    pub fn move_left(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        let mut it = self.offset;
        let mut remaining = amount;
        while remaining > 0 && it > 0 {
            it -= 1;
            if is_char_start(buffer.sample(it)) {
                remaining -= 1;
            }
        }
        self.moved_to(it, "left")
    }

    /// Move right by `amount` scalar values, stopping at the end of the buffer.
    pub fn move_right(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        let len = buffer.len();
        let mut it = self.offset;
        let mut remaining = amount;
        while remaining > 0 && it < len {
            it += 1;
            while it < len && !is_char_start(buffer.sample(it)) {
                it += 1;
            }
            remaining -= 1;
        }
        self.moved_to(it, "right")
    }

    /// Move up `amount` lines keeping the column. Moving past the first line
    /// lands at offset 0.
    pub fn move_up(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        let store = buffer.store();
        let column = self.column(buffer);
        let mut line_start = store.line_start(self.offset);
        for _ in 0..amount {
            if line_start == 0 {
                return self.moved_to(0, "up");
            }
            line_start = store.line_start(line_start - 1);
        }
        self.moved_to(advance_columns(buffer, line_start, column), "up")
    }

    /// Move down `amount` lines keeping the column. Moving past the last line
    /// lands at the end of the buffer.
    pub fn move_down(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        let store = buffer.store();
        let len = buffer.len();
        if self.offset >= len {
            return false;
        }
        let column = self.column(buffer);
        let mut line_start = self.offset;
        for _ in 0..amount {
            let line_end = store.line_end(line_start);
            if line_end >= len {
                return self.moved_to(len, "down");
            }
            line_start = line_end + 1;
        }
        if amount == 0 {
            line_start = store.line_start(self.offset);
        }
        self.moved_to(advance_columns(buffer, line_start, column), "down")
    }

    pub fn start_of_line(&mut self, buffer: &TextBuffer) -> bool {
        let start = buffer.store().line_start(self.offset);
        self.moved_to(start, "start of line")
    }

    pub fn end_of_line(&mut self, buffer: &TextBuffer) -> bool {
        let end = buffer.store().line_end(self.offset);
        self.moved_to(end, "end of line")
    }

    /// Move up past `amount` paragraphs, landing at the end of the blank line
    /// above each block of non-blank lines.
    pub fn up_paragraph(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        let from = self.offset;
        for _ in 0..amount {
            let mut seen_text = false;
            while self.offset > 0 {
                self.move_left(buffer, 1);
                self.start_of_line(buffer);
                if !is_blank_line(buffer, self.offset) {
                    seen_text = true;
                } else if seen_text {
                    self.end_of_line(buffer);
                    break;
                }
            }
        }
        from != self.offset
    }

    /// Move down past `amount` paragraphs, landing at the end of the blank line
    /// below each block of non-blank lines.
    pub fn down_paragraph(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        let from = self.offset;
        for _ in 0..amount {
            let mut seen_text = false;
            self.move_down(buffer, 1);
            while self.offset < buffer.len() {
                self.start_of_line(buffer);
                if !is_blank_line(buffer, self.offset) {
                    seen_text = true;
                } else if seen_text {
                    self.end_of_line(buffer);
                    break;
                }
                self.move_down(buffer, 1);
            }
        }
        from != self.offset
    }

    /// Drop the selection anchor at the caret.
    pub fn place_marker(&mut self) {
        self.marker_offset = self.offset;
    }

    /// Move the caret to a 1-based line and column.
    pub fn set(&mut self, buffer: &TextBuffer, pos: LineCol, tab_width: usize) -> bool {
        let offset = buffer.offset_from_line_col(pos, tab_width);
        self.moved_to(offset, "set")
    }

    /// Move the marker to a 1-based line and column.
    pub fn set_marker(&mut self, buffer: &TextBuffer, pos: LineCol, tab_width: usize) {
        self.marker_offset = buffer.offset_from_line_col(pos, tab_width);
    }
}
