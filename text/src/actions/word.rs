//! Word-wise movement and deletion.
//!
//! Two flavors of word are supported. Both classify ASCII bytes with a 128-bit
//! table: letters and digits are word bytes, everything else is a boundary.
//! The snake flavor also treats `_` as a boundary so it stops inside
//! `snake_case`; the PascalCase flavor additionally treats uppercase letters as
//! boundaries. Non-ASCII scalar values belong to whatever run they are in.
//!
//! A scan first skips boundary bytes, then skips word bytes, so runs of
//! punctuation and whitespace are crossed in one step.

use crate::{buffer::TextBuffer, cursor::TextCursor, error::Result, utf8::is_char_start};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    Snake,
    Pascal,
}

const SNAKE_WORD: [u8; 16] = [0, 0, 0, 0, 0, 0, 255, 3, 254, 255, 255, 7, 254, 255, 255, 7];
const PASCAL_WORD: [u8; 16] = [0, 0, 0, 0, 0, 0, 255, 3, 0, 0, 0, 0, 254, 255, 255, 7];

impl WordKind {
    fn table(self) -> &'static [u8; 16] {
        match self {
            WordKind::Snake => &SNAKE_WORD,
            WordKind::Pascal => &PASCAL_WORD,
        }
    }

    /// True for ASCII bytes that separate words. Bytes of multi-byte scalar
    /// values are never boundaries.
    pub fn is_boundary(self, byte: u8) -> bool {
        byte < 0x80 && self.table()[usize::from(byte >> 3)] & (1 << (byte & 7)) == 0
    }
}

/// Offset reached by scanning forward from `start` over boundaries, then word bytes.
pub fn find_boundary_forward(buffer: &TextBuffer, start: usize, kind: WordKind) -> usize {
    let len = buffer.len();
    let mut it = start;
    let mut last_valid = it;

    for skip_boundaries in [true, false] {
        while it < len {
            let byte = buffer.sample(it);
            if is_char_start(byte) {
                last_valid = it;
                if byte < 0x80 && kind.is_boundary(byte) != skip_boundaries {
                    break;
                }
            }
            it += 1;
        }
    }

    if it == len {
        len
    } else {
        last_valid
    }
}

/// Offset reached by scanning backward from `start` over boundaries, then word bytes.
pub fn find_boundary_backward(buffer: &TextBuffer, start: usize, kind: WordKind) -> usize {
    let mut it = start;
    for skip_boundaries in [true, false] {
        while it > 0 {
            let byte = buffer.sample(it - 1);
            if byte < 0x80 && kind.is_boundary(byte) != skip_boundaries {
                break;
            }
            it -= 1;
        }
    }
    it
}

impl TextCursor {
    /// Move right over `amount` words.
    pub fn move_right_word(&mut self, buffer: &TextBuffer, kind: WordKind, amount: usize) -> bool {
        let from = self.offset;
        for _ in 0..amount {
            self.offset = find_boundary_forward(buffer, self.offset, kind);
            if self.offset == buffer.len() {
                break;
            }
        }
        trace!(from, to = self.offset, ?kind, "word right");
        from != self.offset
    }

    /// Move left over `amount` words.
    pub fn move_left_word(&mut self, buffer: &TextBuffer, kind: WordKind, amount: usize) -> bool {
        let from = self.offset;
        for _ in 0..amount {
            self.offset = find_boundary_backward(buffer, self.offset, kind);
            if self.offset == 0 {
                break;
            }
        }
        trace!(from, to = self.offset, ?kind, "word left");
        from != self.offset
    }

    pub fn move_right_snake_word(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        self.move_right_word(buffer, WordKind::Snake, amount)
    }

    pub fn move_left_snake_word(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        self.move_left_word(buffer, WordKind::Snake, amount)
    }

    pub fn move_right_pascal_word(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        self.move_right_word(buffer, WordKind::Pascal, amount)
    }

    pub fn move_left_pascal_word(&mut self, buffer: &TextBuffer, amount: usize) -> bool {
        self.move_left_word(buffer, WordKind::Pascal, amount)
    }

    /// Delete `amount` words behind the caret, one log entry per word.
    pub fn delete_backward_word(
        &mut self,
        buffer: &mut TextBuffer,
        kind: WordKind,
        amount: usize,
    ) -> Result<bool> {
        let mut changed = false;
        for _ in 0..amount {
            if self.offset == 0 {
                break;
            }
            let start = find_boundary_backward(buffer, self.offset, kind);
            let len = self.offset - start;
            buffer.delete(start, len)?;
            self.follow_removal(&(start..self.offset));
            changed |= len > 0;
        }
        Ok(changed)
    }

    pub fn delete_backward_snake_word(&mut self, buffer: &mut TextBuffer, amount: usize) -> Result<bool> {
        self.delete_backward_word(buffer, WordKind::Snake, amount)
    }

    pub fn delete_backward_pascal_word(&mut self, buffer: &mut TextBuffer, amount: usize) -> Result<bool> {
        self.delete_backward_word(buffer, WordKind::Pascal, amount)
    }
}
