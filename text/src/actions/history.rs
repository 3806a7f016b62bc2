//! Undo and redo with caret repositioning.
//!
//! After the buffer replays an edit the caret goes to where the change
//! happened and the marker is shifted the same way an insert or delete at that
//! spot would have shifted it.

use crate::{
    buffer::TextBuffer, cursor::TextCursor, error::Result, history::Edit, range::transposed,
};
use std::ops::Range;

impl TextCursor {
    /// Text at `range` came back: caret after it, marker pushed past it.
    fn follow_reinsert(&mut self, range: &Range<usize>) {
        if self.marker_offset > range.start {
            self.marker_offset += range.len();
        }
        self.offset = range.end;
    }

    pub fn undo(&mut self, buffer: &mut TextBuffer) -> Result<bool> {
        let Some(edit) = buffer.undo()? else {
            return Ok(false);
        };
        match &edit {
            Edit::Delete { range, .. } => self.follow_reinsert(range),
            Edit::Insert { range, .. } => self.follow_removal(range),
            Edit::Transpose { first, .. } => *self = Self::new(first.start),
        }
        self.clamp(buffer.len());
        Ok(true)
    }

    pub fn redo(&mut self, buffer: &mut TextBuffer) -> Result<bool> {
        let Some(edit) = buffer.redo()? else {
            return Ok(false);
        };
        match &edit {
            Edit::Delete { range, .. } => self.follow_removal(range),
            Edit::Insert { range, .. } => self.follow_reinsert(range),
            Edit::Transpose { first, second, .. } => {
                let (_, moved) = transposed(first, second);
                *self = Self::new(moved.start);
            },
        }
        self.clamp(buffer.len());
        Ok(true)
    }
}
