//! Caret and selection anchor.

use std::ops::Range;

/// A caret with a selection marker.
///
/// Both offsets are byte offsets on scalar value boundaries in `0..=len`. When
/// nothing is selected `marker_offset == offset`. All editing commands live in
/// [`crate::actions`] as methods on this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextCursor {
    pub offset: usize,
    pub marker_offset: usize,
}

impl TextCursor {
    /// A collapsed cursor at `offset`.
    pub fn new(offset: usize) -> Self {
        Self {
            offset,
            marker_offset: offset,
        }
    }

    pub fn with_marker(offset: usize, marker_offset: usize) -> Self {
        Self {
            offset,
            marker_offset,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.offset != self.marker_offset
    }

    /// The range between caret and marker, whichever comes first.
    pub fn selection(&self) -> Range<usize> {
        self.offset.min(self.marker_offset)..self.offset.max(self.marker_offset)
    }

    /// Back to the origin, as when a new buffer is attached to a view.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Text at `range` went away: caret at its start, marker pulled back.
    pub(crate) fn follow_removal(&mut self, range: &Range<usize>) {
        if self.marker_offset > range.end {
            self.marker_offset -= range.len();
        } else if self.marker_offset >= range.start {
            self.marker_offset = range.start;
        }
        self.offset = range.start;
    }

    /// Pull both offsets back inside a buffer of `len` bytes.
    pub fn clamp(&mut self, len: usize) {
        self.offset = self.offset.min(len);
        self.marker_offset = self.marker_offset.min(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_ordered() {
        assert_eq!(TextCursor::with_marker(7, 2).selection(), 2..7);
        assert_eq!(TextCursor::with_marker(2, 7).selection(), 2..7);
        assert!(!TextCursor::new(3).has_selection());
    }

    #[test]
    fn removal_collapses_marker_inside_range() {
        let mut cursor = TextCursor::with_marker(3, 2);
        cursor.follow_removal(&(1..3));
        assert_eq!(cursor, TextCursor::new(1));

        let mut cursor = TextCursor::with_marker(3, 5);
        cursor.follow_removal(&(1..3));
        assert_eq!(cursor, TextCursor::with_marker(1, 3));
    }

    #[test]
    fn reset_and_clamp() {
        let mut cursor = TextCursor::with_marker(10, 4);
        cursor.clamp(6);
        assert_eq!(cursor, TextCursor::with_marker(6, 4));
        cursor.reset();
        assert_eq!(cursor, TextCursor::new(0));
    }
}
