//! Gap buffer byte store.
//!
//! The backing array is laid out as `[before gap | gap | after gap]`. Logical
//! offsets below `gap_start` index the array directly, offsets at or above it
//! are shifted by the gap length. Edits at the gap are O(1); moving the gap is
//! one `copy_within` of the bytes between the old and new position.
//!
//! The store also tracks the dirty range, the smallest logical interval touched
//! since the owner last cleared it, so token caches know when to re-lex.

use crate::{
    error::{Result, TextError},
    range::remove_from_offset,
};
use std::{fmt, ops::Range};
use tracing::debug;

/// Capacities are rounded up to a multiple of this many bytes.
pub const CAPACITY_ALIGNMENT: usize = 32;

/// Round `size` up to the next multiple of [`CAPACITY_ALIGNMENT`].
pub fn align_up(size: usize) -> usize {
    size.div_ceil(CAPACITY_ALIGNMENT) * CAPACITY_ALIGNMENT
}

#[derive(Clone, Default)]
pub struct GapStore {
    /// Backing array; its length is the total capacity.
    bytes: Vec<u8>,
    gap_start: usize,
    gap_end: usize,
    dirty: Option<Range<usize>>,
}

impl GapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `contents` with room for `capacity` bytes in total.
    ///
    /// The gap starts right after the contents. `capacity` smaller than the
    /// contents is raised to fit them.
    pub fn with_capacity(contents: &[u8], capacity: usize) -> Result<Self> {
        let capacity = capacity.max(contents.len());
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|err| TextError::out_of_memory(capacity, err))?;
        bytes.extend_from_slice(contents);
        bytes.resize(capacity, 0);

        Ok(Self {
            bytes,
            gap_start: contents.len(),
            gap_end: capacity,
            dirty: None,
        })
    }

    /// Logical size: capacity minus the gap.
    pub fn len(&self) -> usize {
        self.bytes.len() - self.gap_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Physical position of the gap inside the backing array.
    pub fn gap(&self) -> Range<usize> {
        self.gap_start..self.gap_end
    }

    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Byte at logical `offset`.
    ///
    /// # Panics
    ///
    /// If `offset` is not below [`Self::len`].
    #[inline]
    pub fn sample(&self, offset: usize) -> u8 {
        assert!(
            offset < self.len(),
            "sample offset {offset} out of bounds (len {})",
            self.len()
        );
        if offset < self.gap_start {
            self.bytes[offset]
        } else {
            self.bytes[offset + self.gap_len()]
        }
    }

    /// The content before and after the gap. Concatenated they are the whole text.
    pub fn get_strings(&self) -> (&[u8], &[u8]) {
        (
            &self.bytes[..self.gap_start],
            &self.bytes[self.gap_end..],
        )
    }

    /// The logical `range` as up to two slices, split at the gap.
    pub fn range_slices(&self, range: Range<usize>) -> (&[u8], &[u8]) {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "range {range:?} out of bounds (len {})",
            self.len()
        );
        let gap_len = self.gap_len();
        if range.end <= self.gap_start {
            (&self.bytes[range], &[])
        } else if range.start >= self.gap_start {
            (&self.bytes[range.start + gap_len..range.end + gap_len], &[])
        } else {
            (
                &self.bytes[range.start..self.gap_start],
                &self.bytes[self.gap_end..range.end + gap_len],
            )
        }
    }

    /// Copy the logical `range` into `out`, returning how many bytes were written.
    ///
    /// Copies at most `out.len()` bytes.
    pub fn write_range_to_buffer(&self, range: Range<usize>, out: &mut [u8]) -> usize {
        let end = range.end.min(range.start + out.len());
        let (left, right) = self.range_slices(range.start..end);
        out[..left.len()].copy_from_slice(left);
        out[left.len()..left.len() + right.len()].copy_from_slice(right);
        left.len() + right.len()
    }

    /// The logical `range` as one contiguous slice.
    ///
    /// Moves the gap out of the way only when the range straddles it.
    pub fn contiguous_range(&mut self, range: Range<usize>) -> &[u8] {
        if range.start < self.gap_start && range.end > self.gap_start {
            self.move_gap_to(range.start);
        }
        self.range_slices(range).0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let (left, right) = self.get_strings();
        let mut out = Vec::with_capacity(left.len() + right.len());
        out.extend_from_slice(left);
        out.extend_from_slice(right);
        out
    }

    /// Relocate the gap so it starts at logical `offset`.
    pub fn move_gap_to(&mut self, offset: usize) {
        assert!(offset <= self.len(), "gap offset {offset} out of bounds");
        if offset < self.gap_start {
            let amount = self.gap_start - offset;
            self.bytes
                .copy_within(offset..self.gap_start, self.gap_end - amount);
            self.gap_start -= amount;
            self.gap_end -= amount;
        } else if offset > self.gap_start {
            let amount = offset - self.gap_start;
            self.bytes
                .copy_within(self.gap_end..self.gap_end + amount, self.gap_start);
            self.gap_start += amount;
            self.gap_end += amount;
        }
    }

    /// Make sure the gap can take `additional` bytes without reallocating.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        if additional > self.gap_len() {
            self.grow(self.gap_start, additional)?;
        }
        Ok(())
    }

    /// Insert `text` at logical `offset`.
    ///
    /// On allocation failure the store is left exactly as it was.
    pub fn insert(&mut self, offset: usize, text: &[u8]) -> Result<()> {
        assert!(
            offset <= self.len(),
            "insert offset {offset} out of bounds (len {})",
            self.len()
        );
        if text.len() > self.gap_len() {
            self.grow(offset, text.len())?;
        } else {
            self.move_gap_to(offset);
        }

        self.bytes[self.gap_start..self.gap_start + text.len()].copy_from_slice(text);
        self.gap_start += text.len();

        let inserted = offset..offset + text.len();
        self.dirty = Some(match self.dirty.take() {
            Some(dirty) => dirty.start.min(inserted.start)..dirty.end.max(inserted.end),
            None => inserted,
        });
        Ok(())
    }

    /// Delete `len` bytes at logical `offset` and return them.
    ///
    /// The returned bytes now live inside the gap, so they stay valid only until
    /// the next mutation; callers copy them out if they need to keep them.
    pub fn delete(&mut self, offset: usize, len: usize) -> &[u8] {
        assert!(
            offset + len <= self.len(),
            "delete range {offset}..{} out of bounds (len {})",
            offset + len,
            self.len()
        );
        let deleted = if offset + len == self.gap_start {
            self.gap_start -= len;
            self.gap_start..self.gap_start + len
        } else {
            self.move_gap_to(offset);
            let start = self.gap_end;
            self.gap_end += len;
            start..start + len
        };

        let removed = offset..offset + len;
        self.dirty = Some(match self.dirty.take() {
            Some(dirty) => {
                remove_from_offset(dirty.start, &removed)..remove_from_offset(dirty.end, &removed)
            },
            None => offset..offset,
        });

        &self.bytes[deleted]
    }

    /// The logical interval touched since the last [`Self::clear_dirty`].
    pub fn dirty_range(&self) -> Option<Range<usize>> {
        self.dirty.clone()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = None;
    }

    /// Reallocate with a larger gap placed at `offset`.
    fn grow(&mut self, offset: usize, needed: usize) -> Result<()> {
        let capacity = self.bytes.len();
        let content_len = self.len();
        let new_capacity = align_up((capacity + capacity / 2 + 1).max(capacity + needed));
        let new_gap_len = new_capacity - content_len;

        let mut grown = Vec::new();
        grown
            .try_reserve_exact(new_capacity)
            .map_err(|err| TextError::out_of_memory(new_capacity, err))?;

        let (left, right) = self.range_slices(0..offset);
        grown.extend_from_slice(left);
        grown.extend_from_slice(right);
        grown.resize(offset + new_gap_len, 0);
        let (left, right) = self.range_slices(offset..content_len);
        grown.extend_from_slice(left);
        grown.extend_from_slice(right);

        debug!(capacity, new_capacity, offset, "grew gap store");
        self.bytes = grown;
        self.gap_start = offset;
        self.gap_end = offset + new_gap_len;
        Ok(())
    }
}

impl fmt::Debug for GapStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GapStore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("gap", &self.gap())
            .field("dirty", &self.dirty)
            .finish()
    }
}
