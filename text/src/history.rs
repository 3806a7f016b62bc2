//! Linear undo/redo log.
//!
//! Every logged edit is applied to the [`GapStore`] by the history itself, so the
//! log and the store cannot drift apart. Insert and delete payloads are kept in a
//! side byte array: `text[..text_committed]` belongs to edits that have happened,
//! the rest belongs to undone edits and is reused by redo.

use crate::{
    clock::TickSource,
    error::{Result, TextError},
    gap::GapStore,
    range::{intersects, transposed},
};
use std::ops::Range;
use tracing::{debug, trace};

/// One logged edit.
///
/// `range` is the logical byte range the edit covered: for an insert, where the
/// new text now lives; for a delete, where the removed text used to live.
/// `payload` locates the bytes in the history's side array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert {
        range: Range<usize>,
        payload: Range<usize>,
        tick: u64,
    },
    Delete {
        range: Range<usize>,
        payload: Range<usize>,
        tick: u64,
    },
    /// Two disjoint ranges swapped places. `first` precedes `second`.
    Transpose {
        first: Range<usize>,
        second: Range<usize>,
        tick: u64,
    },
}

impl Edit {
    pub fn tick(&self) -> u64 {
        match self {
            Edit::Insert { tick, .. } | Edit::Delete { tick, .. } | Edit::Transpose { tick, .. } => {
                *tick
            },
        }
    }
}

/// Knobs for coalescing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Edits closer together than this many milliseconds may merge.
    pub coalesce_window_ms: u64,
    /// Merge runs of backspaces the same way typed text is merged.
    pub coalesce_deletions: bool,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            coalesce_window_ms: 300,
            coalesce_deletions: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct EditHistory {
    edits: Vec<Edit>,
    /// Edits below this index have happened; the rest can be redone.
    committed: usize,
    text: Vec<u8>,
    text_committed: usize,
    options: HistoryOptions,
}

impl EditHistory {
    pub fn new(options: HistoryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> HistoryOptions {
        self.options
    }

    /// Edits that have happened, oldest first.
    pub fn committed(&self) -> &[Edit] {
        &self.edits[..self.committed]
    }

    /// Undone edits that redo would reapply, next first.
    pub fn redoable(&self) -> &[Edit] {
        &self.edits[self.committed..]
    }

    pub fn can_undo(&self) -> bool {
        self.committed > 0
    }

    pub fn can_redo(&self) -> bool {
        self.committed < self.edits.len()
    }

    /// Captured bytes for an insert or delete edit.
    pub fn payload(&self, edit: &Edit) -> &[u8] {
        match edit {
            Edit::Insert { payload, .. } | Edit::Delete { payload, .. } => &self.text[payload.clone()],
            Edit::Transpose { .. } => &[],
        }
    }

    fn window_ticks(&self, clock: &dyn TickSource) -> u64 {
        clock.tick_rate().saturating_mul(self.options.coalesce_window_ms) / 1000
    }

    /// Reserve room for `edits` more edits and `payload_len` payload bytes so
    /// pushes after a store mutation cannot fail.
    pub fn reserve(&mut self, edits: usize, payload_len: usize) -> Result<()> {
        self.edits
            .try_reserve(edits)
            .map_err(|err| TextError::out_of_memory(edits * size_of::<Edit>(), err))?;
        self.text
            .try_reserve(payload_len)
            .map_err(|err| TextError::out_of_memory(payload_len, err))?;
        Ok(())
    }

    /// Drop the redo tail.
    fn truncate(&mut self) {
        if self.committed < self.edits.len() {
            trace!(
                discarded = self.edits.len() - self.committed,
                "discarding redo history"
            );
        }
        self.edits.truncate(self.committed);
        self.text.truncate(self.text_committed);
    }

    fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
        self.committed = self.edits.len();
        self.text_committed = self.text.len();
    }

    /// Insert `bytes` at `offset` and log it, merging with the previous insert
    /// when typing continues right where it ended.
    pub fn record_insert(
        &mut self,
        store: &mut GapStore,
        offset: usize,
        bytes: &[u8],
        clock: &dyn TickSource,
    ) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.reserve(1, bytes.len())?;
        store.insert(offset, bytes)?;

        let now = clock.now();
        let since = now.saturating_sub(self.window_ticks(clock));
        self.truncate();
        self.text.extend_from_slice(bytes);

        if let Some(Edit::Insert {
            range,
            payload,
            tick,
        }) = self.edits.last_mut()
        {
            if range.end == offset && *tick >= since {
                range.end += bytes.len();
                payload.end += bytes.len();
                *tick = now;
                self.text_committed = self.text.len();
                trace!(offset, len = bytes.len(), "coalesced insert");
                return Ok(());
            }
        }

        let start = self.text.len() - bytes.len();
        self.push(Edit::Insert {
            range: offset..offset + bytes.len(),
            payload: start..self.text.len(),
            tick: now,
        });
        trace!(offset, len = bytes.len(), "insert");
        Ok(())
    }

    /// Delete `len` bytes at `offset`, capturing them for undo.
    pub fn record_delete(
        &mut self,
        store: &mut GapStore,
        offset: usize,
        len: usize,
        clock: &dyn TickSource,
    ) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        self.reserve(1, len)?;

        let now = clock.now();
        let since = now.saturating_sub(self.window_ticks(clock));
        self.truncate();
        self.text.extend_from_slice(store.delete(offset, len));

        if self.options.coalesce_deletions {
            if let Some(Edit::Delete {
                range,
                payload,
                tick,
            }) = self.edits.last_mut()
            {
                if range.start == offset + len && *tick >= since {
                    // Backspacing: the new bytes precede the captured ones.
                    self.text[payload.start..].rotate_right(len);
                    range.start = offset;
                    payload.end += len;
                    *tick = now;
                    self.text_committed = self.text.len();
                    trace!(offset, len, "coalesced delete");
                    return Ok(());
                }
            }
        }

        let start = self.text.len() - len;
        self.push(Edit::Delete {
            range: offset..offset + len,
            payload: start..self.text.len(),
            tick: now,
        });
        trace!(offset, len, "delete");
        Ok(())
    }

    /// Swap two disjoint ranges as one atomic edit.
    pub fn record_transpose(
        &mut self,
        store: &mut GapStore,
        first: Range<usize>,
        second: Range<usize>,
        clock: &dyn TickSource,
    ) -> Result<()> {
        let (first, second) = if first.start > second.start {
            (second, first)
        } else {
            (first, second)
        };
        self.reserve(1, 0)?;
        transpose(store, first.clone(), second.clone())?;

        self.truncate();
        trace!(?first, ?second, "transpose");
        self.push(Edit::Transpose {
            first,
            second,
            tick: clock.now(),
        });
        Ok(())
    }

    /// Revert the most recent committed edit. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, store: &mut GapStore) -> Result<Option<Edit>> {
        let Some(edit) = self.committed().last().cloned() else {
            return Ok(None);
        };

        match &edit {
            Edit::Insert { range, payload, .. } => {
                store.delete(range.start, range.len());
                self.text_committed = payload.start;
            },
            Edit::Delete { range, payload, .. } => {
                store.insert(range.start, &self.text[payload.clone()])?;
                self.text_committed = payload.start;
            },
            Edit::Transpose { first, second, .. } => {
                let (first, second) = transposed(first, second);
                transpose(store, first, second)?;
            },
        }

        self.committed -= 1;
        debug!(?edit, "undo");
        Ok(Some(edit))
    }

    /// Reapply the next undone edit. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, store: &mut GapStore) -> Result<Option<Edit>> {
        let Some(edit) = self.redoable().first().cloned() else {
            return Ok(None);
        };

        match &edit {
            Edit::Insert { range, payload, .. } => {
                store.insert(range.start, &self.text[payload.clone()])?;
                self.text_committed = payload.end;
            },
            Edit::Delete { range, payload, .. } => {
                store.delete(range.start, range.len());
                self.text_committed = payload.end;
            },
            Edit::Transpose { first, second, .. } => {
                transpose(store, first.clone(), second.clone())?;
            },
        }

        self.committed += 1;
        debug!(?edit, "redo");
        Ok(Some(edit))
    }
}

/// Swap two disjoint ranges in the store without logging.
///
/// The later range is replaced first so the earlier range's offsets stay valid.
pub(crate) fn transpose(store: &mut GapStore, first: Range<usize>, second: Range<usize>) -> Result<()> {
    assert!(
        !intersects(&first, &second),
        "transpose ranges {first:?} and {second:?} overlap"
    );
    assert!(
        first.end <= store.len() && second.end <= store.len(),
        "transpose ranges {first:?} and {second:?} out of bounds (len {})",
        store.len()
    );
    let (first, second) = if first.start > second.start {
        (second, first)
    } else {
        (first, second)
    };

    let mut first_bytes = Vec::new();
    first_bytes
        .try_reserve_exact(first.len())
        .map_err(|err| TextError::out_of_memory(first.len(), err))?;
    let mut second_bytes = Vec::new();
    second_bytes
        .try_reserve_exact(second.len())
        .map_err(|err| TextError::out_of_memory(second.len(), err))?;
    store.reserve(first.len().max(second.len()))?;

    let (left, right) = store.range_slices(first.clone());
    first_bytes.extend_from_slice(left);
    first_bytes.extend_from_slice(right);
    let (left, right) = store.range_slices(second.clone());
    second_bytes.extend_from_slice(left);
    second_bytes.extend_from_slice(right);

    if !second.is_empty() {
        store.delete(second.start, second.len());
    }
    if !first.is_empty() {
        store.insert(second.start, &first_bytes)?;
        store.delete(first.start, first.len());
    }
    if !second.is_empty() {
        store.insert(first.start, &second_bytes)?;
    }
    Ok(())
}
