//! Buffer storage with generational handles.
//!
//! Buffers live in slots. A [`BufferHandle`] names a slot and the generation
//! the slot had when the handle was issued; freeing a slot bumps its
//! generation, so stale handles stop resolving instead of reaching whatever
//! buffer reuses the slot. Handles are weak: holding one keeps nothing alive.
//! Lifetime is governed by explicit reference counts ([`BufferPool::acquire`]
//! and [`BufferPool::release`]).
//!
//! Opening a file that is already open, or creating a named buffer whose name
//! is taken, returns the existing buffer with its count bumped.

use crate::error::{PoolError, Result};
use gapedit_indent::{Tokenizer, Tokens};
use gapedit_text::{BufferOptions, TextBuffer, TextBufferKind};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::{debug, info, trace, warn};

const INDEX_BITS: u32 = 48;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;

/// Opaque reference to a pooled buffer: generation in the top 16 bits, slot
/// index plus one below. Zero is the null handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(u64);

impl BufferHandle {
    pub const NULL: Self = Self(0);

    fn new(generation: u16, index: usize) -> Self {
        Self(u64::from(generation) << INDEX_BITS | (index as u64 + 1) & INDEX_MASK)
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 & INDEX_MASK == 0
    }

    pub fn generation(self) -> u16 {
        (self.0 >> INDEX_BITS) as u16
    }

    /// Slot index, or `None` for the null handle.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0 & INDEX_MASK)
            .ok()
            .and_then(|index| index.checked_sub(1))
    }
}

impl fmt::Display for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

struct Entry {
    buffer: TextBuffer,
    ref_count: usize,
    absolute_path: Option<PathBuf>,
    tokens: Tokens,
    lexed: bool,
}

enum SlotState {
    Free { next_free: Option<usize> },
    Active(Box<Entry>),
}

struct Slot {
    generation: u16,
    state: SlotState,
}

pub struct BufferPool {
    slots: Vec<Slot>,
    first_free: Option<usize>,
    by_path: FxHashMap<PathBuf, BufferHandle>,
    by_name: FxHashMap<SmolStr, BufferHandle>,
    /// Live buffers in the order they were opened
    open: Vec<BufferHandle>,
    options: BufferOptions,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(BufferOptions::default())
    }
}

impl BufferPool {
    pub fn new(options: BufferOptions) -> Self {
        Self {
            slots: Vec::new(),
            first_free: None,
            by_path: FxHashMap::default(),
            by_name: FxHashMap::default(),
            open: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &BufferOptions {
        &self.options
    }

    /// Number of live buffers.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Handles of live buffers, oldest first.
    pub fn open_buffers(&self) -> &[BufferHandle] {
        &self.open
    }

    /// Open `path`, reusing the buffer if the file is already open.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<BufferHandle> {
        let path = path.as_ref();
        let absolute = std::fs::canonicalize(path).map_err(|source| {
            warn!(path = %path.display(), %source, "could not resolve path");
            PoolError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if let Some(&handle) = self.by_path.get(&absolute) {
            info!(path = %absolute.display(), %handle, "reusing file buffer");
            self.acquire(handle)?;
            return Ok(handle);
        }

        let buffer = TextBuffer::load(&absolute, &self.options)?;
        let handle = self.insert(buffer, Some(absolute.clone()));
        self.by_path.insert(absolute, handle);
        Ok(handle)
    }

    /// Create a buffer from `contents`. A non-empty `name` already in use
    /// returns that buffer instead and ignores `contents`.
    pub fn create_named(
        &mut self,
        contents: &[u8],
        name: &str,
        kind: TextBufferKind,
    ) -> Result<BufferHandle> {
        if !name.is_empty() {
            if let Some(&handle) = self.by_name.get(name) {
                info!(name, %handle, "reusing named buffer");
                self.acquire(handle)?;
                return Ok(handle);
            }
        }

        let buffer = TextBuffer::from_text(kind, contents, name, &self.options)?;
        let handle = self.insert(buffer, None);
        if !name.is_empty() {
            self.by_name.insert(SmolStr::new(name), handle);
        }
        Ok(handle)
    }

    fn insert(&mut self, buffer: TextBuffer, absolute_path: Option<PathBuf>) -> BufferHandle {
        let entry = Box::new(Entry {
            buffer,
            ref_count: 1,
            absolute_path,
            tokens: Tokens::new(),
            lexed: false,
        });

        let index = match self.first_free {
            Some(index) => {
                let slot = &mut self.slots[index];
                self.first_free = match slot.state {
                    SlotState::Free { next_free } => next_free,
                    SlotState::Active(_) => unreachable!("free list points at an active slot"),
                };
                slot.state = SlotState::Active(entry);
                index
            },
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    state: SlotState::Active(entry),
                });
                self.slots.len() - 1
            },
        };

        let handle = BufferHandle::new(self.slots[index].generation, index);
        self.open.push(handle);
        debug!(%handle, index, "allocated buffer");
        handle
    }

    fn entry(&self, handle: BufferHandle) -> Result<&Entry> {
        let index = self.check(handle)?;
        match &self.slots[index].state {
            SlotState::Active(entry) => Ok(entry),
            SlotState::Free { .. } => Err(PoolError::InvalidHandle(handle)),
        }
    }

    fn entry_mut(&mut self, handle: BufferHandle) -> Result<&mut Entry> {
        let index = self.check(handle)?;
        match &mut self.slots[index].state {
            SlotState::Active(entry) => Ok(entry),
            SlotState::Free { .. } => Err(PoolError::InvalidHandle(handle)),
        }
    }

    /// Resolve `handle` to a live slot index, logging why when it does not.
    fn check(&self, handle: BufferHandle) -> Result<usize> {
        let Some(index) = handle.index().filter(|&index| index < self.slots.len()) else {
            warn!(%handle, "buffer handle index out of range");
            return Err(PoolError::InvalidHandle(handle));
        };
        let slot = &self.slots[index];
        if slot.generation != handle.generation() {
            warn!(
                %handle,
                expected = slot.generation,
                found = handle.generation(),
                "buffer handle generation mismatch"
            );
            return Err(PoolError::InvalidHandle(handle));
        }
        if let SlotState::Free { .. } = slot.state {
            warn!(%handle, "buffer handle refers to an inactive slot");
            return Err(PoolError::InvalidHandle(handle));
        }
        Ok(index)
    }

    pub fn contains(&self, handle: BufferHandle) -> bool {
        handle
            .index()
            .and_then(|index| self.slots.get(index))
            .is_some_and(|slot| {
                slot.generation == handle.generation() && matches!(slot.state, SlotState::Active(_))
            })
    }

    pub fn buffer(&self, handle: BufferHandle) -> Result<&TextBuffer> {
        self.entry(handle).map(|entry| &entry.buffer)
    }

    pub fn buffer_mut(&mut self, handle: BufferHandle) -> Result<&mut TextBuffer> {
        self.entry_mut(handle).map(|entry| &mut entry.buffer)
    }

    /// The buffer together with its cached tokens from the last
    /// [`Self::refresh_tokens`].
    pub fn buffer_and_tokens(&self, handle: BufferHandle) -> Result<(&TextBuffer, &Tokens)> {
        self.entry(handle).map(|entry| (&entry.buffer, &entry.tokens))
    }

    /// Canonical path a file buffer was opened from.
    pub fn absolute_path(&self, handle: BufferHandle) -> Result<Option<&Path>> {
        self.entry(handle).map(|entry| entry.absolute_path.as_deref())
    }

    pub fn ref_count(&self, handle: BufferHandle) -> Result<usize> {
        self.entry(handle).map(|entry| entry.ref_count)
    }

    /// Take another reference. Returns the new count.
    pub fn acquire(&mut self, handle: BufferHandle) -> Result<usize> {
        let entry = self.entry_mut(handle)?;
        entry.ref_count += 1;
        trace!(%handle, refs = entry.ref_count, "acquire");
        Ok(entry.ref_count)
    }

    /// Drop a reference, freeing the buffer when none are left. Returns the
    /// remaining count.
    pub fn release(&mut self, handle: BufferHandle) -> Result<usize> {
        let entry = self.entry_mut(handle)?;
        entry.ref_count -= 1;
        let remaining = entry.ref_count;
        trace!(%handle, refs = remaining, "release");
        if remaining == 0 {
            self.free(handle);
        }
        Ok(remaining)
    }

    /// Free the buffer regardless of outstanding references. Returns how many
    /// references were dropped.
    pub fn close(&mut self, handle: BufferHandle) -> Result<usize> {
        let refs = self.entry(handle)?.ref_count;
        self.free(handle);
        Ok(refs)
    }

    /// `handle` must already be validated.
    fn free(&mut self, handle: BufferHandle) {
        let Some(index) = handle.index() else {
            return;
        };
        let slot = &mut self.slots[index];
        let previous = std::mem::replace(
            &mut slot.state,
            SlotState::Free {
                next_free: self.first_free,
            },
        );
        slot.generation = slot.generation.wrapping_add(1);
        self.first_free = Some(index);

        if let SlotState::Active(entry) = previous {
            if let Some(path) = &entry.absolute_path {
                self.by_path.remove(path);
            }
            let name = entry.buffer.name();
            if self.by_name.get(name) == Some(&handle) {
                self.by_name.remove(name);
            }
        }
        self.open.retain(|&open| open != handle);
        debug!(%handle, index, "freed buffer");
    }

    /// Re-lex the buffer if it changed since the last refresh. Returns whether
    /// it was re-lexed.
    pub fn refresh_tokens(&mut self, handle: BufferHandle, tokenizer: &dyn Tokenizer) -> Result<bool> {
        let entry = self.entry_mut(handle)?;
        if entry.lexed && entry.buffer.dirty_range().is_none() {
            return Ok(false);
        }

        let range = entry.buffer.full_range();
        let text = entry.buffer.contiguous_range(range);
        tokenizer.tokenize(text, &mut entry.tokens);
        entry.buffer.clear_dirty();
        entry.lexed = true;
        debug!(%handle, tokens = entry.tokens.len(), "re-lexed buffer");
        Ok(true)
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("slots", &self.slots.len())
            .field("open", &self.open)
            .field("first_free", &self.first_free)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapedit_indent::CTokenizer;

    fn scratch(pool: &mut BufferPool, name: &str) -> BufferHandle {
        pool.create_named(b"text", name, TextBufferKind::Scratch)
            .unwrap()
    }

    #[test]
    fn handle_packing() {
        let handle = BufferHandle::new(7, 41);
        assert_eq!(handle.generation(), 7);
        assert_eq!(handle.index(), Some(41));
        assert_eq!(handle.as_raw(), 7 << 48 | 42);
        assert!(BufferHandle::NULL.is_null());
        assert_eq!(BufferHandle::NULL.index(), None);
        assert_eq!(BufferHandle::from_raw(handle.as_raw()), handle);
    }

    #[test]
    fn null_and_garbage_handles_fail_closed() {
        let mut pool = BufferPool::default();
        scratch(&mut pool, "a");
        assert!(matches!(
            pool.buffer(BufferHandle::NULL),
            Err(PoolError::InvalidHandle(_))
        ));
        assert!(pool.buffer(BufferHandle::new(0, 99)).is_err());
        assert!(pool.buffer(BufferHandle::new(3, 0)).is_err());
    }

    #[test]
    fn freed_slot_is_reused_with_new_generation() {
        let mut pool = BufferPool::default();
        let first = scratch(&mut pool, "a");
        assert_eq!(pool.release(first).unwrap(), 0);
        assert!(!pool.contains(first));

        let second = scratch(&mut pool, "b");
        assert_eq!(second.index(), first.index());
        assert_eq!(second.generation(), first.generation() + 1);
        assert!(pool.buffer(first).is_err());
        assert_eq!(pool.buffer(second).unwrap().name(), "b");
    }

    #[test]
    fn generation_wraps() {
        let mut pool = BufferPool::default();
        scratch(&mut pool, "a");
        pool.slots[0].generation = u16::MAX;
        let handle = BufferHandle::new(u16::MAX, 0);
        assert_eq!(pool.release(handle).unwrap(), 0);
        assert_eq!(pool.slots[0].generation, 0);
        assert!(!pool.contains(handle));
    }

    #[test]
    fn reference_counting() {
        let mut pool = BufferPool::default();
        let handle = scratch(&mut pool, "");
        assert_eq!(pool.acquire(handle).unwrap(), 2);
        assert_eq!(pool.release(handle).unwrap(), 1);
        assert!(pool.contains(handle));
        assert_eq!(pool.release(handle).unwrap(), 0);
        assert!(pool.is_empty());
        assert!(pool.release(handle).is_err());
    }

    #[test]
    fn named_buffers_are_shared() {
        let mut pool = BufferPool::default();
        let a = scratch(&mut pool, "*scratch*");
        let b = pool
            .create_named(b"ignored", "*scratch*", TextBufferKind::Scratch)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.ref_count(a).unwrap(), 2);
        assert_eq!(pool.len(), 1);

        let anonymous = scratch(&mut pool, "");
        let other = scratch(&mut pool, "");
        assert_ne!(anonymous, other);
    }

    #[test]
    fn close_ignores_reference_count() {
        let mut pool = BufferPool::default();
        let handle = scratch(&mut pool, "x");
        pool.acquire(handle).unwrap();
        assert_eq!(pool.close(handle).unwrap(), 2);
        assert!(!pool.contains(handle));
        let fresh = scratch(&mut pool, "x");
        assert_ne!(fresh, handle);
    }

    #[test]
    fn open_list_keeps_order() {
        let mut pool = BufferPool::default();
        let a = scratch(&mut pool, "a");
        let b = scratch(&mut pool, "b");
        let c = scratch(&mut pool, "c");
        pool.release(b).unwrap();
        assert_eq!(pool.open_buffers(), &[a, c]);
    }

    #[test]
    fn tokens_refresh_only_when_dirty() {
        let mut pool = BufferPool::default();
        let handle = pool
            .create_named(b"f() {}", "main.c", TextBufferKind::CFile)
            .unwrap();
        assert!(pool.refresh_tokens(handle, &CTokenizer).unwrap());
        assert!(!pool.refresh_tokens(handle, &CTokenizer).unwrap());
        assert_eq!(pool.buffer_and_tokens(handle).unwrap().1.len(), 5);

        pool.buffer_mut(handle).unwrap().insert(0, b"x;").unwrap();
        assert!(pool.refresh_tokens(handle, &CTokenizer).unwrap());
        assert_eq!(pool.buffer_and_tokens(handle).unwrap().1.len(), 7);
    }
}
