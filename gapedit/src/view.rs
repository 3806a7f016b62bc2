//! A cursor attached to a pooled buffer.
//!
//! Several views may show the same buffer; each holds one reference on it and
//! has its own cursor. Edits made through one view do not move the cursors of
//! the others, so every view clamps its cursor before using it.

use crate::{
    error::Result,
    pool::{BufferHandle, BufferPool},
};
use gapedit_indent::{consumed_tabs, IndentPass, Tokenizer};
use gapedit_text::{Clipboard, Command, TextCursor};
use tracing::debug;

/// Indentation computed for one visible line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineIndent {
    /// Nesting depth to draw.
    pub depth: usize,
    /// Leading tabs already covered by `depth`.
    pub consumed_tabs: usize,
}

#[derive(Debug, Default)]
pub struct TextView {
    handle: BufferHandle,
    cursor: TextCursor,
}

impl TextView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    pub fn cursor(&self) -> TextCursor {
        self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut TextCursor {
        &mut self.cursor
    }

    /// Show `handle`, taking a reference on it and dropping the one on the
    /// previous buffer. The cursor goes back to the origin.
    pub fn attach(&mut self, pool: &mut BufferPool, handle: BufferHandle) -> Result<()> {
        pool.acquire(handle)?;
        if !self.handle.is_null() {
            pool.release(self.handle)?;
        }
        debug!(from = %self.handle, to = %handle, "attach view");
        self.handle = handle;
        self.cursor.reset();
        Ok(())
    }

    /// Drop the reference on the current buffer, if any.
    pub fn detach(&mut self, pool: &mut BufferPool) -> Result<()> {
        if self.handle.is_null() {
            return Ok(());
        }
        let handle = std::mem::take(&mut self.handle);
        self.cursor.reset();
        pool.release(handle)?;
        Ok(())
    }

    /// Run `command` against the attached buffer.
    pub fn execute(
        &mut self,
        pool: &mut BufferPool,
        command: &Command,
        clipboard: &mut dyn Clipboard,
        tab_width: usize,
    ) -> Result<bool> {
        let buffer = pool.buffer_mut(self.handle)?;
        self.cursor.clamp(buffer.len());
        Ok(self.cursor.execute(command, buffer, clipboard, tab_width)?)
    }

    /// Indentation of `count` lines starting at zero-based line `first`.
    ///
    /// Tokens are refreshed through `tokenizer` first if the buffer changed.
    pub fn line_indents(
        &self,
        pool: &mut BufferPool,
        tokenizer: &dyn Tokenizer,
        first: usize,
        count: usize,
    ) -> Result<Vec<LineIndent>> {
        pool.refresh_tokens(self.handle, tokenizer)?;
        let (buffer, tokens) = pool.buffer_and_tokens(self.handle)?;
        let mut pass = IndentPass::new(tokens);
        let indents = buffer
            .lines()
            .skip(first)
            .take(count)
            .map(|line| {
                let depth = pass.line_depth(line.range());
                let leading: Vec<u8> = line.bytes().take(depth).collect();
                LineIndent {
                    depth,
                    consumed_tabs: consumed_tabs(&leading, depth),
                }
            })
            .collect();
        Ok(indents)
    }
}
