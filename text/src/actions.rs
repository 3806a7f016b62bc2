//! Cursor commands.
//!
//! Every command is a method on [`crate::TextCursor`] taking the buffer it
//! operates on. Commands never hold state between calls; the caret and marker
//! pair is the only state.
//!
//! # Return values
//!
//! Movement commands return `true` if the caret moved. Editing commands return
//! `Ok(true)` if the buffer changed, `Ok(false)` for no-ops (undo with empty
//! history, deleting at offset 0, moving the first line up) and
//! `Err(TextError::OutOfMemory)` if the edit could not be made, in which case
//! neither the buffer nor the cursor changed.
//!
//! # Groups
//!
//! - [`movement`] - by scalar value, line and paragraph
//! - [`word`] - snake_case and PascalCase word boundaries
//! - [`edit`] - insertion and deletion
//! - [`line`] - duplicating and reordering lines
//! - [`clipboard`] - copy, cut and paste
//! - [`history`] - undo and redo with cursor repositioning

pub mod clipboard;
pub mod edit;
pub mod history;
pub mod line;
pub mod movement;
pub mod word;
