//! Text editing core for gapedit.
//!
//! A [`TextBuffer`] keeps its bytes in a gap buffer ([`gap::GapStore`]) and
//! records every change in an [`EditHistory`] so edits can be undone and redone.
//! A [`TextCursor`] is a caret plus a marker; the cursor commands in
//! [`actions`] move it and edit the buffer through it. [`Command`] turns those
//! commands into data so they can be bound to keys or read from scripts.
//!
//! Buffers hold bytes that are expected, but not required, to be UTF-8. Commands
//! that count characters count UTF-8 scalar values.

pub mod actions;
pub mod buffer;
pub mod clipboard;
pub mod clock;
pub mod command;
pub mod cursor;
pub mod error;
pub mod gap;
pub mod history;
pub mod lines;
pub mod range;
pub mod utf8;

#[cfg(any(test, feature = "test-support"))]
pub mod test_helpers;

pub use actions::word::WordKind;
pub use buffer::{BufferOptions, LineCol, TextBuffer, TextBufferKind};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use clock::{ManualTicks, SystemTicks, TickSource};
pub use command::{parse_script, Command, ParseError, ScriptError};
pub use cursor::TextCursor;
pub use error::{Result, TextError};
pub use gap::GapStore;
pub use history::{Edit, EditHistory, HistoryOptions};
