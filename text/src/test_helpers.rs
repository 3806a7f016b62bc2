//! Test helpers to reduce boilerplate in tests.
//!
//! # Cursor notation
//!
//! - `|` - caret with no selection
//! - `<||text|>` - selection with the caret at its start
//! - `<|text||>` - selection with the caret at its end
//!
//! Outside a selection `||` is a literal `|`. Text without any marker puts the
//! caret at offset 0.

use crate::{
    buffer::{BufferOptions, TextBuffer, TextBufferKind},
    clipboard::MemoryClipboard,
    clock::ManualTicks,
    cursor::TextCursor,
    history::HistoryOptions,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Selection missing cursor marker (use <||text|> or <|text||>)")]
    SelectionMissingCursor,

    #[error("Cursor must be at selection boundary, not in middle")]
    CursorNotAtBoundary,

    #[error("Unclosed selection (missing |>)")]
    UnclosedSelection,

    #[error("Unexpected selection end |> without matching <|")]
    UnexpectedSelectionEnd,

    #[error("Selection has cursor at both start and end")]
    CursorAtBothEnds,

    #[error("Only one cursor or selection is supported")]
    MultipleCursors,
}

/// Text with its markers removed, plus the cursor they described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked {
    pub text: String,
    pub cursor: TextCursor,
}

pub fn parse(input: &str) -> Result<Marked, ParseError> {
    let mut text = String::new();
    let mut cursor = None;
    let mut selection: Option<(usize, bool)> = None;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '|' => match chars.peek() {
                Some('|') => {
                    chars.next();
                    if chars.peek() == Some(&'>') {
                        chars.next();
                        let (start, caret_at_start) =
                            selection.take().ok_or(ParseError::UnexpectedSelectionEnd)?;
                        if caret_at_start {
                            return Err(ParseError::CursorAtBothEnds);
                        }
                        place(&mut cursor, TextCursor::with_marker(text.len(), start))?;
                    } else {
                        if selection.is_some() {
                            return Err(ParseError::CursorNotAtBoundary);
                        }
                        text.push('|');
                    }
                },
                Some('>') => {
                    chars.next();
                    let (start, caret_at_start) =
                        selection.take().ok_or(ParseError::UnexpectedSelectionEnd)?;
                    if !caret_at_start {
                        return Err(ParseError::SelectionMissingCursor);
                    }
                    place(&mut cursor, TextCursor::with_marker(start, text.len()))?;
                },
                _ => {
                    if selection.is_some() {
                        return Err(ParseError::CursorNotAtBoundary);
                    }
                    place(&mut cursor, TextCursor::new(text.len()))?;
                },
            },
            '<' if chars.peek() == Some(&'|') => {
                chars.next();
                if selection.is_some() {
                    return Err(ParseError::UnclosedSelection);
                }
                let caret_at_start = chars.peek() == Some(&'|');
                if caret_at_start {
                    chars.next();
                }
                selection = Some((text.len(), caret_at_start));
            },
            _ => text.push(ch),
        }
    }

    if selection.is_some() {
        return Err(ParseError::UnclosedSelection);
    }
    Ok(Marked {
        text,
        cursor: cursor.unwrap_or_default(),
    })
}

fn place(cursor: &mut Option<TextCursor>, found: TextCursor) -> Result<(), ParseError> {
    match cursor.replace(found) {
        Some(_) => Err(ParseError::MultipleCursors),
        None => Ok(()),
    }
}

/// Render `text` with `cursor` in cursor notation.
pub fn format(text: &str, cursor: TextCursor) -> String {
    let escaped = |s: &str| s.replace('|', "||");
    let range = cursor.selection();
    let (before, selected, after) = (&text[..range.start], &text[range.clone()], &text[range.end..]);
    if !cursor.has_selection() {
        format!("{}|{}", escaped(before), escaped(after))
    } else if cursor.offset < cursor.marker_offset {
        format!("{}<||{selected}|>{}", escaped(before), escaped(after))
    } else {
        format!("{}<|{selected}||>{}", escaped(before), escaped(after))
    }
}

/// A buffer, a cursor, a clipboard and a clock that only moves when told to.
pub struct TestEditor {
    pub buffer: TextBuffer,
    pub cursor: TextCursor,
    pub clipboard: MemoryClipboard,
    pub clock: Arc<ManualTicks>,
}

impl TestEditor {
    /// Build from cursor notation.
    ///
    /// # Panics
    ///
    /// On malformed notation.
    pub fn new(notation: &str) -> Self {
        Self::with_options(notation, HistoryOptions::default())
    }

    pub fn with_options(notation: &str, history: HistoryOptions) -> Self {
        let marked = parse(notation).unwrap_or_else(|err| panic!("bad notation {notation:?}: {err}"));
        let clock = Arc::new(ManualTicks::new(1_000));
        let options = BufferOptions {
            history,
            ..BufferOptions::default()
        };
        let buffer = TextBuffer::from_text(TextBufferKind::Scratch, marked.text.as_bytes(), "test", &options)
            .unwrap_or_else(|err| panic!("failed to create test buffer: {err}"))
            .with_clock(clock.clone());
        Self {
            buffer,
            cursor: marked.cursor,
            clipboard: MemoryClipboard::default(),
            clock,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.write_to_vec()).into_owned()
    }

    pub fn notation(&self) -> String {
        format(&self.text(), self.cursor)
    }

    #[track_caller]
    pub fn assert_notation(&self, expected: &str) {
        assert_eq!(self.notation(), expected);
    }

    /// Move the clock past the coalescing window.
    pub fn pause(&self) {
        self.clock.advance(10_000);
    }
}
