//! Cursor commands as data.
//!
//! A [`Command`] names one cursor command and its parameters so that key
//! bindings, scripts and tests can drive a cursor the same way. Scripts use one
//! command per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! right 3
//! insert "hello\n"
//! set 2:5
//! undo
//! ```

use crate::{
    buffer::{LineCol, TextBuffer},
    clipboard::Clipboard,
    cursor::TextCursor,
    error::Result,
};
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Left(usize),
    Right(usize),
    Up(usize),
    Down(usize),
    LeftSnakeWord(usize),
    RightSnakeWord(usize),
    LeftPascalWord(usize),
    RightPascalWord(usize),
    StartOfLine,
    EndOfLine,
    UpParagraph(usize),
    DownParagraph(usize),
    PlaceMarker,
    Set(LineCol),
    SetMarker(LineCol),
    /// Insert a scalar value repeated `amount` times
    InsertChar { ch: char, amount: usize },
    InsertStr(SmolStr),
    DeleteBackward(usize),
    DeleteBackwardSnakeWord(usize),
    DeleteBackwardPascalWord(usize),
    DeleteToMarker,
    DeleteLine,
    Copy,
    Cut,
    Paste(usize),
    DuplicateLine(usize),
    MoveLineUp(usize),
    MoveLineDown(usize),
    Undo,
    Redo,
}

/// Error parsing one script line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} requires {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("{command}: invalid argument {argument:?}")]
    InvalidArgument {
        command: &'static str,
        argument: String,
    },

    #[error("{command} takes no further arguments")]
    UnexpectedArgument { command: &'static str },

    #[error("Unterminated string")]
    UnterminatedString,

    #[error("Unknown escape \\{0}")]
    UnknownEscape(char),
}

/// Error parsing a whole script, with the 1-based line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: ParseError,
}

impl Command {
    /// Script name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Left(_) => "left",
            Command::Right(_) => "right",
            Command::Up(_) => "up",
            Command::Down(_) => "down",
            Command::LeftSnakeWord(_) => "left_snake_word",
            Command::RightSnakeWord(_) => "right_snake_word",
            Command::LeftPascalWord(_) => "left_pascal_word",
            Command::RightPascalWord(_) => "right_pascal_word",
            Command::StartOfLine => "start_of_line",
            Command::EndOfLine => "end_of_line",
            Command::UpParagraph(_) => "up_paragraph",
            Command::DownParagraph(_) => "down_paragraph",
            Command::PlaceMarker => "place_marker",
            Command::Set(_) => "set",
            Command::SetMarker(_) => "set_marker",
            Command::InsertChar { .. } => "insert_char",
            Command::InsertStr(_) => "insert",
            Command::DeleteBackward(_) => "delete_backward",
            Command::DeleteBackwardSnakeWord(_) => "delete_backward_snake_word",
            Command::DeleteBackwardPascalWord(_) => "delete_backward_pascal_word",
            Command::DeleteToMarker => "delete_to_marker",
            Command::DeleteLine => "delete_line",
            Command::Copy => "copy",
            Command::Cut => "cut",
            Command::Paste(_) => "paste",
            Command::DuplicateLine(_) => "duplicate_line",
            Command::MoveLineUp(_) => "move_line_up",
            Command::MoveLineDown(_) => "move_line_down",
            Command::Undo => "undo",
            Command::Redo => "redo",
        }
    }

    /// Parse one script line.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// Command::parse("right 3") // => Ok(Command::Right(3))
    /// Command::parse("set 2:5") // => Ok(Command::Set(LineCol { line: 2, col: 5 }))
    /// Command::parse("insert \"a\\n\"") // => Ok(Command::InsertStr("a\n".into()))
    /// ```
    pub fn parse(input: &str) -> std::result::Result<Command, ParseError> {
        let input = input.trim();
        let (name, rest) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (input, ""),
        };

        let command = match name {
            "" => return Err(ParseError::EmptyCommand),
            "left" => Command::Left(amount("left", rest)?),
            "right" => Command::Right(amount("right", rest)?),
            "up" => Command::Up(amount("up", rest)?),
            "down" => Command::Down(amount("down", rest)?),
            "left_snake_word" => Command::LeftSnakeWord(amount("left_snake_word", rest)?),
            "right_snake_word" => Command::RightSnakeWord(amount("right_snake_word", rest)?),
            "left_pascal_word" => Command::LeftPascalWord(amount("left_pascal_word", rest)?),
            "right_pascal_word" => Command::RightPascalWord(amount("right_pascal_word", rest)?),
            "start_of_line" => no_args(Command::StartOfLine, rest)?,
            "end_of_line" => no_args(Command::EndOfLine, rest)?,
            "up_paragraph" => Command::UpParagraph(amount("up_paragraph", rest)?),
            "down_paragraph" => Command::DownParagraph(amount("down_paragraph", rest)?),
            "place_marker" => no_args(Command::PlaceMarker, rest)?,
            "set" => Command::Set(line_col("set", rest)?),
            "set_marker" => Command::SetMarker(line_col("set_marker", rest)?),
            "insert_char" => insert_char(rest)?,
            "insert" => Command::InsertStr(quoted("insert", rest)?),
            "delete_backward" => Command::DeleteBackward(amount("delete_backward", rest)?),
            "delete_backward_snake_word" => {
                Command::DeleteBackwardSnakeWord(amount("delete_backward_snake_word", rest)?)
            },
            "delete_backward_pascal_word" => {
                Command::DeleteBackwardPascalWord(amount("delete_backward_pascal_word", rest)?)
            },
            "delete_to_marker" => no_args(Command::DeleteToMarker, rest)?,
            "delete_line" => no_args(Command::DeleteLine, rest)?,
            "copy" => no_args(Command::Copy, rest)?,
            "cut" => no_args(Command::Cut, rest)?,
            "paste" => Command::Paste(amount("paste", rest)?),
            "duplicate_line" => Command::DuplicateLine(amount("duplicate_line", rest)?),
            "move_line_up" => Command::MoveLineUp(amount("move_line_up", rest)?),
            "move_line_down" => Command::MoveLineDown(amount("move_line_down", rest)?),
            "undo" => no_args(Command::Undo, rest)?,
            "redo" => no_args(Command::Redo, rest)?,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

/// Parse a script, skipping blank lines and `#` comments.
pub fn parse_script(script: &str) -> std::result::Result<Vec<Command>, ScriptError> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            Command::parse(line).map_err(|source| ScriptError {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Optional repeat count, defaulting to 1.
fn amount(command: &'static str, rest: &str) -> std::result::Result<usize, ParseError> {
    if rest.is_empty() {
        return Ok(1);
    }
    rest.parse().map_err(|_| ParseError::InvalidArgument {
        command,
        argument: rest.to_string(),
    })
}

fn no_args(command: Command, rest: &str) -> std::result::Result<Command, ParseError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::UnexpectedArgument {
            command: command.name(),
        })
    }
}

/// `line:col`, both 1-based.
fn line_col(command: &'static str, rest: &str) -> std::result::Result<LineCol, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            expected: "line:col",
        });
    }
    let invalid = || ParseError::InvalidArgument {
        command,
        argument: rest.to_string(),
    };
    let (line, col) = rest.split_once(':').ok_or_else(invalid)?;
    Ok(LineCol {
        line: line.parse().map_err(|_| invalid())?,
        col: col.parse().map_err(|_| invalid())?,
    })
}

/// `insert_char <char> [amount]`. The char may be quoted to insert a space.
fn insert_char(rest: &str) -> std::result::Result<Command, ParseError> {
    const NAME: &str = "insert_char";
    if rest.is_empty() {
        return Err(ParseError::MissingArgument {
            command: NAME,
            expected: "a character",
        });
    }

    let (text, count) = if rest.starts_with('"') {
        let close = rest[1..]
            .rfind('"')
            .map(|pos| pos + 1)
            .ok_or(ParseError::UnterminatedString)?;
        (unescape(&rest[1..close])?, rest[close + 1..].trim())
    } else {
        match rest.split_once(char::is_whitespace) {
            Some((ch, count)) => (ch.to_string(), count.trim()),
            None => (rest.to_string(), ""),
        }
    };

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(Command::InsertChar {
            ch,
            amount: amount(NAME, count)?,
        }),
        _ => Err(ParseError::InvalidArgument {
            command: NAME,
            argument: text,
        }),
    }
}

/// A double-quoted string with `\n`, `\t`, `\\` and `\"` escapes.
fn quoted(command: &'static str, rest: &str) -> std::result::Result<SmolStr, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            expected: "a quoted string",
        });
    }
    let inner = rest
        .strip_prefix('"')
        .ok_or_else(|| ParseError::InvalidArgument {
            command,
            argument: rest.to_string(),
        })?
        .strip_suffix('"')
        .ok_or(ParseError::UnterminatedString)?;
    Ok(SmolStr::new(unescape(inner)?))
}

fn unescape(input: &str) -> std::result::Result<String, ParseError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => return Err(ParseError::UnknownEscape(other)),
            None => return Err(ParseError::UnterminatedString),
        }
    }
    Ok(out)
}

impl TextCursor {
    /// Run `command` against `buffer`.
    ///
    /// Returns whether anything happened, like the individual commands do.
    pub fn execute(
        &mut self,
        command: &Command,
        buffer: &mut TextBuffer,
        clipboard: &mut dyn Clipboard,
        tab_width: usize,
    ) -> Result<bool> {
        debug!(command = command.name(), "execute");
        let changed = match command {
            Command::Left(n) => self.move_left(buffer, *n),
            Command::Right(n) => self.move_right(buffer, *n),
            Command::Up(n) => self.move_up(buffer, *n),
            Command::Down(n) => self.move_down(buffer, *n),
            Command::LeftSnakeWord(n) => self.move_left_snake_word(buffer, *n),
            Command::RightSnakeWord(n) => self.move_right_snake_word(buffer, *n),
            Command::LeftPascalWord(n) => self.move_left_pascal_word(buffer, *n),
            Command::RightPascalWord(n) => self.move_right_pascal_word(buffer, *n),
            Command::StartOfLine => self.start_of_line(buffer),
            Command::EndOfLine => self.end_of_line(buffer),
            Command::UpParagraph(n) => self.up_paragraph(buffer, *n),
            Command::DownParagraph(n) => self.down_paragraph(buffer, *n),
            Command::PlaceMarker => {
                let changed = self.has_selection();
                self.place_marker();
                changed
            },
            Command::Set(pos) => self.set(buffer, *pos, tab_width),
            Command::SetMarker(pos) => {
                let before = self.marker_offset;
                self.set_marker(buffer, *pos, tab_width);
                before != self.marker_offset
            },
            Command::InsertChar { ch, amount } => self.insert(buffer, *ch, *amount)?,
            Command::InsertStr(text) => self.insert_string(buffer, text.as_bytes())?,
            Command::DeleteBackward(n) => self.delete_backward(buffer, *n)?,
            Command::DeleteBackwardSnakeWord(n) => self.delete_backward_snake_word(buffer, *n)?,
            Command::DeleteBackwardPascalWord(n) => self.delete_backward_pascal_word(buffer, *n)?,
            Command::DeleteToMarker => self.delete_to_marker(buffer)?,
            Command::DeleteLine => self.delete_line(buffer)?,
            Command::Copy => {
                self.copy(buffer, clipboard);
                false
            },
            Command::Cut => self.cut(buffer, clipboard)?,
            Command::Paste(n) => self.paste(buffer, clipboard, *n)?,
            Command::DuplicateLine(n) => self.duplicate_line(buffer, *n)?,
            Command::MoveLineUp(n) => self.move_line_up(buffer, *n)?,
            Command::MoveLineDown(n) => self.move_line_down(buffer, *n)?,
            Command::Undo => self.undo(buffer)?,
            Command::Redo => self.redo(buffer)?,
        };
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TestEditor;

    #[test]
    fn parses_amounts_with_default() {
        assert_eq!(Command::parse("right 3"), Ok(Command::Right(3)));
        assert_eq!(Command::parse("  up  "), Ok(Command::Up(1)));
        assert_eq!(Command::parse("paste 2"), Ok(Command::Paste(2)));
    }

    #[test]
    fn parses_line_col() {
        assert_eq!(Command::parse("set 2:5"), Ok(Command::Set(LineCol::new(2, 5))));
        assert!(matches!(
            Command::parse("set_marker 2"),
            Err(ParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Command::parse("set"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn parses_strings_and_chars() {
        assert_eq!(
            Command::parse(r#"insert "say \"hi\"\n""#),
            Ok(Command::InsertStr("say \"hi\"\n".into()))
        );
        assert_eq!(
            Command::parse("insert_char x 3"),
            Ok(Command::InsertChar { ch: 'x', amount: 3 })
        );
        assert_eq!(
            Command::parse(r#"insert_char " ""#),
            Ok(Command::InsertChar { ch: ' ', amount: 1 })
        );
        assert_eq!(Command::parse(r#"insert "abc"#), Err(ParseError::UnterminatedString));
        assert_eq!(Command::parse(r#"insert "\q""#), Err(ParseError::UnknownEscape('q')));
    }

    #[test]
    fn rejects_unknown_and_extra_arguments() {
        assert_eq!(Command::parse(""), Err(ParseError::EmptyCommand));
        assert_eq!(
            Command::parse("jump"),
            Err(ParseError::UnknownCommand("jump".into()))
        );
        assert_eq!(
            Command::parse("undo 2"),
            Err(ParseError::UnexpectedArgument { command: "undo" })
        );
        assert!(matches!(
            Command::parse("left x"),
            Err(ParseError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn script_reports_line_numbers() {
        let script = "# setup\nright 2\n\ninsert \"x\"\nbogus\n";
        let err = parse_script(script).unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(err.source, ParseError::UnknownCommand("bogus".into()));

        let commands = parse_script("right 2\n# note\nundo").unwrap();
        assert_eq!(commands, vec![Command::Right(2), Command::Undo]);
    }

    #[test]
    fn execute_script_against_cursor() {
        let mut e = TestEditor::new("|abc\ndef");
        let script = "down\nend_of_line\ninsert \"!\"\nset 1:2\nplace_marker\ninsert_char X\nundo";
        for command in parse_script(script).unwrap() {
            e.cursor
                .execute(&command, &mut e.buffer, &mut e.clipboard, 4)
                .unwrap();
        }
        e.assert_notation("a|bc\ndef!");
    }

    #[test]
    fn command_names_parse_back() {
        let commands = [
            Command::Left(1),
            Command::StartOfLine,
            Command::DeleteBackwardPascalWord(1),
            Command::MoveLineDown(1),
            Command::Redo,
        ];
        for command in commands {
            assert_eq!(Command::parse(command.name()), Ok(command));
        }
    }
}
