//! Coarse token categories and the tokenizer collaborator.
//!
//! Indentation only cares about a handful of token shapes. Whatever lexer a
//! front end uses is expected to fold its own kinds down to [`TokenKind`].

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    Comma,
    Colon,
    Semicolon,
    /// `#` starting a preprocessor directive
    Hash,
    LineBreak,
    /// A backslash immediately followed by a line break
    EscapedLineBreak,
    Comment,
    /// Anything else: identifiers, literals, operators.
    Other,
}

impl TokenKind {
    /// Tokens that never count as the last token of a line.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::LineBreak)
    }

    /// Tokens after which a line is considered finished.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::CloseBrace
                | TokenKind::OpenBrace
                | TokenKind::OpenParen
                | TokenKind::Comma
                | TokenKind::Colon
                | TokenKind::Semicolon
        )
    }
}

/// Token kinds and their byte ranges, as parallel arrays sorted by offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    kinds: Vec<TokenKind>,
    ranges: Vec<Range<usize>>,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: TokenKind, range: Range<usize>) {
        debug_assert!(
            self.ranges.last().map_or(true, |last| last.end <= range.start),
            "tokens must be pushed in order"
        );
        self.kinds.push(kind);
        self.ranges.push(range);
    }

    pub fn clear(&mut self) {
        self.kinds.clear();
        self.ranges.clear();
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kinds(&self) -> &[TokenKind] {
        &self.kinds
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenKind, Range<usize>)> + '_ {
        self.kinds.iter().copied().zip(self.ranges.iter().cloned())
    }
}

/// Splits a whole buffer into coarse tokens.
pub trait Tokenizer {
    /// Replace the contents of `out` with the tokens of `text`.
    fn tokenize(&self, text: &[u8], out: &mut Tokens);
}
