//! A small C-family lexer producing coarse tokens.
//!
//! It knows just enough of the grammar to keep braces inside strings and
//! comments from counting: line and block comments, string and character
//! literals with escapes, and escaped line breaks. Whitespace other than line
//! breaks produces no token.

use crate::token::{TokenKind, Tokenizer, Tokens};

#[derive(Debug, Clone, Copy, Default)]
pub struct CTokenizer;

impl Tokenizer for CTokenizer {
    fn tokenize(&self, text: &[u8], out: &mut Tokens) {
        out.clear();
        let mut i = 0;
        while i < text.len() {
            let start = i;
            let (kind, end) = match text[i] {
                b'\n' => (Some(TokenKind::LineBreak), i + 1),
                b'\r' if text.get(i + 1) == Some(&b'\n') => (Some(TokenKind::LineBreak), i + 2),
                b'\\' => match (text.get(i + 1), text.get(i + 2)) {
                    (Some(b'\n'), _) => (Some(TokenKind::EscapedLineBreak), i + 2),
                    (Some(b'\r'), Some(b'\n')) => (Some(TokenKind::EscapedLineBreak), i + 3),
                    _ => (Some(TokenKind::Other), i + 1),
                },
                b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c' => (None, skip_blanks(text, i)),
                b'/' if text.get(i + 1) == Some(&b'/') => {
                    (Some(TokenKind::Comment), line_comment_end(text, i))
                },
                b'/' if text.get(i + 1) == Some(&b'*') => {
                    (Some(TokenKind::Comment), block_comment_end(text, i))
                },
                quote @ (b'"' | b'\'') => (Some(TokenKind::Other), literal_end(text, i, quote)),
                b'#' => (Some(TokenKind::Hash), i + 1),
                b'{' => (Some(TokenKind::OpenBrace), i + 1),
                b'}' => (Some(TokenKind::CloseBrace), i + 1),
                b'(' => (Some(TokenKind::OpenParen), i + 1),
                b')' => (Some(TokenKind::CloseParen), i + 1),
                b',' => (Some(TokenKind::Comma), i + 1),
                b';' => (Some(TokenKind::Semicolon), i + 1),
                b':' if text.get(i + 1) == Some(&b':') => (Some(TokenKind::Other), i + 2),
                b':' => (Some(TokenKind::Colon), i + 1),
                b if is_word_byte(b) => (Some(TokenKind::Other), word_end(text, i)),
                _ => (Some(TokenKind::Other), i + 1),
            };
            if let Some(kind) = kind {
                out.push(kind, start..end);
            }
            i = end;
        }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn skip_blanks(text: &[u8], mut i: usize) -> usize {
    while i < text.len() && matches!(text[i], b' ' | b'\t' | b'\x0b' | b'\x0c') {
        i += 1;
    }
    // A lone `\r` is blank; `\r\n` is left for the line break arm.
    if i < text.len() && text[i] == b'\r' && text.get(i + 1) != Some(&b'\n') {
        i += 1;
    }
    i
}

fn word_end(text: &[u8], mut i: usize) -> usize {
    while i < text.len() && is_word_byte(text[i]) {
        i += 1;
    }
    i
}

/// Up to, not including, the line break.
fn line_comment_end(text: &[u8], i: usize) -> usize {
    text[i..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(text.len(), |pos| i + pos)
}

fn block_comment_end(text: &[u8], i: usize) -> usize {
    text[i + 2..]
        .windows(2)
        .position(|pair| pair == b"*/")
        .map_or(text.len(), |pos| i + 2 + pos + 2)
}

/// Literals stop at the closing quote or, unterminated, at the line break.
fn literal_end(text: &[u8], i: usize, quote: u8) -> usize {
    let mut j = i + 1;
    while j < text.len() {
        match text[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let mut tokens = Tokens::new();
        CTokenizer.tokenize(text.as_bytes(), &mut tokens);
        tokens.kinds().to_vec()
    }

    #[test]
    fn punctuation_and_words() {
        assert_eq!(
            kinds("f(a, b) { x: y; }"),
            vec![
                Other, OpenParen, Other, Comma, Other, CloseParen, OpenBrace, Other, Colon, Other,
                Semicolon, CloseBrace
            ]
        );
    }

    #[test]
    fn braces_in_literals_and_comments_do_not_count() {
        assert_eq!(kinds(r#"s = "{(" ;"#), vec![Other, Other, Other, Semicolon]);
        assert_eq!(kinds("'}' // {\n"), vec![Other, Comment, LineBreak]);
        assert_eq!(kinds("/* { \n } */x"), vec![Comment, Other]);
        assert_eq!(kinds(r#""a\"{""#), vec![Other]);
    }

    #[test]
    fn line_breaks_and_preprocessor() {
        assert_eq!(
            kinds("#define X \\\n  1\r\n"),
            vec![Hash, Other, Other, EscapedLineBreak, Other, LineBreak]
        );
    }

    #[test]
    fn scope_resolution_is_not_a_colon() {
        assert_eq!(kinds("std::vec"), vec![Other, Other, Other]);
    }

    #[test]
    fn ranges_cover_source_bytes() {
        let mut tokens = Tokens::new();
        CTokenizer.tokenize(b"ab  {\n", &mut tokens);
        assert_eq!(tokens.ranges(), &[0..2, 4..5, 5..6]);
    }

    #[test]
    fn unterminated_input_stops_at_end() {
        assert_eq!(kinds("\"abc"), vec![Other]);
        assert_eq!(kinds("/* open"), vec![Comment]);
        assert_eq!(kinds("x \\"), vec![Other, Other]);
    }
}
