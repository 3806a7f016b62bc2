//! Nesting depth tracking over a coarse token stream.
//!
//! Three stacks are kept as bitsets: braces, parens and "unfinished
//! statements" (a line that did not end in a terminator, so the next one is a
//! continuation). Bit `k` set means a scope was opened while the combined depth
//! was `k`; a stack's depth is one past its highest set bit. The combined scope
//! depth is the deepest of the three.

use crate::token::TokenKind;
use std::ops::Range;
use tracing::trace;

/// Deepest nesting a tracker can represent.
pub const MAX_NESTING_DEPTH: usize = u64::BITS as usize;

/// Depth of a bitset stack: one past the highest set bit, 0 when empty.
fn depth(bits: u64) -> usize {
    (u64::BITS - bits.leading_zeros()) as usize
}

/// Pop the highest set bit.
fn pop(bits: u64) -> u64 {
    match depth(bits) {
        0 => 0,
        top => bits & !(1 << (top - 1)),
    }
}

fn push(bits: u64, at: usize) -> u64 {
    assert!(
        at < MAX_NESTING_DEPTH,
        "nesting deeper than {MAX_NESTING_DEPTH} levels"
    );
    bits | 1 << at
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeTracker {
    braces: u64,
    parens: u64,
    unfinished: u64,
    /// The previous line was a preprocessor line ending in an escaped line break.
    preproc_continues: bool,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brace_depth(&self) -> usize {
        depth(self.braces)
    }

    pub fn paren_depth(&self) -> usize {
        depth(self.parens)
    }

    pub fn unfinished_depth(&self) -> usize {
        depth(self.unfinished)
    }

    /// Combined depth: the deepest open scope of any kind.
    pub fn scope_depth(&self) -> usize {
        self.brace_depth()
            .max(self.paren_depth())
            .max(self.unfinished_depth())
    }

    /// Whether the deepest open scope is an unfinished statement.
    fn in_unfinished_statement(&self) -> bool {
        let scope = self.scope_depth();
        scope > 0 && scope == self.unfinished_depth()
    }

    /// Feed the tokens overlapping `byte_range` through the tracker and return
    /// the indentation depth of the line they form.
    ///
    /// `kinds` and `ranges` are parallel and sorted by offset. Calls are meant
    /// to cover consecutive ranges of one buffer in increasing order; each call
    /// treats `byte_range` as a single line.
    ///
    /// # Panics
    ///
    /// If `kinds` and `ranges` differ in length, or nesting exceeds
    /// [`MAX_NESTING_DEPTH`].
    pub fn advance_over_range(
        &mut self,
        kinds: &[TokenKind],
        ranges: &[Range<usize>],
        byte_range: Range<usize>,
    ) -> usize {
        assert_eq!(kinds.len(), ranges.len(), "token kinds and ranges differ");

        let parens_at_start = self.paren_depth();
        let mut line_depth = self.scope_depth();
        let prev_preproc = self.preproc_continues;
        let mut is_preproc = prev_preproc;
        let mut is_first = true;
        let mut last = None;

        let first = ranges.partition_point(|range| range.end <= byte_range.start);
        for (&kind, range) in kinds[first..].iter().zip(&ranges[first..]) {
            if range.start >= byte_range.end {
                break;
            }
            if is_first && kind == TokenKind::Hash {
                is_preproc = true;
            }
            if !kind.is_trivia() {
                last = Some(kind);
            }

            let opened = match kind {
                TokenKind::OpenBrace => {
                    let braces = self.brace_depth();
                    let parens = self.paren_depth();
                    if braces + 1 == parens && parens > parens_at_start {
                        // A brace opened on the same line as a paren takes over
                        // the paren's level, so `f(a, {` indents like `f(a) {`.
                        self.parens = pop(self.parens);
                    } else if self.in_unfinished_statement() {
                        self.unfinished = pop(self.unfinished);
                    }
                    self.braces = push(self.braces, self.scope_depth());
                    true
                },
                TokenKind::OpenParen => {
                    self.parens = push(self.parens, self.scope_depth());
                    true
                },
                TokenKind::CloseBrace => {
                    self.braces = pop(self.braces);
                    false
                },
                TokenKind::CloseParen => {
                    if self.in_unfinished_statement() {
                        self.unfinished = pop(self.unfinished);
                    }
                    self.parens = pop(self.parens);
                    false
                },
                _ => {
                    is_first = false;
                    continue;
                },
            };

            if is_first {
                // A line opening with a closer sits at the depth after it; one
                // opening with an opener sits at the depth before it.
                let scope = self.scope_depth();
                line_depth = if opened { scope.saturating_sub(1) } else { scope };
            }
            is_first = false;
        }

        if is_preproc && prev_preproc {
            line_depth += 1;
        }

        self.preproc_continues = false;
        if let Some(last) = last {
            if is_preproc {
                self.preproc_continues = last == TokenKind::EscapedLineBreak;
            } else if last.ends_statement() {
                if self.in_unfinished_statement() {
                    self.unfinished = pop(self.unfinished);
                }
            } else {
                let scope = self.scope_depth();
                if scope > 0 && scope == self.brace_depth() {
                    self.unfinished = push(self.unfinished, scope);
                }
            }
        }

        trace!(
            range = ?byte_range,
            depth = line_depth,
            braces = self.brace_depth(),
            parens = self.paren_depth(),
            unfinished = self.unfinished_depth(),
            "indent line"
        );
        line_depth
    }
}
