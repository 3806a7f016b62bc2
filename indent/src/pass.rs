//! Per-line indentation for a window of visible lines.

use crate::{scope::ScopeTracker, token::Tokens};
use std::ops::Range;
use tracing::debug;

/// Walks lines in order, reporting each line's nesting depth.
///
/// The first line asked about may be far into the buffer; everything before it
/// is pushed through the tracker in one step so state is right on arrival.
#[derive(Debug)]
pub struct IndentPass<'a> {
    tokens: &'a Tokens,
    tracker: ScopeTracker,
    pushed: usize,
}

impl<'a> IndentPass<'a> {
    pub fn new(tokens: &'a Tokens) -> Self {
        Self {
            tokens,
            tracker: ScopeTracker::new(),
            pushed: 0,
        }
    }

    pub fn tracker(&self) -> &ScopeTracker {
        &self.tracker
    }

    /// Depth of the line spanning `line`, excluding its line break.
    ///
    /// Lines must be requested in increasing order.
    pub fn line_depth(&mut self, line: Range<usize>) -> usize {
        assert!(
            line.start >= self.pushed,
            "line {line:?} requested after offset {} was already consumed",
            self.pushed
        );
        if line.start > self.pushed {
            debug!(skipped = ?(self.pushed..line.start), "catching up indentation");
            self.push(self.pushed..line.start);
        }
        // The line break belongs to the line it ends.
        self.push(line.start..line.end + 1)
    }

    fn push(&mut self, range: Range<usize>) -> usize {
        self.pushed = range.end;
        self.tracker
            .advance_over_range(self.tokens.kinds(), self.tokens.ranges(), range)
    }
}

/// Leading tabs of `line` covered by `depth` levels of virtual indentation.
///
/// Renderers skip these and draw `depth` levels instead, so hand-indented
/// code does not end up indented twice.
pub fn consumed_tabs(line: &[u8], depth: usize) -> usize {
    line.iter().take(depth).take_while(|&&b| b == b'\t').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::CTokenizer, token::Tokenizer};

    fn line_ranges(text: &str) -> Vec<Range<usize>> {
        let mut start = 0;
        text.split('\n')
            .map(|line| {
                let range = start..start + line.len();
                start = range.end + 1;
                range
            })
            .collect()
    }

    #[test]
    fn consumed_tabs_stops_at_depth_and_non_tabs() {
        assert_eq!(consumed_tabs(b"\t\t\tx", 2), 2);
        assert_eq!(consumed_tabs(b"\t x", 3), 1);
        assert_eq!(consumed_tabs(b"    x", 1), 0);
        assert_eq!(consumed_tabs(b"", 4), 0);
    }

    #[test]
    fn starting_mid_buffer_matches_a_full_walk() {
        let text = "int f() {\n\tif (x) {\n\t\ty();\n\t}\n\treturn 0;\n}";
        let mut tokens = Tokens::new();
        CTokenizer.tokenize(text.as_bytes(), &mut tokens);
        let lines = line_ranges(text);

        let mut full = IndentPass::new(&tokens);
        let all: Vec<_> = lines.iter().map(|l| full.line_depth(l.clone())).collect();
        assert_eq!(all, vec![0, 1, 2, 1, 1, 0]);

        let mut window = IndentPass::new(&tokens);
        let tail: Vec<_> = lines[2..].iter().map(|l| window.line_depth(l.clone())).collect();
        assert_eq!(tail, all[2..]);
    }

    #[test]
    #[should_panic(expected = "already consumed")]
    fn lines_must_go_forward() {
        let tokens = Tokens::new();
        let mut pass = IndentPass::new(&tokens);
        pass.line_depth(5..8);
        pass.line_depth(0..4);
    }
}
