//! Line scanning over a [`GapStore`].

use crate::gap::GapStore;
use std::ops::Range;

/// Width of the blocks [`count_newlines`] folds at a time.
const LANES: usize = 32;

/// Count `'\n'` bytes in `bytes`.
pub fn count_newlines(bytes: &[u8]) -> usize {
    let chunks = bytes.chunks_exact(LANES);
    let tail = chunks.remainder();
    let mut count = 0;
    for chunk in chunks {
        let mut lanes = [0u8; LANES];
        for (lane, &byte) in lanes.iter_mut().zip(chunk) {
            *lane = u8::from(byte == b'\n');
        }
        count += lanes.iter().map(|&lane| usize::from(lane)).sum::<usize>();
    }
    count + tail.iter().filter(|&&byte| byte == b'\n').count()
}

/// One line of the store, without its terminating `'\n'`.
///
/// A line may straddle the gap, so its bytes come as two slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'a> {
    pub start: usize,
    pub left: &'a [u8],
    pub right: &'a [u8],
}

impl<'a> LineSpan<'a> {
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len()
    }

    pub fn bytes(&self) -> impl Iterator<Item = u8> + 'a {
        self.left.iter().chain(self.right).copied()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes().collect()
    }
}

/// Lazy iterator over the lines of a store.
///
/// Cloning it restarts the scan from the clone point. An empty store has no
/// lines and a trailing `'\n'` does not produce an extra empty line.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    store: &'a GapStore,
    offset: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.store.len();
        if self.offset >= len {
            return None;
        }

        let start = self.offset;
        let (left, right) = self.store.range_slices(start..len);
        let end = match left.iter().position(|&b| b == b'\n') {
            Some(pos) => start + pos,
            None => match right.iter().position(|&b| b == b'\n') {
                Some(pos) => start + left.len() + pos,
                None => len,
            },
        };
        self.offset = end + 1;

        let (left, right) = self.store.range_slices(start..end);
        Some(LineSpan { start, left, right })
    }
}

impl GapStore {
    pub fn lines(&self) -> Lines<'_> {
        self.lines_from(0)
    }

    /// Iterate lines starting at `offset`, which should be a line start.
    pub fn lines_from(&self, offset: usize) -> Lines<'_> {
        Lines {
            store: self,
            offset,
        }
    }

    /// Number of lines: the `'\n'` count plus one.
    pub fn line_count(&self) -> usize {
        let (left, right) = self.get_strings();
        count_newlines(left) + count_newlines(right) + 1
    }

    /// Number of `'\n'` bytes inside `range`.
    pub fn count_newlines_in_range(&self, range: Range<usize>) -> usize {
        let (left, right) = self.range_slices(range);
        count_newlines(left) + count_newlines(right)
    }

    /// Offset of the first byte of the line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        let mut it = offset;
        while it > 0 && self.sample(it - 1) != b'\n' {
            it -= 1;
        }
        it
    }

    /// Offset of the `'\n'` ending the line containing `offset`, or the end of the store.
    pub fn line_end(&self, offset: usize) -> usize {
        let len = self.len();
        let mut it = offset;
        while it < len && self.sample(it) != b'\n' {
            it += 1;
        }
        it
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_gap(text: &str, gap_at: usize) -> GapStore {
        let mut store = GapStore::with_capacity(text.as_bytes(), text.len() + 8).unwrap();
        store.move_gap_to(gap_at);
        store
    }

    fn collect(store: &GapStore) -> Vec<String> {
        store
            .lines()
            .map(|line| String::from_utf8(line.to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn count_newlines_wide_and_tail() {
        let mut text = "a\n".repeat(40);
        text.push_str("xyz\n");
        assert_eq!(count_newlines(text.as_bytes()), 41);
        assert_eq!(count_newlines(b""), 0);
    }

    #[test]
    fn lines_split_on_newline() {
        let store = store_with_gap("one\ntwo\n\nfour", 5);
        assert_eq!(collect(&store), vec!["one", "two", "", "four"]);
        assert_eq!(store.line_count(), 4);
    }

    #[test]
    fn line_straddling_gap_has_two_parts() {
        let store = store_with_gap("hello\nworld", 8);
        let second = store.lines().nth(1).unwrap();
        assert_eq!(second.left, b"wo");
        assert_eq!(second.right, b"rld");
        assert_eq!(second.range(), 6..11);
    }

    #[test]
    fn trailing_newline_and_empty_store() {
        let store = store_with_gap("a\n", 0);
        assert_eq!(collect(&store), vec!["a"]);
        assert_eq!(store.line_count(), 2);

        let empty = GapStore::new();
        assert_eq!(empty.lines().count(), 0);
        assert_eq!(empty.line_count(), 1);
    }

    #[test]
    fn lines_restart_from_clone() {
        let store = store_with_gap("a\nb\nc", 3);
        let mut lines = store.lines();
        lines.next();
        let rest: Vec<_> = lines.clone().map(|l| l.start).collect();
        assert_eq!(rest, vec![2, 4]);
        assert_eq!(lines.map(|l| l.start).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn line_bounds() {
        let store = store_with_gap("ab\ncde\n", 4);
        assert_eq!(store.line_start(5), 3);
        assert_eq!(store.line_end(3), 6);
        assert_eq!(store.line_start(0), 0);
        assert_eq!(store.line_end(7), 7);
        assert_eq!(store.count_newlines_in_range(0..7), 2);
    }
}
