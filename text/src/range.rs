//! Byte range helpers shared by the store, the history and the cursor commands.

use std::ops::Range;

/// Map `offset` to where it ends up after `removed` is deleted.
///
/// Offsets inside the removed interval collapse to its start, offsets after it
/// shift left by its length.
pub fn remove_from_offset(offset: usize, removed: &Range<usize>) -> usize {
    if offset > removed.end {
        offset - removed.len()
    } else if offset > removed.start {
        removed.start
    } else {
        offset
    }
}

/// True if the two ranges share at least one byte.
pub fn intersects(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Ranges occupied by the swapped contents after transposing `a` and `b`.
///
/// The returned `a` covers where the contents of `b` now live and the returned
/// `b` where the contents of `a` now live, so transposing the result again
/// restores the previous layout.
pub fn transposed(a: &Range<usize>, b: &Range<usize>) -> (Range<usize>, Range<usize>) {
    let (a_len, b_len) = (a.len(), b.len());
    if a.start < b.start {
        let b_start = b.start + b_len - a_len;
        (a.start..a.start + b_len, b_start..b_start + a_len)
    } else {
        let a_start = a.start + a_len - b_len;
        (a_start..a_start + b_len, b.start..b.start + a_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_from_offset_before_inside_after() {
        let removed = 4..8;
        assert_eq!(remove_from_offset(2, &removed), 2);
        assert_eq!(remove_from_offset(4, &removed), 4);
        assert_eq!(remove_from_offset(6, &removed), 4);
        assert_eq!(remove_from_offset(8, &removed), 4);
        assert_eq!(remove_from_offset(10, &removed), 6);
    }

    #[test]
    fn intersects_is_exclusive_at_edges() {
        assert!(intersects(&(0..4), &(3..6)));
        assert!(!intersects(&(0..4), &(4..6)));
        assert!(!intersects(&(5..6), &(0..5)));
    }

    #[test]
    fn transposed_unequal_lengths() {
        // "aa-bbbb" swapping 0..2 and 3..7 gives "bbbb-aa"
        let (a, b) = transposed(&(0..2), &(3..7));
        assert_eq!(a, 0..4);
        assert_eq!(b, 5..7);
    }

    #[test]
    fn transposed_is_order_independent() {
        let (a, b) = transposed(&(3..7), &(0..2));
        assert_eq!(a, 5..7);
        assert_eq!(b, 0..4);
    }
}
