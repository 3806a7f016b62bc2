//! Byte-level UTF-8 helpers.
//!
//! The store holds raw bytes; cursors only need to know where scalar values
//! start, never the decoded values themselves.

/// True if `byte` starts an encoded scalar value (it is not a continuation byte).
#[inline]
pub fn is_char_start(byte: u8) -> bool {
    byte & 0xC0 != 0x80
}

/// Advance `col` (zero-based) to the next tab stop.
#[inline]
pub fn next_tab_stop(col: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    col + tab_width - col % tab_width
}

/// Encode `ch` repeated `amount` times.
pub fn encode_repeated(ch: char, amount: usize) -> smallvec::SmallVec<[u8; 16]> {
    let mut scratch = [0u8; 4];
    let encoded = ch.encode_utf8(&mut scratch).as_bytes();
    let mut out = smallvec::SmallVec::with_capacity(encoded.len() * amount);
    for _ in 0..amount {
        out.extend_from_slice(encoded);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_starts() {
        let text = "aé€😀".as_bytes();
        let starts: Vec<usize> = (0..text.len()).filter(|&i| is_char_start(text[i])).collect();
        assert_eq!(starts, vec![0, 1, 3, 6]);
    }

    #[test]
    fn tab_stops() {
        assert_eq!(next_tab_stop(0, 4), 4);
        assert_eq!(next_tab_stop(3, 4), 4);
        assert_eq!(next_tab_stop(4, 4), 8);
        assert_eq!(next_tab_stop(5, 0), 6);
    }

    #[test]
    fn encode_repeated_multibyte() {
        assert_eq!(encode_repeated('é', 2).as_slice(), "éé".as_bytes());
        assert!(encode_repeated('x', 0).is_empty());
    }
}
