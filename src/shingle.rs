//! Character shingling.
//!
//! A shingle is a fixed-width window over a key's bytes. Shingle identity is
//! byte-sequence equality, so the shingler works on `&[u8]` windows rather
//! than char boundaries; two keys share a shingle exactly when they share a
//! `width`-byte substring.

use std::collections::HashSet;

/// A fixed-width byte window borrowed from the input key.
pub type Shingle<'a> = &'a [u8];

/// Slide a window of `width` bytes across `text` and collect the set of
/// distinct shingles.
///
/// Inputs shorter than `width` (including the empty string) produce an empty
/// set. A `width` of zero is a caller error.
pub fn shingle(width: usize, text: &str) -> HashSet<Shingle<'_>> {
    debug_assert!(width > 0, "shingle width must be at least 1");
    let bytes = text.as_bytes();
    if width == 0 || bytes.len() < width {
        return HashSet::new();
    }
    bytes.windows(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_window() {
        let shingles = shingle(3, "hello");
        let expected: HashSet<&[u8]> = [b"hel".as_slice(), b"ell", b"llo"].into_iter().collect();
        assert_eq!(shingles, expected);
    }

    #[test]
    fn collapses_duplicates() {
        // "aaaa" has three overlapping "aa" windows but only one distinct shingle.
        let shingles = shingle(2, "aaaa");
        assert_eq!(shingles.len(), 1);
        assert!(shingles.contains(b"aa".as_slice()));
    }

    #[test]
    fn short_input_yields_empty_set() {
        assert!(shingle(3, "hi").is_empty());
        assert!(shingle(3, "").is_empty());
    }

    #[test]
    fn width_equal_to_input_yields_single_shingle() {
        let shingles = shingle(5, "hello");
        assert_eq!(shingles.len(), 1);
        assert!(shingles.contains(b"hello".as_slice()));
    }
}
