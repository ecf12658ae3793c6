//! Cheap pre-check for byte-backed lines.
//!
//! Locates every pattern character in order with `memchr`. This only prunes:
//! skipping it never changes a result.

use memchr::memchr;

use crate::chars::Chars;

/// Position of `b` in `bytes[from..]`, preferring an earlier uppercase
/// occurrence when matching a lowercase letter case-insensitively.
fn try_skip(bytes: &[u8], case_sensitive: bool, b: u8, from: usize) -> Option<usize> {
    let haystack = &bytes[from..];
    let mut idx = memchr(b, haystack);
    if idx == Some(0) {
        return Some(from);
    }
    if !case_sensitive && b.is_ascii_lowercase() {
        let before = match idx {
            Some(idx) => &haystack[..idx],
            None => haystack,
        };
        if let Some(upper) = memchr(b.to_ascii_uppercase(), before) {
            idx = Some(upper);
        }
    }
    idx.map(|idx| from + idx)
}

/// Returns `None` when the pattern provably cannot match.
///
/// Otherwise returns the offset to start scanning from: the position right
/// before the first occurrence of the first pattern character, so that its
/// bonus can still be computed. Codepoint-backed lines cannot be checked and
/// always yield `Some(0)`.
pub fn ascii_fuzzy_index(text: &Chars, pattern: &[char], case_sensitive: bool) -> Option<usize> {
    let Some(bytes) = text.as_bytes() else {
        return Some(0);
    };
    // ASCII text cannot contain a non-ASCII character
    if !pattern.iter().all(char::is_ascii) {
        return None;
    }

    let mut first_idx = 0;
    let mut idx = 0;
    for (pidx, &pc) in pattern.iter().enumerate() {
        idx = try_skip(bytes, case_sensitive, pc as u8, idx)?;
        if pidx == 0 && idx > 0 {
            first_idx = idx - 1;
        }
        idx += 1;
    }
    Some(first_idx)
}
