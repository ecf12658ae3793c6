//! Candidate line storage.
//!
//! A [`Chars`] holds one candidate line either as raw ASCII bytes or as decoded
//! codepoints. Most input lines are plain ASCII, and keeping them as bytes
//! avoids a decode pass and lets the matcher use `memchr` for its prefilter.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Storage {
    /// Every byte is `< 0x80`.
    Bytes(Vec<u8>),
    Runes(Vec<char>),
}

/// One candidate line, indexed by character.
///
/// The storage mode is chosen once at construction and never changes
/// afterwards, including through [`Chars::trim_trailing_whitespaces`] and
/// [`Chars::prepend`].
#[derive(Debug, Clone)]
pub struct Chars {
    storage: Storage,
    trim_length: OnceLock<u16>,
    /// Caller-assigned tag carried along with the line (e.g. its input line
    /// number). Ignored by every matching algorithm.
    pub index: i32,
}

impl Chars {
    /// Builds a text unit from raw bytes.
    ///
    /// Pure ASCII input is kept as bytes; anything else is decoded once into
    /// codepoints, with malformed sequences replaced by `U+FFFD`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let storage = match bytes.iter().position(|b| !b.is_ascii()) {
            None => Storage::Bytes(bytes.to_vec()),
            Some(until) => {
                let mut runes = Vec::with_capacity(bytes.len());
                runes.extend(bytes[..until].iter().map(|&b| b as char));
                runes.extend(String::from_utf8_lossy(&bytes[until..]).chars());
                Storage::Runes(runes)
            }
        };
        Self::with_storage(storage)
    }

    /// Builds a codepoint-backed text unit.
    pub fn from_runes(runes: Vec<char>) -> Self {
        Self::with_storage(Storage::Runes(runes))
    }

    fn with_storage(storage: Storage) -> Self {
        Self {
            storage,
            trim_length: OnceLock::new(),
            index: 0,
        }
    }

    /// Sets the caller tag, builder style.
    pub fn with_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }

    /// Whether the line is stored as ASCII bytes.
    pub fn is_bytes(&self) -> bool {
        matches!(self.storage, Storage::Bytes(_))
    }

    /// The raw bytes of a byte-backed line, `None` for codepoint-backed lines.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.storage {
            Storage::Bytes(bytes) => Some(bytes),
            Storage::Runes(_) => None,
        }
    }

    /// Character at index `i`.
    ///
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn get(&self, i: usize) -> char {
        match &self.storage {
            Storage::Bytes(bytes) => bytes[i] as char,
            Storage::Runes(runes) => runes[i],
        }
    }

    /// Number of characters.
    #[inline]
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Bytes(bytes) => bytes.len(),
            Storage::Runes(runes) => runes.len(),
        }
    }

    /// Whether the line has no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length after trimming leading and trailing whitespace, saturating at
    /// `u16::MAX`. Computed on first use and cached.
    pub fn trim_length(&self) -> u16 {
        *self.trim_length.get_or_init(|| {
            let trailing = self.trailing_whitespaces();
            if trailing == self.len() {
                return 0;
            }
            let trimmed = self.len() - trailing - self.leading_whitespaces();
            u16::try_from(trimmed).unwrap_or(u16::MAX)
        })
    }

    /// Number of whitespace characters at the start of the line.
    pub fn leading_whitespaces(&self) -> usize {
        (0..self.len()).take_while(|&i| self.get(i).is_whitespace()).count()
    }

    /// Number of whitespace characters at the end of the line.
    pub fn trailing_whitespaces(&self) -> usize {
        (0..self.len()).rev().take_while(|&i| self.get(i).is_whitespace()).count()
    }

    /// Drops trailing whitespace in place.
    pub fn trim_trailing_whitespaces(&mut self) {
        let len = self.len() - self.trailing_whitespaces();
        match &mut self.storage {
            Storage::Bytes(bytes) => bytes.truncate(len),
            Storage::Runes(runes) => runes.truncate(len),
        }
        self.trim_length = OnceLock::new();
    }

    /// Inserts `prefix` in front of the line, keeping the storage mode.
    ///
    /// Byte-backed lines must stay ASCII, so non-ASCII characters of `prefix`
    /// are stored as `?` there.
    pub fn prepend(&mut self, prefix: &str) {
        match &mut self.storage {
            Storage::Bytes(bytes) => {
                if !prefix.is_ascii() {
                    debug!("non-ascii prefix {prefix:?} on a byte-backed line");
                }
                let mut prefixed: Vec<u8> = prefix
                    .chars()
                    .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                    .collect();
                prefixed.extend_from_slice(bytes);
                *bytes = prefixed;
            }
            Storage::Runes(runes) => {
                let mut prefixed: Vec<char> = prefix.chars().collect();
                prefixed.extend_from_slice(runes);
                *runes = prefixed;
            }
        }
        self.trim_length = OnceLock::new();
    }

    /// The line as codepoints, borrowed when already codepoint-backed.
    pub fn to_runes(&self) -> Cow<'_, [char]> {
        match &self.storage {
            Storage::Bytes(bytes) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
            Storage::Runes(runes) => Cow::Borrowed(runes),
        }
    }

    /// Copies the first `dest.len()` codepoints into `dest`.
    pub fn copy_runes(&self, dest: &mut [u32]) {
        match &self.storage {
            Storage::Bytes(bytes) => {
                for (d, &b) in dest.iter_mut().zip(bytes) {
                    *d = u32::from(b);
                }
            }
            Storage::Runes(runes) => {
                for (d, &c) in dest.iter_mut().zip(runes) {
                    *d = u32::from(c);
                }
            }
        }
    }
}

impl From<&str> for Chars {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl Display for Chars {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.storage {
            Storage::Bytes(bytes) => f.write_str(std::str::from_utf8(bytes).map_err(|_| std::fmt::Error)?),
            Storage::Runes(runes) => {
                for c in runes {
                    write!(f, "{c}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_byte_backed() {
        let chars = Chars::from("foo bar");
        assert!(chars.is_bytes());
        assert_eq!(chars.len(), 7);
        assert_eq!(chars.get(4), 'b');
        assert_eq!(chars.as_bytes(), Some(&b"foo bar"[..]));
    }

    #[test]
    fn test_unicode_is_rune_backed() {
        let chars = Chars::from("Só Danço");
        assert!(!chars.is_bytes());
        assert_eq!(chars.len(), 8);
        assert_eq!(chars.get(1), 'ó');
        assert_eq!(chars.get(6), 'ç');
        assert_eq!(chars.as_bytes(), None);
        assert_eq!(chars.to_string(), "Só Danço");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let chars = Chars::from_bytes(b"ab\xffc");
        assert!(!chars.is_bytes());
        assert_eq!(chars.to_string(), "ab\u{FFFD}c");
    }

    #[test]
    fn test_whitespaces() {
        let chars = Chars::from("  foo bar \t");
        assert_eq!(chars.leading_whitespaces(), 2);
        assert_eq!(chars.trailing_whitespaces(), 2);
        assert_eq!(chars.trim_length(), 7);

        let blank = Chars::from(" \u{3000} ");
        assert_eq!(blank.trim_length(), 0);
        assert_eq!(blank.leading_whitespaces(), 3);
        assert_eq!(Chars::from("").trim_length(), 0);
    }

    #[test]
    fn test_trim_trailing_keeps_mode() {
        let mut chars = Chars::from("foo  ");
        chars.trim_trailing_whitespaces();
        assert!(chars.is_bytes());
        assert_eq!(chars.to_string(), "foo");

        let mut chars = Chars::from("föö\u{3000}");
        chars.trim_trailing_whitespaces();
        assert!(!chars.is_bytes());
        assert_eq!(chars.to_string(), "föö");
        assert_eq!(chars.trim_length(), 3);
    }

    #[test]
    fn test_prepend_keeps_mode() {
        let mut chars = Chars::from("bar");
        assert_eq!(chars.trim_length(), 3);
        chars.prepend("12: ");
        assert!(chars.is_bytes());
        assert_eq!(chars.to_string(), "12: bar");
        assert_eq!(chars.trim_length(), 7);

        chars.prepend("é");
        assert!(chars.is_bytes());
        assert_eq!(chars.to_string(), "?12: bar");

        let mut chars = Chars::from("bär");
        chars.prepend("ä ");
        assert!(!chars.is_bytes());
        assert_eq!(chars.to_string(), "ä bär");
    }

    #[test]
    fn test_copy_runes() {
        let chars = Chars::from("añb");
        let mut dest = [0u32; 3];
        chars.copy_runes(&mut dest);
        assert_eq!(dest, ['a' as u32, 'ñ' as u32, 'b' as u32]);
        assert_eq!(&*chars.to_runes(), &['a', 'ñ', 'b']);
    }

    #[test]
    fn test_index_is_carried() {
        let chars = Chars::from("foo").with_index(42);
        assert_eq!(chars.index, 42);
    }
}
