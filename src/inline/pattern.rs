//! Pattern abstraction used by the partitioning primitive.
//!
//! Most inline constructs are plain regular expressions. Code spans and
//! emphasis need context the `regex` crate cannot express (neighbouring
//! backticks, word boundaries on both sides), so they implement
//! [`InlinePattern`] with hand-written scanners.

use regex::Regex;
use smallvec::SmallVec;

use crate::tree::OPAQUE_MARK;
use crate::Range;

/// Capture group spans of one match; group 0 is the whole match and
/// `None` marks a group that did not participate.
pub type Groups = SmallVec<[Option<Range>; 4]>;

/// Something that finds the first match in a target string.
pub trait InlinePattern {
    /// First match starting at or after byte offset `from`.
    fn search(&self, text: &str, from: usize) -> Option<Groups>;
}

impl InlinePattern for Regex {
    fn search(&self, text: &str, from: usize) -> Option<Groups> {
        let caps = self.captures_at(text, from)?;
        Some(
            caps.iter()
                .map(|m| m.map(|m| Range::from_usize(m.start(), m.end())))
                .collect(),
        )
    }
}

/// UTF-8 encoding of [`OPAQUE_MARK`].
const MARK: &[u8] = "\u{FFFC}".as_bytes();

#[inline]
fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b.is_ascii_punctuation()
}

/// Whether a word ends right before byte `at`: start of text, whitespace,
/// ASCII punctuation or an opaque node.
#[inline]
pub fn boundary_before(bytes: &[u8], at: usize) -> bool {
    match at.checked_sub(1) {
        None => true,
        Some(i) => is_separator(bytes[i]) || bytes[..at].ends_with(MARK),
    }
}

/// Whether a word starts right at byte `at`: end of text, whitespace,
/// ASCII punctuation or an opaque node.
#[inline]
pub fn boundary_after(bytes: &[u8], at: usize) -> bool {
    match bytes.get(at) {
        None => true,
        Some(&b) => is_separator(b) || bytes[at..].starts_with(MARK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_groups() {
        let re = Regex::new(r"a(b)?(c)").unwrap();
        let groups = re.search("xxac", 0).unwrap();
        assert_eq!(groups[0], Some(Range::new(2, 4)));
        assert_eq!(groups[1], None);
        assert_eq!(groups[2], Some(Range::new(3, 4)));
    }

    #[test]
    fn test_regex_respects_from() {
        let re = Regex::new(r"a").unwrap();
        assert_eq!(re.search("a a", 1).unwrap()[0], Some(Range::new(2, 3)));
        assert!(re.search("a", 1).is_none());
    }

    #[test]
    fn test_mark_bytes() {
        assert_eq!(MARK, OPAQUE_MARK.to_string().as_bytes());
    }

    #[test]
    fn test_boundary() {
        let text = b"a b.c";
        assert!(boundary_before(text, 0));
        assert!(!boundary_before(text, 1));
        assert!(boundary_before(text, 2));
        assert!(boundary_after(text, 1));
        assert!(boundary_after(text, 3));
        assert!(!boundary_after(text, 4));
        assert!(boundary_after(text, 5));
    }

    #[test]
    fn test_opaque_mark_is_boundary() {
        let text = "x\u{FFFC}*é".as_bytes();
        let star = text.len() - 3;
        assert!(boundary_before(text, star));
        assert!(boundary_after(text, 1));
        // Other multi-byte characters are word content.
        assert!(!boundary_after(text, star + 1));
        assert!(!boundary_before(text, text.len()));
    }
}
