//! Emphasis and strong matching.
//!
//! A delimiter run of one, two or three `*` or `_` opens when it follows a
//! word boundary and precedes content; it closes on the next run of the same
//! character and length that follows content and precedes a word boundary.
//! Runs are tried by precedence: `***` before `**`/`__` before `*`/`_`.

use memchr::memchr2;
use smallvec::smallvec;

use super::pattern::{boundary_after, boundary_before, Groups, InlinePattern};
use crate::Range;

/// Delimiter run lengths in precedence order.
const RUN_LENGTHS: [usize; 3] = [3, 2, 1];

/// Group 1 holds the content. The delimiter length is the difference
/// between group 0 and group 1 on each side.
pub struct EmphasisPattern {
    /// Delimiter run length this pattern matches.
    run: usize,
}

impl EmphasisPattern {
    pub const fn new(run: usize) -> Self {
        Self { run }
    }

    /// One pattern per delimiter class, in precedence order.
    pub fn by_precedence() -> [EmphasisPattern; 3] {
        RUN_LENGTHS.map(EmphasisPattern::new)
    }

    /// Delimiter run length.
    pub fn run(&self) -> usize {
        self.run
    }
}

impl InlinePattern for EmphasisPattern {
    fn search(&self, text: &str, from: usize) -> Option<Groups> {
        let bytes = text.as_bytes();
        let mut pos = from;

        while let Some(offset) = memchr2(b'*', b'_', &bytes[pos..]) {
            let start = pos + offset;
            let ch = bytes[start];
            let end = run_end(bytes, start, ch);
            pos = end;

            if end - start != self.run || !opens(bytes, start, end) {
                continue;
            }

            if let Some(close) = find_closer(bytes, end, ch, self.run) {
                return Some(smallvec![
                    Some(Range::from_usize(start, close + self.run)),
                    Some(Range::from_usize(end, close)),
                ]);
            }
        }

        None
    }
}

#[inline]
fn run_end(bytes: &[u8], start: usize, ch: u8) -> usize {
    start + bytes[start..].iter().take_while(|&&b| b == ch).count()
}

/// Boundary before, content after.
#[inline]
fn opens(bytes: &[u8], start: usize, end: usize) -> bool {
    let after = bytes.get(end).copied();
    boundary_before(bytes, start) && after.is_some_and(|b| !b.is_ascii_whitespace())
}

/// Content before, boundary after.
#[inline]
fn closes(bytes: &[u8], start: usize, end: usize) -> bool {
    let before = bytes[start - 1];
    !before.is_ascii_whitespace() && boundary_after(bytes, end)
}

/// Start of the closing run for an opener ending at `from`, on the same
/// line.
fn find_closer(bytes: &[u8], from: usize, ch: u8, run: usize) -> Option<usize> {
    let mut pos = from;
    loop {
        let at = pos + memchr2(ch, b'\n', &bytes[pos..])?;
        if bytes[at] == b'\n' {
            return None;
        }
        let end = run_end(bytes, at, ch);
        if at > from && end - at == run && closes(bytes, at, end) {
            return Some(at);
        }
        pos = end;
    }
}
