//! Code span matching.
//!
//! Code spans have highest precedence among inline elements. The opening
//! run is one or two backticks, not escaped by a backslash; the closing run
//! must have exactly the same length. Runs are maximal, so a two-backtick
//! delimiter never matches inside a three-backtick run. Spans do not cross
//! line breaks.

use memchr::{memchr, memchr2};
use smallvec::smallvec;

use super::pattern::{Groups, InlinePattern};
use crate::limits::MAX_CODE_SPAN_BACKTICKS;
use crate::Range;

/// Group 1 holds the delimiter run, group 2 the raw content.
pub struct CodeSpanPattern;

impl InlinePattern for CodeSpanPattern {
    fn search(&self, text: &str, from: usize) -> Option<Groups> {
        let bytes = text.as_bytes();
        let mut pos = from;

        while let Some(offset) = memchr(b'`', &bytes[pos..]) {
            let start = pos + offset;
            let end = run_end(bytes, start);
            pos = end;

            let len = end - start;
            if len > MAX_CODE_SPAN_BACKTICKS || (start > 0 && bytes[start - 1] == b'\\') {
                continue;
            }

            if let Some(close) = find_closer(bytes, end, len) {
                return Some(smallvec![
                    Some(Range::from_usize(start, close + len)),
                    Some(Range::from_usize(start, end)),
                    Some(Range::from_usize(end, close)),
                ]);
            }
        }

        None
    }
}

/// End of the backtick run starting at `start`.
#[inline]
fn run_end(bytes: &[u8], start: usize) -> usize {
    start + bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

/// Start of the first run of exactly `len` backticks after non-empty
/// content, on the same line.
fn find_closer(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut pos = from;
    loop {
        let at = pos + memchr2(b'`', b'\n', &bytes[pos..])?;
        if bytes[at] == b'\n' {
            return None;
        }
        let end = run_end(bytes, at);
        if end - at == len && at > from {
            return Some(at);
        }
        pos = end;
    }
}
