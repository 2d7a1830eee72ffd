//! XML escaping for the tree writer.
//!
//! Fast-path optimized: scans for the first escapable byte with memchr,
//! then bulk-copies the segments between escapes.

use memchr::{memchr, memchr3};

/// Lookup table for escapable bytes in element content.
const TEXT_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table
};

/// Lookup table for escapable bytes in double-quoted attribute values.
const ATTR_ESCAPE_TABLE: [bool; 256] = {
    let mut table = TEXT_ESCAPE_TABLE;
    table[b'"' as usize] = true;
    table
};

/// Escape element content into `out`.
///
/// Escapes `<`, `>` and `&`.
///
/// # Example
/// ```
/// use mdtree::escape::escape_text_into;
///
/// let mut out = Vec::new();
/// escape_text_into(&mut out, b"a < b & c");
/// assert_eq!(out, b"a &lt; b &amp; c");
/// ```
#[inline]
pub fn escape_text_into(out: &mut Vec<u8>, input: &[u8]) {
    match memchr3(b'<', b'>', b'&', input) {
        Some(first) => escape_from(out, input, first, &TEXT_ESCAPE_TABLE),
        None => out.extend_from_slice(input),
    }
}

/// Escape a double-quoted attribute value into `out`.
///
/// Escapes `<`, `>`, `&` and `"`.
///
/// # Example
/// ```
/// use mdtree::escape::escape_attr_into;
///
/// let mut out = Vec::new();
/// escape_attr_into(&mut out, b"say \"hi\"");
/// assert_eq!(out, b"say &quot;hi&quot;");
/// ```
#[inline]
pub fn escape_attr_into(out: &mut Vec<u8>, input: &[u8]) {
    let first = min_opt(memchr3(b'<', b'>', b'&', input), memchr(b'"', input));
    match first {
        Some(first) => escape_from(out, input, first, &ATTR_ESCAPE_TABLE),
        None => out.extend_from_slice(input),
    }
}

/// Escape starting at `pos`, the first escapable byte.
fn escape_from(out: &mut Vec<u8>, input: &[u8], mut pos: usize, table: &[bool; 256]) {
    out.extend_from_slice(&input[..pos]);

    while pos < input.len() {
        let scan_start = pos;
        while pos < input.len() && !table[input[pos] as usize] {
            pos += 1;
        }
        if pos > scan_start {
            out.extend_from_slice(&input[scan_start..pos]);
        }

        if pos < input.len() {
            let escape_seq: &[u8] = match input[pos] {
                b'<' => b"&lt;",
                b'>' => b"&gt;",
                b'&' => b"&amp;",
                b'"' => b"&quot;",
                _ => std::slice::from_ref(&input[pos]),
            };
            out.extend_from_slice(escape_seq);
            pos += 1;
        }
    }
}

#[inline]
fn min_opt(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
