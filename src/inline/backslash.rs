//! Backslash escapes.
//!
//! A backslash followed by one printable ASCII character yields that
//! character as an opaque literal; later passes never reinterpret it.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{match_into, Action};
use crate::tree::{Inline, Opaque};

static ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\([ -~])").expect("escape pattern compiles"));

/// Replace every escape sequence in `children`.
pub fn parse(children: Vec<Inline>) -> Vec<Inline> {
    match_into(children, &*ESCAPE, |part| match part.take_group(1) {
        Some(escaped) => Action::Replace(vec![Inline::Opaque(Opaque::escaped(escaped))]),
        None => Action::Keep,
    })
}
