//! Named and numeric character entities.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{match_into, Action};
use crate::entity::EntityResolver;
use crate::tree::{Inline, Opaque};

static NAMED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("named entity pattern compiles"));

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#([xX]?)([0-9A-Fa-f]+);").expect("numeric entity pattern compiles"));

/// Resolve named entities through `resolver`, then numeric references.
///
/// `&amp;` always becomes an opaque `&` so it cannot start another entity.
/// Unknown names stay as literal text.
pub fn parse(children: Vec<Inline>, resolver: &dyn EntityResolver) -> Vec<Inline> {
    let children = match_into(children, &*NAMED, |part| {
        let Some(name) = part.group_str(1) else {
            return Action::Keep;
        };
        if name == "amp" {
            return Action::Replace(vec![Inline::Opaque(Opaque::literal("&"))]);
        }
        match resolver.resolve(name) {
            Some(text) if text.is_empty() => Action::Replace(Vec::new()),
            Some(text) => Action::Replace(vec![Inline::Text(text.into_owned())]),
            None => Action::Keep,
        }
    });

    match_into(children, &*NUMERIC, |part| {
        let hex = part.group_str(1).is_some_and(|x| !x.is_empty());
        match part.group_str(2) {
            Some(digits) => Action::Replace(vec![numeric(hex, digits)]),
            None => Action::Keep,
        }
    })
}

/// Node for a numeric reference.
///
/// Zero, overflowing and non-scalar values become U+FFFD; a decimal
/// reference containing hex letters stays as an opaque literal.
fn numeric(hex: bool, digits: &str) -> Inline {
    let value = if hex {
        u32::from_str_radix(digits, 16)
    } else if digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse::<u32>()
    } else {
        return Inline::Opaque(Opaque::literal(format!("&#{digits};")));
    };

    let ch = match value {
        Ok(0) | Err(_) => char::REPLACEMENT_CHARACTER,
        Ok(code) => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
    };
    Inline::Text(ch.to_string())
}
