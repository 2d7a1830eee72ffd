//! Inline links and images.
//!
//! Both take a bracketed text followed immediately by a parenthesized
//! destination: an optional `<...>` delimited or bare URI, then an optional
//! title in double quotes, single quotes or parentheses.

use once_cell::sync::Lazy;
use regex::Regex;

use super::partition::Partition;
use super::{match_into, Action};
use crate::tree::{inline_text, Inline, Opaque};

static IMAGE: Lazy<Regex> = Lazy::new(|| destination_pattern(r"!\["));
static LINK: Lazy<Regex> = Lazy::new(|| destination_pattern(r"\["));

/// Group 1: text; 2: angle URI; 3: bare URI; 4-6: title variants.
fn destination_pattern(open: &str) -> Regex {
    let source = format!(
        r#"{open}([^\]]*)\]\(\s*(?:<([^>]*)>|([^\s()]*))(?:\s+(?:"([^"]*)"|'([^']*)'|\(([^)]*)\)))?\s*\)"#
    );
    Regex::new(&source).expect("link pattern compiles")
}

/// URI and optional title of a matched destination.
fn destination(part: &mut Partition) -> (String, Option<String>) {
    let uri = part
        .take_group(2)
        .or_else(|| part.take_group(3))
        .map(|children| inline_text(&children))
        .unwrap_or_default();
    let title = (4..=6)
        .find_map(|i| part.take_group(i))
        .map(|children| inline_text(&children));
    (uri, title)
}

/// Replace images by self-contained leaves carrying their alt text.
pub fn parse_images(children: Vec<Inline>) -> Vec<Inline> {
    match_into(children, &*IMAGE, |part| {
        let alt = part.take_group(1).map(|c| inline_text(&c)).unwrap_or_default();
        let (uri, title) = destination(part);
        Action::Replace(vec![Inline::Opaque(Opaque::image(alt, uri, title))])
    })
}

/// Replace links by opaque spans around their text. `text_pass` runs over
/// the link text before it is wrapped.
pub fn parse_links<F>(children: Vec<Inline>, text_pass: F) -> Vec<Inline>
where
    F: Fn(Vec<Inline>) -> Vec<Inline>,
{
    match_into(children, &*LINK, |part| {
        let text = part.take_group(1).unwrap_or_default();
        let (uri, title) = destination(part);
        Action::Replace(vec![Inline::Opaque(Opaque::link(uri, title, text_pass(text)))])
    })
}
