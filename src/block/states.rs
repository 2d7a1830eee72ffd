//! Transition handlers of every block state.

use std::borrow::Cow;

use regex::Captures;

use super::grammar::{State, Transition};
use super::indent::{is_blank, leading_columns, normalize, strip_columns, Indent, Normalized};
use super::machine::{Machine, Outcome, Scope};
use super::unwrap_tight_items;
use crate::error::Result;
use crate::tree::{Block, Inline, List, ListItem, ListKind, Section};

/// What a body does with a heading that cannot nest below its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overflow {
    /// End the scope; an enclosing section takes the heading.
    Close,
    /// Keep the line as paragraph text. Used where handing the line back
    /// would only reopen the same container.
    Text,
}

/// Body of the document, a section, or a block quote.
pub struct SectionScope {
    level: u8,
    overflow: Overflow,
    children: Vec<Block>,
}

impl SectionScope {
    /// The document root (level 0).
    pub fn root() -> Self {
        Self::new(0)
    }

    fn new(level: u8) -> Self {
        Self {
            level,
            overflow: Overflow::Close,
            children: Vec::new(),
        }
    }

    /// Body of a block quote inside a section of `level`.
    fn quote(level: u8) -> Self {
        Self {
            level,
            overflow: Overflow::Text,
            children: Vec::new(),
        }
    }
}

impl Scope for SectionScope {
    type Output = Vec<Block>;

    fn state(&self) -> State {
        State::Section
    }

    fn apply(
        &mut self,
        machine: &mut Machine<'_>,
        transition: Transition,
        caps: &Captures<'_>,
        line: &str,
    ) -> Result<Outcome> {
        let body = Body {
            level: self.level,
            overflow: self.overflow,
        };
        body_transition(body, &mut self.children, machine, transition, caps, line)
    }

    fn finish(self, _machine: &mut Machine<'_>) -> Vec<Block> {
        self.children
    }
}

/// Content of one list item. Headings inside it nest below the section
/// enclosing the list.
pub struct ItemScope {
    level: u8,
    children: Vec<Block>,
}

impl Scope for ItemScope {
    type Output = ListItem;

    fn state(&self) -> State {
        State::ListItem
    }

    fn apply(
        &mut self,
        machine: &mut Machine<'_>,
        transition: Transition,
        caps: &Captures<'_>,
        line: &str,
    ) -> Result<Outcome> {
        // The marker line itself is never a blank line, even with no
        // content after the marker, and cannot be handed back.
        let marker_line = machine.on_first_line();
        if transition == Transition::Blank && !marker_line {
            machine.note_blank();
        }
        let body = Body {
            level: self.level,
            overflow: if marker_line { Overflow::Text } else { Overflow::Close },
        };
        body_transition(body, &mut self.children, machine, transition, caps, line)
    }

    fn finish(self, _machine: &mut Machine<'_>) -> ListItem {
        ListItem {
            children: self.children,
        }
    }
}

/// Heading context of a body scope.
#[derive(Debug, Clone, Copy)]
struct Body {
    /// Level of the nearest enclosing section (0 for the root).
    level: u8,
    overflow: Overflow,
}

/// Transitions shared by section bodies and list items.
fn body_transition(
    body: Body,
    children: &mut Vec<Block>,
    machine: &mut Machine<'_>,
    transition: Transition,
    caps: &Captures<'_>,
    line: &str,
) -> Result<Outcome> {
    match transition {
        Transition::ThematicBreak => {
            children.push(Block::ThematicBreak);
            Ok(Outcome::Next)
        }
        Transition::Heading => {
            let depth = caps[1].len() as u8;
            if depth <= body.level {
                return Ok(match body.overflow {
                    Overflow::Close => Outcome::EndOfScope,
                    Overflow::Text => Outcome::Correct(Transition::Paragraph),
                });
            }
            let title = heading_title(caps.get(2).map_or("", |m| m.as_str()));
            machine.consume();
            let content = machine.run(SectionScope::new(depth), Indent::none(), None)?;
            children.push(section_chain(body.level, depth, title, content));
            Ok(Outcome::Entered)
        }
        Transition::IndentedCode => {
            let first = strip_columns(line, machine.column(), 4)
                .map(Cow::into_owned)
                .unwrap_or_else(|| caps[1].to_owned());
            machine.consume();
            let block = machine.run(CodeScope::indented(first), Indent::columns(4), None)?;
            children.push(block);
            Ok(Outcome::Entered)
        }
        Transition::FencedCode => {
            let marker = &caps[2];
            let info = caps[3].trim();
            if info_disallowed(marker, info) {
                return Ok(Outcome::Correct(Transition::Paragraph));
            }
            let fence = Fence {
                ch: if marker.starts_with('`') { '`' } else { '~' },
                len: marker.len(),
                indent: caps[1].len(),
            };
            let language = info.split_whitespace().next().map(str::to_owned);
            machine.consume();
            let block = machine.run(CodeScope::fenced(fence, language), Indent::none(), None)?;
            children.push(block);
            Ok(Outcome::Entered)
        }
        Transition::BlockQuote => {
            let first = match normalize(line, machine.column(), Indent::marker('>'), false) {
                Normalized::Line { text, column } => (text.into_owned(), column),
                Normalized::EndOfScope => return Ok(Outcome::EndOfScope),
            };
            let quote = machine.run(SectionScope::quote(body.level), Indent::marker('>'), Some(first))?;
            children.push(Block::BlockQuote(quote));
            Ok(Outcome::Entered)
        }
        Transition::BulletItem => {
            let bullet = caps[2].chars().next().unwrap_or('-');
            let first = (line.to_owned(), machine.column());
            let block = machine.run(ListScope::bullet(bullet, body.level), Indent::none(), Some(first))?;
            children.push(block);
            Ok(Outcome::Entered)
        }
        Transition::OrderedItem => {
            let Ok(start) = caps[2].parse::<u32>() else {
                return Ok(Outcome::Correct(Transition::Paragraph));
            };
            let delimiter = if &caps[3] == ")" { ')' } else { '.' };
            let block = machine.run(
                ListScope::ordered(start, delimiter, body.level),
                Indent::none(),
                Some((line.to_owned(), machine.column())),
            )?;
            children.push(block);
            Ok(Outcome::Entered)
        }
        Transition::Blank => Ok(Outcome::Next),
        Transition::Paragraph => {
            let first = caps[1].trim_end().to_owned();
            machine.consume();
            let block = machine.run(ParagraphScope::new(first), Indent::none(), None)?;
            children.push(block);
            Ok(Outcome::Entered)
        }
        _ => Ok(Outcome::EndOfScope),
    }
}

/// Heading text with an optional closing `#` sequence removed.
///
/// The closing sequence only counts when preceded by whitespace or when it
/// is the whole content.
fn heading_title(raw: &str) -> Vec<Inline> {
    let content = raw.trim_matches([' ', '\t']);
    let without = content.trim_end_matches('#');
    let title = if without.len() < content.len() && (without.is_empty() || without.ends_with([' ', '\t'])) {
        without.trim_end_matches([' ', '\t'])
    } else {
        content
    };

    if title.is_empty() {
        Vec::new()
    } else {
        vec![Inline::text_run(title)]
    }
}

/// Wrap a section of `depth` in untitled sections for every level skipped
/// between `parent` and `depth`.
fn section_chain(parent: u8, depth: u8, title: Vec<Inline>, children: Vec<Block>) -> Block {
    let mut block = Block::Section(Section {
        level: depth,
        title: Some(title),
        children,
    });
    for level in (parent + 1..depth).rev() {
        block = Block::Section(Section {
            level,
            title: None,
            children: vec![block],
        });
    }
    block
}

/// Backtick fences may not carry a backtick in their info string.
fn info_disallowed(marker: &str, info: &str) -> bool {
    marker.starts_with('`') && info.contains('`')
}

/// Paragraph lines, joined on close.
pub struct ParagraphScope {
    lines: Vec<String>,
}

impl ParagraphScope {
    fn new(first: String) -> Self {
        Self { lines: vec![first] }
    }
}

impl Scope for ParagraphScope {
    type Output = Block;

    fn state(&self) -> State {
        State::Paragraph
    }

    fn is_container(&self) -> bool {
        false
    }

    fn apply(
        &mut self,
        machine: &mut Machine<'_>,
        transition: Transition,
        caps: &Captures<'_>,
        _line: &str,
    ) -> Result<Outcome> {
        match transition {
            Transition::Text => {
                self.lines.push(caps[1].trim_end().to_owned());
                Ok(Outcome::Next)
            }
            // Only a list starting at 1 interrupts a paragraph. An item
            // outside the paragraph's own indent belongs to an enclosing
            // list whatever its number.
            Transition::OrderedItemOne => match caps[2].parse::<u32>() {
                Ok(1) => Ok(Outcome::EndOfScope),
                _ if machine.is_lazy_line() => Ok(Outcome::EndOfScope),
                _ => Ok(Outcome::Correct(Transition::Text)),
            },
            Transition::FencedCode if info_disallowed(&caps[2], caps[3].trim()) => {
                Ok(Outcome::Correct(Transition::Text))
            }
            _ => Ok(Outcome::EndOfScope),
        }
    }

    fn finish(self, _machine: &mut Machine<'_>) -> Block {
        Block::Paragraph(vec![Inline::Text(self.lines.join("\n"))])
    }
}

/// Opening fence of a fenced code block.
#[derive(Debug, Clone, Copy)]
struct Fence {
    ch: char,
    len: usize,
    /// Leading spaces of the opening fence, stripped from content lines.
    indent: usize,
}

impl Fence {
    fn closed_by(&self, marker: &str) -> bool {
        marker.starts_with(self.ch) && marker.len() >= self.len
    }
}

/// Raw lines of a fenced or indented code block.
pub struct CodeScope {
    fence: Option<Fence>,
    language: Option<String>,
    lines: Vec<String>,
}

impl CodeScope {
    fn indented(first: String) -> Self {
        Self {
            fence: None,
            language: None,
            lines: vec![first],
        }
    }

    fn fenced(fence: Fence, language: Option<String>) -> Self {
        Self {
            fence: Some(fence),
            language,
            lines: Vec::new(),
        }
    }
}

impl Scope for CodeScope {
    type Output = Block;

    fn state(&self) -> State {
        State::Code
    }

    fn is_container(&self) -> bool {
        false
    }

    fn apply(
        &mut self,
        _machine: &mut Machine<'_>,
        transition: Transition,
        caps: &Captures<'_>,
        line: &str,
    ) -> Result<Outcome> {
        match transition {
            Transition::FenceClose => match self.fence {
                Some(fence) if fence.closed_by(&caps[1]) => Ok(Outcome::Close),
                _ => Ok(Outcome::Correct(Transition::RawText)),
            },
            Transition::Blank => {
                self.lines.push(String::new());
                Ok(Outcome::Next)
            }
            Transition::RawText => {
                let text = match self.fence {
                    Some(fence) => strip_spaces(line, fence.indent),
                    None => line,
                };
                self.lines.push(text.to_owned());
                Ok(Outcome::Next)
            }
            _ => Ok(Outcome::EndOfScope),
        }
    }

    fn finish(mut self, machine: &mut Machine<'_>) -> Block {
        if self.fence.is_none() {
            let kept = self.lines.iter().rposition(|l| !is_blank(l)).map_or(0, |i| i + 1);
            if kept < self.lines.len() {
                self.lines.truncate(kept);
                machine.note_blank();
            }
        }
        Block::CodeBlock {
            language: self.language,
            text: self.lines.join("\n"),
        }
    }
}

/// Remove at most `n` leading spaces.
fn strip_spaces(line: &str, n: usize) -> &str {
    let lead = line.bytes().take(n).take_while(|&b| b == b' ').count();
    &line[lead..]
}

/// Container of list items sharing one bullet or delimiter.
pub struct ListScope {
    kind: ListKind,
    /// Level of the section enclosing the list.
    level: u8,
    items: Vec<ListItem>,
}

impl ListScope {
    fn bullet(bullet: char, level: u8) -> Self {
        Self {
            kind: ListKind::Bullet { bullet },
            level,
            items: Vec::new(),
        }
    }

    fn ordered(start: u32, delimiter: char, level: u8) -> Self {
        Self {
            kind: ListKind::Ordered { start, delimiter },
            level,
            items: Vec::new(),
        }
    }

    /// Run one item. `marker_end` is the column after the list marker,
    /// relative to the start of the line text.
    fn open_item(
        &mut self,
        machine: &mut Machine<'_>,
        marker_end: usize,
        spacing: &str,
        content: &str,
    ) -> Result<Outcome> {
        let base = machine.column();
        let spaces = leading_columns(spacing, base + marker_end);
        // Content indented five or more columns past the marker is
        // indented code; the item itself takes one column.
        let (width, first) = if is_blank(content) || spaces > 4 {
            let pad = " ".repeat(spaces.saturating_sub(1));
            (marker_end + 1, format!("{pad}{content}"))
        } else {
            (marker_end + spaces, content.to_owned())
        };

        let item = machine.run(
            ItemScope {
                level: self.level,
                children: Vec::new(),
            },
            Indent::columns(width),
            Some((first, base + width)),
        )?;
        self.items.push(item);
        Ok(Outcome::Entered)
    }
}

impl Scope for ListScope {
    type Output = Block;

    fn state(&self) -> State {
        match self.kind {
            ListKind::Bullet { .. } => State::BulletList,
            ListKind::Ordered { .. } => State::OrderedList,
        }
    }

    fn begin(&mut self, machine: &mut Machine<'_>) {
        machine.push_list();
    }

    fn apply(
        &mut self,
        machine: &mut Machine<'_>,
        transition: Transition,
        caps: &Captures<'_>,
        _line: &str,
    ) -> Result<Outcome> {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        match transition {
            Transition::Blank => {
                machine.note_blank();
                Ok(Outcome::Next)
            }
            Transition::BulletItem => {
                let bullet = group(2).chars().next();
                match self.kind {
                    ListKind::Bullet { bullet: own } if bullet == Some(own) => {
                        let marker_end = group(1).len() + 1;
                        self.open_item(machine, marker_end, group(3), group(4))
                    }
                    _ => Ok(Outcome::EndOfScope),
                }
            }
            Transition::OrderedItem => {
                let delimiter = group(3).chars().next();
                match self.kind {
                    ListKind::Ordered { delimiter: own, .. } if delimiter == Some(own) => {
                        let marker_end = group(1).len() + group(2).len() + 1;
                        self.open_item(machine, marker_end, group(4), group(5))
                    }
                    _ => Ok(Outcome::EndOfScope),
                }
            }
            // A thematic break made of the bullet character ends the list.
            _ => Ok(Outcome::EndOfScope),
        }
    }

    fn finish(mut self, machine: &mut Machine<'_>) -> Block {
        let tight = machine.pop_list();
        if tight {
            unwrap_tight_items(&mut self.items);
        }
        Block::List(List {
            kind: self.kind,
            tight,
            items: self.items,
        })
    }
}
