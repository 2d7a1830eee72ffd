//! Static transition table of the block state machine.
//!
//! Each [`State`] lists its transitions in the order they are tried; each
//! [`Transition`] owns one line pattern. The table is compiled once, on
//! first use, and shared by every parse.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::limits::{MAX_HEADING_LEVEL, MAX_LIST_MARKER_DIGITS};

/// States of the block machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Document body or section content.
    Section,
    /// Content of a list item: section transitions plus blank tracking.
    ListItem,
    /// Accumulating paragraph lines.
    Paragraph,
    /// Accumulating raw code lines.
    Code,
    /// Sequence of bullet items sharing one bullet character.
    BulletList,
    /// Sequence of ordered items sharing one delimiter.
    OrderedList,
}

/// Named line patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    ThematicBreak,
    Heading,
    IndentedCode,
    FencedCode,
    BlockQuote,
    BulletItem,
    OrderedItem,
    /// Ordered item allowed to interrupt a paragraph (must start at 1).
    OrderedItemOne,
    Blank,
    /// Any non-blank line opening a paragraph.
    Paragraph,
    /// Paragraph continuation line.
    Text,
    FenceClose,
    RawText,
}

const SECTION: &[Transition] = &[
    Transition::ThematicBreak,
    Transition::Heading,
    Transition::IndentedCode,
    Transition::FencedCode,
    Transition::BlockQuote,
    Transition::BulletItem,
    Transition::OrderedItem,
    Transition::Blank,
    Transition::Paragraph,
];

const PARAGRAPH: &[Transition] = &[
    Transition::ThematicBreak,
    Transition::Heading,
    Transition::FencedCode,
    Transition::BulletItem,
    Transition::OrderedItemOne,
    Transition::Blank,
    Transition::Text,
];

const CODE: &[Transition] = &[Transition::FenceClose, Transition::Blank, Transition::RawText];

// A thematic break made of bullet characters ends the list rather than
// opening an item.
const BULLET_LIST: &[Transition] = &[
    Transition::Blank,
    Transition::ThematicBreak,
    Transition::BulletItem,
];

const ORDERED_LIST: &[Transition] = &[Transition::Blank, Transition::OrderedItem];

/// Compiled grammar: state table plus pattern table.
pub struct Grammar {
    states: FxHashMap<State, &'static [Transition]>,
    patterns: FxHashMap<Transition, Regex>,
}

static GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::build);

impl Grammar {
    /// The shared grammar instance.
    pub fn get() -> &'static Grammar {
        &GRAMMAR
    }

    fn build() -> Self {
        let mut states = FxHashMap::default();
        states.insert(State::Section, SECTION);
        states.insert(State::ListItem, SECTION);
        states.insert(State::Paragraph, PARAGRAPH);
        states.insert(State::Code, CODE);
        states.insert(State::BulletList, BULLET_LIST);
        states.insert(State::OrderedList, ORDERED_LIST);

        let mut patterns = FxHashMap::default();
        for (transition, source) in [
            (
                Transition::ThematicBreak,
                r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$",
            ),
            (Transition::IndentedCode, r"^(?: {4}| {0,3}\t)(.*\S.*)$"),
            (Transition::FencedCode, r"^( {0,3})(`{3,}|~{3,})[ \t]*(.*)$"),
            (Transition::BlockQuote, r"^ {0,3}>"),
            (Transition::BulletItem, r"^( {0,3})([-+*])(?:([ \t]+)(.*))?$"),
            (Transition::Blank, r"^[ \t]*$"),
            (Transition::Paragraph, r"^[ \t]*(.+)$"),
            (Transition::Text, r"^[ \t]*(.*)$"),
            (Transition::FenceClose, r"^ {0,3}(`+|~+)[ \t]*$"),
            (Transition::RawText, r"^(.*)$"),
        ] {
            patterns.insert(transition, compile(source));
        }

        let heading = format!(r"^ {{0,3}}(#{{1,{MAX_HEADING_LEVEL}}})(?:[ \t]+(.*))?$");
        patterns.insert(Transition::Heading, compile(&heading));

        let ordered =
            format!(r"^( {{0,3}})([0-9]{{1,{MAX_LIST_MARKER_DIGITS}}})([.)])(?:([ \t]+)(.*))?$");
        patterns.insert(Transition::OrderedItem, compile(&ordered));
        patterns.insert(Transition::OrderedItemOne, compile(&ordered));

        Self { states, patterns }
    }

    /// Transitions of a state, in the order they are tried.
    pub fn transitions(&self, state: State) -> &'static [Transition] {
        self.states.get(&state).copied().unwrap_or(&[])
    }

    /// Match a single named transition against a line.
    pub fn matches<'l>(&self, transition: Transition, line: &'l str) -> Option<Captures<'l>> {
        self.patterns.get(&transition)?.captures(line)
    }

    /// First transition of `state` whose pattern matches `line`.
    pub fn dispatch<'l>(&self, state: State, line: &'l str) -> Option<(Transition, Captures<'l>)> {
        self.transitions(state)
            .iter()
            .find_map(|&t| self.matches(t, line).map(|caps| (t, caps)))
    }
}

fn compile(source: &str) -> Regex {
    Regex::new(source).expect("block pattern compiles")
}

impl State {
    /// Transition tried when no pattern of the state matches. `None` ends
    /// the scope.
    pub fn fallback(self) -> Option<Transition> {
        match self {
            State::Section | State::ListItem => Some(Transition::Paragraph),
            State::Paragraph => Some(Transition::Text),
            State::Code => Some(Transition::RawText),
            State::BulletList | State::OrderedList => None,
        }
    }

    /// Paragraph lines may ignore the indentation of enclosing scopes.
    pub fn is_lazy(self) -> bool {
        self == State::Paragraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(state: State, line: &str) -> Option<Transition> {
        Grammar::get().dispatch(state, line).map(|(t, _)| t)
    }

    #[test]
    fn test_section_order() {
        assert_eq!(first(State::Section, "- - -"), Some(Transition::ThematicBreak));
        assert_eq!(first(State::Section, "- item"), Some(Transition::BulletItem));
        assert_eq!(first(State::Section, "## Title"), Some(Transition::Heading));
        assert_eq!(first(State::Section, "    code"), Some(Transition::IndentedCode));
        assert_eq!(first(State::Section, "```rust"), Some(Transition::FencedCode));
        assert_eq!(first(State::Section, "> quote"), Some(Transition::BlockQuote));
        assert_eq!(first(State::Section, "3) item"), Some(Transition::OrderedItem));
        assert_eq!(first(State::Section, "   "), Some(Transition::Blank));
        assert_eq!(first(State::Section, "text"), Some(Transition::Paragraph));
    }

    #[test]
    fn test_heading_needs_space_and_max_six() {
        assert_eq!(first(State::Section, "#Title"), Some(Transition::Paragraph));
        assert_eq!(first(State::Section, "####### x"), Some(Transition::Paragraph));
        assert_eq!(first(State::Section, "#"), Some(Transition::Heading));
    }

    #[test]
    fn test_paragraph_has_no_indented_code() {
        assert_eq!(first(State::Paragraph, "    more"), Some(Transition::Text));
        assert_eq!(first(State::Paragraph, "> quoted"), Some(Transition::Text));
    }

    #[test]
    fn test_code_state() {
        assert_eq!(first(State::Code, "```"), Some(Transition::FenceClose));
        assert_eq!(first(State::Code, "```rust"), Some(Transition::RawText));
        assert_eq!(first(State::Code, ""), Some(Transition::Blank));
    }

    #[test]
    fn test_list_container_has_no_fallback() {
        assert_eq!(first(State::BulletList, "text"), None);
        assert_eq!(State::BulletList.fallback(), None);
        assert_eq!(first(State::BulletList, "* * *"), Some(Transition::ThematicBreak));
    }

    #[test]
    fn test_thematic_break_rejects_mixed() {
        assert_eq!(first(State::Section, "-*-"), Some(Transition::Paragraph));
        assert_eq!(first(State::Section, "--"), Some(Transition::Paragraph));
    }

    #[test]
    fn test_only_paragraph_is_lazy() {
        assert!(State::Paragraph.is_lazy());
        assert!(!State::Section.is_lazy());
    }
}
