//! Transition dispatcher and nested scope driver.
//!
//! A scope is one invocation of a state over a contiguous run of lines.
//! [`Machine::run`] pushes the scope's indent, feeds it normalized lines
//! until a handler ends the scope, then runs the scope's end hook. Scopes
//! recurse into further scopes through the same call, so recursion depth
//! equals document nesting depth and is bounded by the configured limit.

use log::{debug, trace};
use regex::Captures;

use super::grammar::{Grammar, State, Transition};
use super::indent::{normalize_chain, Indent, Normalized};
use crate::cursor::Cursor;
use crate::error::{ParseError, Result};
use crate::limits::MAX_CORRECTIONS;

/// What a transition handler did with the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Line consumed; keep dispatching in this scope.
    Next,
    /// The handler ran a nested scope that moved the cursor itself.
    Entered,
    /// Line consumed and the scope is complete.
    Close,
    /// Retry the same line with another transition.
    Correct(Transition),
    /// Line not consumed; hand control back to the enclosing scope.
    EndOfScope,
}

/// One state of the block machine.
///
/// Construction is the beginning-of-scope hook; [`Scope::begin`] runs once
/// the scope is entered and [`Scope::finish`] when it ends.
pub trait Scope {
    type Output;

    fn state(&self) -> State;

    /// Containers count toward the nesting limit; leaf scopes do not.
    fn is_container(&self) -> bool {
        true
    }

    fn begin(&mut self, _machine: &mut Machine<'_>) {}

    fn apply(
        &mut self,
        machine: &mut Machine<'_>,
        transition: Transition,
        caps: &Captures<'_>,
        line: &str,
    ) -> Result<Outcome>;

    fn finish(self, machine: &mut Machine<'_>) -> Self::Output;
}

/// Replacement text for the line under the cursor, set by a scope that
/// already stripped its own marker from that line.
#[derive(Debug)]
struct FirstLine {
    offset: usize,
    depth: usize,
    text: String,
    column: usize,
}

/// Shared state of one parse: the line cursor plus the scope stack.
pub struct Machine<'a> {
    cursor: Cursor<'a>,
    indents: Vec<Indent>,
    first_line: Option<FirstLine>,
    /// Absolute column at which the line being dispatched starts.
    column: usize,
    /// Tight flag of every open list, innermost last.
    lists: Vec<bool>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Machine<'a> {
    pub fn new(lines: &'a [&'a str], max_depth: usize) -> Self {
        Self {
            cursor: Cursor::new(lines),
            indents: Vec::new(),
            first_line: None,
            column: 0,
            lists: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Whether every input line has been consumed.
    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    /// 1-based number of the line under the cursor.
    pub fn line_number(&self) -> usize {
        self.cursor.line_number()
    }

    /// Absolute column at which the line being dispatched starts, after
    /// every enclosing indent and marker was removed.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Run `scope` as a nested machine starting at the current line.
    ///
    /// `first_line`, when given, replaces the current line's text for this
    /// scope (the caller already removed a marker from it). It carries the
    /// text and the absolute column the text starts at.
    pub fn run<S: Scope>(
        &mut self,
        mut scope: S,
        indent: Indent,
        first_line: Option<(String, usize)>,
    ) -> Result<S::Output> {
        let container = scope.is_container();
        if container {
            if self.depth >= self.max_depth {
                return Err(ParseError::TooDeeplyNested {
                    line: self.cursor.line_number(),
                    limit: self.max_depth,
                });
            }
            self.depth += 1;
        }

        let state = scope.state();
        debug!("enter {state:?} at line {} (depth {})", self.line_number(), self.depth);

        self.indents.push(indent);
        if let Some((text, column)) = first_line {
            self.first_line = Some(FirstLine {
                offset: self.cursor.offset(),
                depth: self.indents.len(),
                text,
                column,
            });
        }

        scope.begin(self);
        let result = self.drive(&mut scope);

        if self
            .first_line
            .as_ref()
            .is_some_and(|first| first.depth == self.indents.len())
        {
            self.first_line = None;
        }
        self.indents.pop();
        if container {
            self.depth -= 1;
        }
        debug!("leave {state:?} at line {}", self.line_number());

        result?;
        Ok(scope.finish(self))
    }

    /// Consume the line under the cursor.
    pub fn consume(&mut self) {
        self.cursor.bump();
        if self
            .first_line
            .as_ref()
            .is_some_and(|first| first.offset < self.cursor.offset())
        {
            self.first_line = None;
        }
    }

    fn drive<S: Scope>(&mut self, scope: &mut S) -> Result<()> {
        let grammar = Grammar::get();
        let state = scope.state();

        while let Some((line, column)) = self.read_line(state.is_lazy()) {
            self.column = column;
            let mut current = grammar.dispatch(state, &line).or_else(|| {
                let fallback = state.fallback()?;
                grammar.matches(fallback, &line).map(|caps| (fallback, caps))
            });
            let mut corrections = 0;

            loop {
                let Some((transition, caps)) = current else {
                    trace!("{state:?}: no transition for line {}", self.line_number());
                    return Ok(());
                };
                trace!("{state:?}: line {} via {transition:?}", self.line_number());

                match scope.apply(self, transition, &caps, &line)? {
                    Outcome::Next => {
                        self.consume();
                        break;
                    }
                    Outcome::Entered => break,
                    Outcome::Close => {
                        self.consume();
                        return Ok(());
                    }
                    Outcome::EndOfScope => return Ok(()),
                    Outcome::Correct(next) => {
                        corrections += 1;
                        if corrections > MAX_CORRECTIONS {
                            debug!("{state:?}: correction limit hit at line {}", self.line_number());
                            return Ok(());
                        }
                        debug!("{state:?}: correct {transition:?} -> {next:?}");
                        current = grammar.matches(next, &line).map(|caps| (next, caps));
                    }
                }
            }
        }

        Ok(())
    }

    /// Current line normalized for the innermost scope with its starting
    /// column, or `None` at end of input or when the line falls outside the
    /// scope.
    fn read_line(&self, lazy: bool) -> Option<(String, usize)> {
        let raw = self.cursor.peek()?;

        if let Some(first) = &self.first_line {
            if first.offset == self.cursor.offset() {
                return Some((first.text.clone(), first.column));
            }
        }

        match normalize_chain(raw, &self.indents, lazy) {
            Normalized::Line { text, column } => Some((text.into_owned(), column)),
            Normalized::EndOfScope => None,
        }
    }

    /// Whether the line under the cursor is the marker line the innermost
    /// scope was opened with.
    pub fn on_first_line(&self) -> bool {
        self.first_line.as_ref().is_some_and(|first| {
            first.offset == self.cursor.offset() && first.depth == self.indents.len()
        })
    }

    /// Whether the line under the cursor only belongs to the innermost
    /// scope through lazy continuation.
    pub fn is_lazy_line(&self) -> bool {
        let Some(raw) = self.cursor.peek() else {
            return false;
        };
        if self
            .first_line
            .as_ref()
            .is_some_and(|first| first.offset == self.cursor.offset())
        {
            return false;
        }
        normalize_chain(raw, &self.indents, false) == Normalized::EndOfScope
    }

    /// Open tightness tracking for a new list.
    pub fn push_list(&mut self) {
        self.lists.push(true);
    }

    /// Close the innermost list, returning whether it stayed tight.
    pub fn pop_list(&mut self) -> bool {
        self.lists.pop().unwrap_or(true)
    }

    /// A blank line was seen by the innermost list or one of its items;
    /// the list is loose.
    pub fn note_blank(&mut self) {
        if let Some(tight) = self.lists.last_mut() {
            *tight = false;
        }
    }
}
