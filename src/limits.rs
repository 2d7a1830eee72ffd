//! DoS prevention constants.
//!
//! These limits keep pathological inputs from exhausting the call stack
//! or looping in the dispatcher.

/// Default maximum nesting depth for block scopes (sections, quotes, lists)
pub const MAX_BLOCK_NESTING: usize = 32;

/// Deepest heading level; longer `#` runs are paragraph text
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Maximum transition corrections applied to a single line
pub const MAX_CORRECTIONS: usize = 4;

/// Maximum backtick run that delimits a code span
pub const MAX_CODE_SPAN_BACKTICKS: usize = 2;

/// Maximum digits in ordered list marker (prevents big-integer parsing)
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Width of a tab stop when expanding leading indentation
pub const TAB_STOP: usize = 4;
