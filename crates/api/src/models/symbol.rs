use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in a source file. Lines and columns are 1-based.
///
/// Synthetic nodes that have no place in the source carry no position at all;
/// a zero line or column is treated the same way (see [`Position::is_valid`]).
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0 && self.column > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An inclusive source range.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub struct Range {
    pub begin: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    pub const fn from_coords(begin_line: u32, begin_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            begin: Position::new(begin_line, begin_col),
            end: Position::new(end_line, end_col),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.begin <= position && position <= self.end
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.contains(other.begin) && self.contains(other.end)
    }

    pub fn is_valid(&self) -> bool {
        self.begin.is_valid() && self.end.is_valid()
    }

    /// Rough size used to rank nested ranges: line span first, then columns.
    pub fn extent(&self) -> (u32, u32) {
        let lines = self.end.line.saturating_sub(self.begin.line);
        let columns = if lines == 0 {
            self.end.column.saturating_sub(self.begin.column)
        } else {
            self.end.column
        };
        (lines, columns)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}
