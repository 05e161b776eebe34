use std::fmt;

use serde::Serialize;

/// Location of a token in its source.
///
/// `offset` is a byte offset; `line` and `column` are 1-based, with columns
/// counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Incrementally converts byte offsets into [`Position`]s.
///
/// Offsets passed to [`LineTracker::advance_to`] must be non-decreasing and
/// fall on character boundaries.
#[derive(Debug, Clone)]
pub struct LineTracker<'s> {
    source: &'s str,
    current: Position,
}

impl<'s> LineTracker<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            current: Position::START,
        }
    }

    pub fn advance_to(&mut self, offset: usize) -> Position {
        debug_assert!(offset >= self.current.offset, "offsets must not go backwards");
        let skipped = &self.source[self.current.offset..offset];
        for c in skipped.chars() {
            if c == '\n' {
                self.current.line += 1;
                self.current.column = 1;
            } else {
                self.current.column += 1;
            }
        }
        self.current.offset = offset;
        self.current
    }
}
