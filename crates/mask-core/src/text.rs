//! Logical positions and selections.
//!
//! Positions are zero-based `(line, column)` pairs where the column counts Unicode scalar
//! values (`char`) within the line. Hosts convert between positions and document character
//! offsets through [`MaskHost`](crate::MaskHost).

use std::cmp::Ordering;

/// Logical position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Selection direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDirection {
    /// Forward selection (anchor before the active end)
    Forward,
    /// Backward selection (anchor after the active end)
    Backward,
}

/// A caret or selection range in an editor.
///
/// `start` is the anchor and `end` the active end, so `end` may precede `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Selection anchor
    pub start: Position,
    /// Selection active end
    pub end: Position,
    /// Selection direction
    pub direction: SelectionDirection,
}

impl Selection {
    /// Create a selection from an anchor and an active end.
    pub fn new(start: Position, end: Position) -> Self {
        let direction = if start <= end {
            SelectionDirection::Forward
        } else {
            SelectionDirection::Backward
        };
        Self {
            start,
            end,
            direction,
        }
    }

    /// An empty selection (a plain caret) at `pos`.
    pub fn caret(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    /// Returns `true` if the selection is a plain caret.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The selection bounds ordered as `(min, max)`.
    pub fn min_max(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}
