//! Byte-offset source spans.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in a source file.
///
/// Node identity in retype is positional: two nodes denote the same construct
/// exactly when they cover the same span of the same snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Span {
        debug_assert!(start <= end);
        Span { start, end }
    }

    /// A zero-width span at `pos` (caret positions from editors).
    pub fn empty(pos: u32) -> Span {
        Span {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` falls inside this span (end-exclusive).
    pub fn contains_pos(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether `pos` touches this span, including its end position.
    /// Matches editor caret semantics where a caret at the end of a
    /// token still refers to that token.
    pub fn intersects_pos(&self, pos: u32) -> bool {
        pos >= self.start && pos <= self.end
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }
}
