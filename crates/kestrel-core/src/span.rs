//! Source locations attached to call sites and diagnostics.

use std::fmt;

/// Position of a node in the original script.
///
/// Lowering never reads source text, so a span is only a start position plus
/// a byte length, carried through to diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// A zero-length span, used for synthesized nodes.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest span on `self`'s line covering both spans.
    ///
    /// Spans on different lines keep `self`'s start and sum the lengths.
    pub fn to(self, other: Span) -> Span {
        if self.line != other.line {
            return Span::new(self.line, self.col, self.len + other.len);
        }
        let start = self.col.min(other.col);
        let end = (self.col + self.len).max(other.col + other.len);
        Span::new(self.line, start, end - start)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_line_colon_col() {
        assert_eq!(Span::new(12, 4, 3).to_string(), "12:4");
        assert_eq!(format!("{:?}", Span::point(1, 1)), "1:1");
    }

    #[test]
    fn to_covers_both_on_same_line() {
        let callee = Span::new(3, 5, 3);
        let args = Span::new(3, 9, 6);
        assert_eq!(callee.to(args), Span::new(3, 5, 10));
        assert_eq!(args.to(callee), Span::new(3, 5, 10));
    }

    #[test]
    fn to_across_lines_keeps_start() {
        let merged = Span::new(1, 7, 2).to(Span::new(2, 1, 4));
        assert_eq!(merged.line, 1);
        assert_eq!(merged.col, 7);
        assert_eq!(merged.len, 6);
    }
}
