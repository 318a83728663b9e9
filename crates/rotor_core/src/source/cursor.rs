//! Cursors, spans, and positioned code points.

use std::fmt;
use std::rc::Rc;

use crate::source::SourceUrl;

// ─────────────────────────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────────────────────────

/// A 0-based position within a source text.
///
/// `position` counts code points (not bytes).  `column` resets to 0 after a
/// newline and `line` increments on U+000A only: at this layer line counting
/// is a display concern that mirrors the raw text, while the full ECMAScript
/// *LineTerminator* set is a token-level concern of the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Code-point offset from the beginning of the source.
    pub position: usize,
    /// 0-based column, in code points.
    pub column: u32,
    /// 0-based line.
    pub line: u32,
}

impl Cursor {
    /// The cursor at the start of a source.
    pub fn start() -> Self {
        Self::default()
    }

    /// The cursor after consuming `c` at this position.
    pub fn advanced(self, c: char) -> Self {
        if c == '\n' {
            Self {
                position: self.position + 1,
                column: 0,
                line: self.line + 1,
            }
        } else {
            Self {
                position: self.position + 1,
                column: self.column + 1,
                line: self.line,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Span
// ─────────────────────────────────────────────────────────────────────────────

/// A half-open `[begin, end)` range of [`Cursor`]s within one source.
///
/// The source URL rides along for diagnostics only: span equality compares
/// `begin` and `end` and ignores the URL.
#[derive(Debug, Clone)]
pub struct Span {
    /// Inclusive start of the span.
    pub begin: Cursor,
    /// Exclusive end of the span.
    pub end: Cursor,
    url: Rc<SourceUrl>,
}

impl Span {
    /// Create a span between two cursors.
    pub fn new(begin: Cursor, end: Cursor, url: Rc<SourceUrl>) -> Self {
        Self { begin, end, url }
    }

    /// An empty span at a single cursor.
    pub fn empty(at: Cursor, url: Rc<SourceUrl>) -> Self {
        Self::new(at, at, url)
    }

    /// The span covering both `a` and `b` (taking `a`'s URL).
    pub fn around(a: &Span, b: &Span) -> Span {
        Span {
            begin: a.begin,
            end: b.end,
            url: Rc::clone(&a.url),
        }
    }

    /// The source URL this span belongs to.
    pub fn url(&self) -> &SourceUrl {
        &self.url
    }

    /// Shared handle to the source URL.
    pub fn url_handle(&self) -> Rc<SourceUrl> {
        Rc::clone(&self.url)
    }

    /// Length in code points.
    pub fn len(&self) -> usize {
        self.end.position - self.begin.position
    }

    /// `true` when the span covers no code points.
    pub fn is_empty(&self) -> bool {
        self.begin.position == self.end.position
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.begin == other.begin && self.end == other.end
    }
}

impl Eq for Span {}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.url,
            self.begin.line + 1,
            self.begin.column + 1
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CodePoint
// ─────────────────────────────────────────────────────────────────────────────

/// A single Unicode scalar value annotated with its one-code-point [`Span`].
#[derive(Debug, Clone, PartialEq)]
pub struct CodePoint {
    /// The scalar value.
    pub value: char,
    /// Where it sits in the source.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Scheme;

    fn url() -> Rc<SourceUrl> {
        Rc::new(SourceUrl::new(Scheme::File, "/t.js"))
    }

    #[test]
    fn test_cursor_advance_plain() {
        let c = Cursor::start().advanced('a');
        assert_eq!(c.position, 1);
        assert_eq!(c.column, 1);
        assert_eq!(c.line, 0);
    }

    #[test]
    fn test_cursor_advance_newline() {
        let c = Cursor::start().advanced('a').advanced('\n').advanced('b');
        assert_eq!(c.position, 3);
        assert_eq!(c.column, 1);
        assert_eq!(c.line, 1);
    }

    #[test]
    fn test_carriage_return_is_not_a_line_break_here() {
        let c = Cursor::start().advanced('\r');
        assert_eq!(c.line, 0);
        assert_eq!(c.column, 1);
    }

    #[test]
    fn test_span_around() {
        let u = url();
        let a = Span::new(
            Cursor::start(),
            Cursor::start().advanced('x'),
            Rc::clone(&u),
        );
        let mid = a.end.advanced('y');
        let b = Span::new(a.end, mid, Rc::clone(&u));
        let all = Span::around(&a, &b);
        assert_eq!(all.begin, a.begin);
        assert_eq!(all.end, b.end);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_span_equality_ignores_url() {
        let a = Span::new(Cursor::start(), Cursor::start().advanced('x'), url());
        let b = Span::new(
            Cursor::start(),
            Cursor::start().advanced('x'),
            Rc::new(SourceUrl::new(Scheme::File, "/other.js")),
        );
        assert_eq!(a, b);
    }
}
