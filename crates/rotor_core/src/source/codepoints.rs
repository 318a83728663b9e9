//! The code-point stream: text fragments in, positioned code points out.

use std::rc::Rc;

use crate::source::{CodePoint, Cursor, SourceUrl, Span};

/// Converts decoded text fragments into batches of [`CodePoint`]s.
///
/// One batch is emitted per input fragment; the cursor advances by one
/// position per code point, with line/column bookkeeping per
/// [`Cursor::advanced`].
#[derive(Debug)]
pub struct CodePointStream {
    url: Rc<SourceUrl>,
    cursor: Cursor,
}

impl CodePointStream {
    /// Create a stream positioned at the start of the given source.
    pub fn new(url: Rc<SourceUrl>) -> Self {
        Self {
            url,
            cursor: Cursor::start(),
        }
    }

    /// Convert one text fragment into a batch of code points.
    pub fn push(&mut self, fragment: &str) -> Vec<CodePoint> {
        let mut batch = Vec::with_capacity(fragment.chars().count());
        for c in fragment.chars() {
            let begin = self.cursor;
            self.cursor = begin.advanced(c);
            batch.push(CodePoint {
                value: c,
                span: Span::new(begin, self.cursor, Rc::clone(&self.url)),
            });
        }
        batch
    }

    /// The cursor just past everything pushed so far.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The source URL this stream reads from.
    pub fn url(&self) -> Rc<SourceUrl> {
        Rc::clone(&self.url)
    }
}
