//! Stage composition: source bytes in, syntax-tree nodes out.
//!
//! The pipeline chains *bytes → text fragments → code points → tokens →
//! statements*, with one [`Engine`](crate::engine::Engine) instance per
//! parsing stage, each with its own buffer and cursor.  Everything is
//! single-threaded and demand-driven: [`Pipeline::feed`] pushes one byte
//! chunk through every stage and returns the statements that completed.
//!
//! Dropping a pipeline cancels it: buffers and in-flight coroutines are
//! released and no further output is produced.

use std::rc::Rc;

use crate::engine::{Engine, Failure};
use crate::error::{RotorError, RotorResult};
use crate::lexer::{tokenizer, Token};
use crate::source::{CodePoint, CodePointStream, SourceUrl, Utf8Decoder};
use crate::syntax::{parser, Stmt};

/// Convert a stage failure into a user-facing diagnostic.
///
/// Failures carry the offending span when one is known; end-of-input
/// failures fall back to `fallback`, the cursor just past the last code
/// point seen.
fn diagnose(url: &SourceUrl, fallback: crate::source::Cursor, failure: Failure) -> RotorError {
    if failure.internal {
        return RotorError::Internal(failure.message);
    }
    let (line, column) = match &failure.span {
        Some(span) => (span.begin.line, span.begin.column),
        None => (fallback.line, fallback.column),
    };
    if failure.at_end && failure.message == "unexpected end of input" {
        RotorError::UnexpectedEndOfInput {
            url: url.to_string(),
            line: line + 1,
            column: column + 1,
        }
    } else {
        RotorError::Syntax {
            url: url.to_string(),
            line: line + 1,
            column: column + 1,
            message: failure.message,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenStream
// ─────────────────────────────────────────────────────────────────────────────

/// The lexical half of the pipeline: bytes in, [`Token`]s out.
pub struct TokenStream {
    url: Rc<SourceUrl>,
    decoder: Utf8Decoder,
    codepoints: CodePointStream,
    lexer: Engine<CodePoint, Token>,
}

impl TokenStream {
    /// Create a token stream for the given source.
    pub fn new(url: SourceUrl) -> Self {
        let url = Rc::new(url);
        Self {
            decoder: Utf8Decoder::new(Rc::clone(&url)),
            codepoints: CodePointStream::new(Rc::clone(&url)),
            lexer: tokenizer(),
            url,
        }
    }

    /// Push one byte chunk through decode, code points, and the lexer.
    pub fn feed(&mut self, bytes: &[u8]) -> RotorResult<Vec<Token>> {
        let text = self.decoder.push(bytes)?;
        let batch = self.codepoints.push(&text);
        self.lexer
            .feed(batch)
            .map_err(|f| self.diagnose(f))
    }

    /// Mark end of input and drain the lexer.
    pub fn finish(&mut self) -> RotorResult<Vec<Token>> {
        self.decoder.finish()?;
        self.lexer.finish().map_err(|f| self.diagnose(f))
    }

    /// The cursor just past everything decoded so far.
    pub fn cursor(&self) -> crate::source::Cursor {
        self.codepoints.cursor()
    }

    /// The source URL this stream reads.
    pub fn url(&self) -> &SourceUrl {
        &self.url
    }

    fn diagnose(&self, failure: Failure) -> RotorError {
        diagnose(&self.url, self.codepoints.cursor(), failure)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// The full front-end pipeline: bytes in, [`Stmt`]s out.
pub struct Pipeline {
    tokens: TokenStream,
    syntax: Engine<Token, Stmt>,
}

impl Pipeline {
    /// Create a pipeline for the given source.
    pub fn new(url: SourceUrl) -> Self {
        Self {
            tokens: TokenStream::new(url),
            syntax: parser(),
        }
    }

    /// Push one byte chunk through every stage; returns the statements
    /// completed by this chunk, in source order.
    pub fn feed(&mut self, bytes: &[u8]) -> RotorResult<Vec<Stmt>> {
        let tokens = self.tokens.feed(bytes)?;
        self.syntax
            .feed(tokens)
            .map_err(|f| self.diagnose(f))
    }

    /// Mark end of input and drain both stages.
    pub fn finish(&mut self) -> RotorResult<Vec<Stmt>> {
        let tail = self.tokens.finish()?;
        let mut out = self
            .syntax
            .feed(tail)
            .map_err(|f| self.diagnose(f))?;
        out.extend(
            self.syntax
                .finish()
                .map_err(|f| self.diagnose(f))?,
        );
        Ok(out)
    }

    /// The source URL this pipeline reads.
    pub fn url(&self) -> &SourceUrl {
        self.tokens.url()
    }

    fn diagnose(&self, failure: Failure) -> RotorError {
        diagnose(self.tokens.url(), self.tokens.cursor(), failure)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Lex a complete source text in one call.
pub fn lex_text(url: SourceUrl, source: &str) -> RotorResult<Vec<Token>> {
    let mut stream = TokenStream::new(url);
    let mut tokens = stream.feed(source.as_bytes())?;
    tokens.extend(stream.finish()?);
    Ok(tokens)
}

/// Parse a complete source text in one call.
pub fn parse_text(url: SourceUrl, source: &str) -> RotorResult<Vec<Stmt>> {
    let mut pipeline = Pipeline::new(url);
    let mut statements = pipeline.feed(source.as_bytes())?;
    statements.extend(pipeline.finish()?);
    Ok(statements)
}
