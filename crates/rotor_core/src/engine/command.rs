//! The engine ⇄ coroutine protocol: commands, replies, and failures.

use crate::source::Span;

// ─────────────────────────────────────────────────────────────────────────────
// Command / Reply
// ─────────────────────────────────────────────────────────────────────────────

/// A request a parser coroutine yields to the engine.
///
/// This three-command set is the *entire* surface between parsers and the
/// I/O model; everything else (choice, backtracking, lookahead) is built on
/// top of it inside the coroutine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Report the current input item without advancing the cursor.
    Peek,
    /// Report the current input item and advance the cursor by 1.
    Consume,
    /// Report the current cursor, optionally setting a new one first
    /// (the reply carries the *previous* cursor value).
    Position(Option<usize>),
}

/// The engine's answer to a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<I> {
    /// The input item a `Peek` or `Consume` asked for.
    Item(I),
    /// No item: the input has terminally ended.
    End,
    /// The cursor value a `Position` asked for.
    Cursor(usize),
}

// ─────────────────────────────────────────────────────────────────────────────
// Failure
// ─────────────────────────────────────────────────────────────────────────────

/// How a parse failure interacts with enclosing combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caught by `maybe`/`first`/`furthest`, which restore the cursor.
    Recoverable,
    /// Re-raised through every combinator; terminates the stream.
    Fatal,
}

/// A parse failure raised inside a coroutine.
///
/// Recoverable failures never escape to the consumer unless no choice
/// branch succeeds, in which case the furthest one becomes the diagnostic
/// of record.  Fatal failures (and engine-invariant violations) terminate
/// the pipeline as soon as they surface.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Whether enclosing combinators may catch this failure.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// The offending span, when one is known.
    pub span: Option<Span>,
    /// `true` when the failure was caused by running out of input.
    pub at_end: bool,
    /// `true` for engine-invariant violations (bugs, not bad input).
    pub internal: bool,
}

impl Failure {
    /// A recoverable failure.
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Recoverable,
            message: message.into(),
            span: None,
            at_end: false,
            internal: false,
        }
    }

    /// A fatal failure.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            ..Self::recoverable(message)
        }
    }

    /// The recoverable failure raised when input ends under a demand.
    pub fn end_of_input() -> Self {
        Self {
            at_end: true,
            ..Self::recoverable("unexpected end of input")
        }
    }

    /// An engine-invariant violation.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            internal: true,
            ..Self::fatal(message)
        }
    }

    /// Attach the offending span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Upgrade to fatal, keeping everything else.
    pub fn into_fatal(mut self) -> Self {
        self.severity = Severity::Fatal;
        self
    }

    /// Replace the message, keeping span and severity.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// `true` when enclosing combinators must re-raise this failure.
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}
