//! Error types for the rotor front-end.

use thiserror::Error;

/// All errors that can terminate a rotor parse stream.
///
/// Line and column are 1-based for display; the internal [`Cursor`]
/// representation stays 0-based.
///
/// [`Cursor`]: crate::source::Cursor
#[derive(Debug, Error)]
pub enum RotorError {
    /// A syntax error in the source text, lexical or grammatical.
    #[error("{url}:{line}:{column}: {message}")]
    Syntax {
        /// The source URL the diagnostic refers to.
        url: String,
        /// 1-based line of the offending token's beginning.
        line: u32,
        /// 1-based column of the offending token's beginning.
        column: u32,
        /// Human-readable description.
        message: String,
    },

    /// The input ended inside a committed production.
    #[error("{url}:{line}:{column}: unexpected end of input")]
    UnexpectedEndOfInput {
        /// The source URL the diagnostic refers to.
        url: String,
        /// 1-based line of the end of input.
        line: u32,
        /// 1-based column of the end of input.
        column: u32,
    },

    /// The source bytes were not valid UTF-8.
    #[error("{url}: invalid UTF-8 in source text")]
    Decode {
        /// The source URL the diagnostic refers to.
        url: String,
    },

    /// A user-supplied source string could not be resolved to a URL.
    #[error("cannot resolve source `{0}`")]
    UnresolvableSource(String),

    /// An internal engine invariant was violated.  This is a bug in rotor,
    /// not in the input.
    #[error("internal error: {0}")]
    Internal(String),

    /// An I/O error while fetching source bytes.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenient `Result` alias for fallible front-end operations.
pub type RotorResult<T> = Result<T, RotorError>;
