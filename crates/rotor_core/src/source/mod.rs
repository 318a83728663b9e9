//! Source plumbing: URLs, cursors, spans, decoding, and the code-point
//! stream.
//!
//! - [`url`] — [`SourceUrl`] resolution and `data:` URL handling.
//! - [`cursor`] — [`Cursor`], [`Span`], and [`CodePoint`].
//! - [`decode`] — incremental UTF-8 decoding of byte chunks.
//! - [`codepoints`] — the [`CodePointStream`] transform, the first
//!   parsing layer of the pipeline.

/// The code-point stream transform.
pub mod codepoints;
/// Cursor, span, and code-point types.
pub mod cursor;
/// Incremental UTF-8 decoding.
pub mod decode;
/// Source URL resolution.
pub mod url;

pub use codepoints::CodePointStream;
pub use cursor::{CodePoint, Cursor, Span};
pub use decode::Utf8Decoder;
pub use url::{Scheme, SourceUrl};
