//! `rotor_core` — the streaming front-end of the rotor ahead-of-time
//! ECMAScript compiler.
//!
//! The front-end ingests source text from a named source and produces a
//! stream of syntax-tree nodes.  Input arrives as byte chunks and is
//! consumed incrementally; both parsing stages run on the same generic,
//! backtracking [`engine`](crate::engine), differing only in their item
//! types:
//!
//! ```text
//! bytes → text fragments → code points → tokens → statements
//! ```
//!
//! # Crate layout
//!
//! - [`error`] — Front-end error types and the [`RotorResult`] alias.
//! - [`source`] — Source URLs, cursors, spans, decoding, code points.
//! - [`engine`] — The generic parser engine and its combinators.
//! - [`lexer`] — The ECMAScript lexical stage.
//! - [`syntax`] — Syntax-tree nodes and the grammar.
//! - [`pipeline`] — Stage composition and one-call entry points.
//!
//! # Example
//!
//! ```
//! use rotor_core::pipeline::parse_text;
//! use rotor_core::source::SourceUrl;
//! use rotor_core::syntax::{Expr, Stmt};
//!
//! let url = SourceUrl::resolve("./hello.js").unwrap();
//! let statements = parse_text(url, "console.log(\"hi\")").unwrap();
//! assert_eq!(statements.len(), 1);
//! let Stmt::Expr(stmt) = &statements[0];
//! assert!(matches!(stmt.expression, Expr::Call(_)));
//! ```

/// Front-end error types and the [`RotorResult`] alias.
pub mod error;

/// The generic parser engine: command protocol, driver, combinators.
pub mod engine;

/// The ECMAScript lexical stage.
pub mod lexer;

/// Stage composition and one-call entry points.
pub mod pipeline;

/// Source URLs, cursors, spans, decoding, and the code-point stream.
pub mod source;

/// Syntax-tree nodes and the grammar.
pub mod syntax;

pub use error::{RotorError, RotorResult};
pub use pipeline::{lex_text, parse_text, Pipeline, TokenStream};
