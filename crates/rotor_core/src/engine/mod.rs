//! The generic parser engine.
//!
//! A stage-agnostic driver that runs *parser coroutines* over a buffered
//! input sequence.  Coroutines communicate with the engine through exactly
//! three commands (`Peek`, `Consume`, `Position`); everything richer —
//! backtracking choice, optional matches, lookahead, repetition — is built
//! from those three inside the coroutine by the combinators in [`combin`].
//!
//! - [`command`] — the command/reply protocol and the failure model.
//! - [`driver`] — the buffered [`Engine`] with its commit cycle.
//! - [`combin`] — the [`Ctx`] combinator vocabulary.

/// Commands, replies, and parse failures.
pub mod command;
/// Parser combinators over the command protocol.
pub mod combin;
/// The buffered coroutine driver.
pub mod driver;

pub use combin::{Ctx, Lexeme, ParseFuture};
pub use command::{Command, Failure, Reply, Severity};
pub use driver::{parser_coroutine, Engine, Outcome, ParserCoroutine};
