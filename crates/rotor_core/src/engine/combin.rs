//! Parser combinators over the three-command protocol.
//!
//! [`Ctx`] wraps a coroutine's yield handle and exposes the command
//! wrappers plus the combinator vocabulary (`maybe`, `fatal`, `look_ahead`,
//! `many`, `first`, `furthest`, kind-matching consumers).  Sub-parsers are
//! ordinary async functions over a shared `Ctx`; only the three commands
//! ever cross the engine boundary.

use genawaiter::rc::Co;
use std::future::Future;
use std::pin::Pin;

use crate::engine::command::{Command, Failure, Reply};
use crate::source::Span;

/// A boxed sub-parser future, used for choice lists and recursion.
pub type ParseFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Failure>> + 'a>>;

/// An input item with a matchable kind tag, a payload, and a span.
///
/// Implemented by [`Token`](crate::lexer::Token) so the syntactic stage can
/// use the kind-matching consumers; kind tags may be bitmasks, in which case
/// [`Lexeme::matches`] is an intersection test.
pub trait Lexeme {
    /// The kind tag.
    type Kind: Copy;

    /// This item's kind.
    fn kind(&self) -> Self::Kind;

    /// `true` when this item matches `kind` (bitmask-aware).
    fn matches(&self, kind: Self::Kind) -> bool;

    /// The matched source text.
    fn payload(&self) -> &str;

    /// The source location.
    fn span(&self) -> &Span;

    /// A human-readable name for `kind`, used in diagnostics.
    fn kind_name(kind: Self::Kind) -> String;
}

/// The combinator context handed to every parser coroutine.
pub struct Ctx<'co, I> {
    co: &'co Co<Command, Reply<I>>,
}

impl<'co, I: Clone> Ctx<'co, I> {
    /// Wrap a coroutine's yield handle.
    pub fn new(co: &'co Co<Command, Reply<I>>) -> Self {
        Self { co }
    }

    async fn command(&self, command: Command) -> Reply<I> {
        self.co.yield_(command).await
    }

    // ── Command wrappers ────────────────────────────────────────────────────

    /// The current input item, without advancing.
    pub async fn peek(&self) -> Result<I, Failure> {
        match self.command(Command::Peek).await {
            Reply::Item(item) => Ok(item),
            Reply::End => Err(Failure::end_of_input()),
            Reply::Cursor(_) => Err(Failure::internal("cursor reply to Peek")),
        }
    }

    /// The current input item, advancing past it.
    pub async fn consume(&self) -> Result<I, Failure> {
        match self.command(Command::Consume).await {
            Reply::Item(item) => Ok(item),
            Reply::End => Err(Failure::end_of_input()),
            Reply::Cursor(_) => Err(Failure::internal("cursor reply to Consume")),
        }
    }

    /// Like [`Ctx::peek`], but `None` at end of input.
    pub async fn try_peek(&self) -> Option<I> {
        match self.command(Command::Peek).await {
            Reply::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Like [`Ctx::consume`], but `None` at end of input.
    pub async fn try_consume(&self) -> Option<I> {
        match self.command(Command::Consume).await {
            Reply::Item(item) => Some(item),
            _ => None,
        }
    }

    /// The current cursor, an opaque value valid within this coroutine
    /// invocation only.
    pub async fn position(&self) -> usize {
        match self.command(Command::Position(None)).await {
            Reply::Cursor(cursor) => cursor,
            _ => unreachable!("non-cursor reply to Position"),
        }
    }

    /// Restore a previously observed cursor; returns the cursor that was
    /// current before the restore.
    pub async fn set_position(&self, cursor: usize) -> usize {
        match self.command(Command::Position(Some(cursor))).await {
            Reply::Cursor(previous) => previous,
            _ => unreachable!("non-cursor reply to Position"),
        }
    }

    // ── Combinators ─────────────────────────────────────────────────────────

    /// Run `parser`; on recoverable failure restore the cursor and yield
    /// `None`.  Fatal failures pass through.
    pub async fn maybe<T>(
        &self,
        parser: impl Future<Output = Result<T, Failure>>,
    ) -> Result<Option<T>, Failure> {
        let entry = self.position().await;
        match parser.await {
            Ok(value) => Ok(Some(value)),
            Err(failure) if failure.is_fatal() => Err(failure),
            Err(_) => {
                self.set_position(entry).await;
                Ok(None)
            }
        }
    }

    /// Run `parser`, upgrading any failure to fatal so enclosing
    /// `maybe`/`first`/`furthest` re-raise instead of backtracking.
    pub async fn fatal<T>(
        &self,
        parser: impl Future<Output = Result<T, Failure>>,
    ) -> Result<T, Failure> {
        parser.await.map_err(Failure::into_fatal)
    }

    /// Run `parser` and report its value together with the cursor it reached,
    /// without committing: the entry cursor is restored afterwards.
    pub async fn look_ahead<T>(
        &self,
        parser: impl Future<Output = Result<T, Failure>>,
    ) -> Result<(T, usize), Failure> {
        let entry = self.position().await;
        let value = parser.await?;
        let reached = self.position().await;
        self.set_position(entry).await;
        Ok((value, reached))
    }

    /// Repeatedly run parsers from `factory` until one fails recoverably;
    /// collect the successes.
    pub async fn many<T, Fut>(
        &self,
        mut factory: impl FnMut() -> Fut,
    ) -> Result<Vec<T>, Failure>
    where
        Fut: Future<Output = Result<T, Failure>>,
    {
        let mut items = Vec::new();
        while let Some(item) = self.maybe(factory()).await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Try each branch in order; commit to the first success.
    ///
    /// When every branch fails, report the failure from the branch that
    /// advanced the furthest before failing (ties: earliest branch).
    pub async fn first<T>(&self, branches: Vec<ParseFuture<'_, T>>) -> Result<T, Failure> {
        let entry = self.position().await;
        let mut best: Option<(usize, Failure)> = None;
        for branch in branches {
            match branch.await {
                Ok(value) => return Ok(value),
                Err(failure) if failure.is_fatal() => return Err(failure),
                Err(failure) => {
                    let reached = self.position().await;
                    if best.as_ref().map_or(true, |(r, _)| reached > *r) {
                        best = Some((reached, failure));
                    }
                    self.set_position(entry).await;
                }
            }
        }
        Err(best
            .map(|(_, failure)| failure)
            .unwrap_or_else(|| Failure::recoverable("no alternatives matched")))
    }

    /// Try *all* branches from the same start; commit to the successful
    /// branch that advanced the furthest (ties: earliest branch).
    ///
    /// When every branch fails, report the furthest failure, like
    /// [`Ctx::first`].
    pub async fn furthest<T>(&self, branches: Vec<ParseFuture<'_, T>>) -> Result<T, Failure> {
        let entry = self.position().await;
        let mut winner: Option<(usize, T)> = None;
        let mut best_failure: Option<(usize, Failure)> = None;
        for branch in branches {
            self.set_position(entry).await;
            match branch.await {
                Ok(value) => {
                    let reached = self.position().await;
                    if winner.as_ref().map_or(true, |(r, _)| reached > *r) {
                        winner = Some((reached, value));
                    }
                }
                Err(failure) if failure.is_fatal() => return Err(failure),
                Err(failure) => {
                    let reached = self.position().await;
                    if best_failure.as_ref().map_or(true, |(r, _)| reached > *r) {
                        best_failure = Some((reached, failure));
                    }
                }
            }
        }
        match winner {
            Some((reached, value)) => {
                self.set_position(reached).await;
                Ok(value)
            }
            None => {
                self.set_position(entry).await;
                Err(best_failure
                    .map(|(_, failure)| failure)
                    .unwrap_or_else(|| Failure::recoverable("no alternatives matched")))
            }
        }
    }

    /// Succeed immediately without consuming anything.
    pub async fn nothing(&self) -> Result<(), Failure> {
        Ok(())
    }
}

impl<'co, I: Clone + Lexeme> Ctx<'co, I> {
    /// Consume the current item if it matches `kind`; recoverable
    /// "expected X, got Y" otherwise.
    pub async fn consume_matching(&self, kind: I::Kind) -> Result<I, Failure> {
        let item = self.peek().await?;
        if item.matches(kind) {
            self.consume().await
        } else {
            Err(Failure::recoverable(format!(
                "expected {}, got `{}`",
                I::kind_name(kind),
                item.payload()
            ))
            .with_span(item.span().clone()))
        }
    }

    /// Consume the current item if it matches `kind` *and* its payload
    /// equals `payload`.
    pub async fn consume_exact(&self, kind: I::Kind, payload: &str) -> Result<I, Failure> {
        let item = self.peek().await?;
        if item.matches(kind) && item.payload() == payload {
            self.consume().await
        } else {
            Err(Failure::recoverable(format!(
                "expected `{}`, got `{}`",
                payload,
                item.payload()
            ))
            .with_span(item.span().clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::driver::{parser_coroutine, Engine, ParserCoroutine};

    /// Feed `input` in one batch, finish, and concatenate the outputs.
    fn drive<O>(mut engine: Engine<i64, O>, input: Vec<i64>) -> Result<Vec<O>, Failure> {
        let mut out = engine.feed(input)?;
        out.extend(engine.finish()?);
        Ok(out)
    }

    fn engine_with(
        factory: impl Fn() -> ParserCoroutine<i64, i64> + 'static,
    ) -> Engine<i64, i64> {
        Engine::new(factory)
    }

    #[test]
    fn test_maybe_restores_position_on_failure() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let before = cx.position().await;
                let missed = cx
                    .maybe(async {
                        cx.consume().await?;
                        cx.consume().await?;
                        Err::<(), _>(Failure::recoverable("nope"))
                    })
                    .await?;
                assert!(missed.is_none());
                assert_eq!(cx.position().await, before);
                Ok(Some(cx.consume().await?))
            })
        });
        assert_eq!(drive(engine, vec![1, 2, 3]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_fatal_bypasses_maybe() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                cx.maybe(cx.fatal(async { Err::<(), _>(Failure::recoverable("boom")) }))
                    .await?;
                Ok(Some(cx.consume().await?))
            })
        });
        let failure = drive(engine, vec![1]).unwrap_err();
        assert!(failure.is_fatal());
        assert_eq!(failure.message, "boom");
    }

    #[test]
    fn test_first_takes_earliest_success() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let value = cx
                    .first(vec![
                        Box::pin(async { Err(Failure::recoverable("a")) })
                            as ParseFuture<'_, i64>,
                        Box::pin(cx.consume()),
                        Box::pin(async { Ok(-1) }),
                    ])
                    .await?;
                Ok(Some(value))
            })
        });
        assert_eq!(drive(engine, vec![7, 8]).unwrap(), vec![7, 8]);
    }

    #[test]
    fn test_first_reports_furthest_failure() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let value = cx
                    .first(vec![
                        Box::pin(async {
                            cx.consume().await?;
                            Err::<i64, _>(Failure::recoverable("short"))
                        }) as ParseFuture<'_, i64>,
                        Box::pin(async {
                            cx.consume().await?;
                            cx.consume().await?;
                            Err::<i64, _>(Failure::recoverable("long"))
                        }),
                    ])
                    .await?;
                Ok(Some(value))
            })
        });
        let failure = drive(engine, vec![1, 2, 3]).unwrap_err();
        assert_eq!(failure.message, "long");
    }

    #[test]
    fn test_furthest_prefers_longest_match() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let value = cx
                    .furthest(vec![
                        Box::pin(async {
                            cx.consume().await?;
                            Ok(10i64)
                        }) as ParseFuture<'_, i64>,
                        Box::pin(async {
                            cx.consume().await?;
                            cx.consume().await?;
                            Ok(20i64)
                        }),
                    ])
                    .await?;
                Ok(Some(value))
            })
        });
        // The two-item branch wins, so both inputs are consumed by one commit.
        assert_eq!(drive(engine, vec![1, 2]).unwrap(), vec![20]);
    }

    #[test]
    fn test_furthest_tie_takes_earliest_branch() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let value = cx
                    .furthest(vec![
                        Box::pin(async {
                            cx.consume().await?;
                            Ok(10i64)
                        }) as ParseFuture<'_, i64>,
                        Box::pin(async {
                            cx.consume().await?;
                            Ok(20i64)
                        }),
                    ])
                    .await?;
                Ok(Some(value))
            })
        });
        assert_eq!(drive(engine, vec![1]).unwrap(), vec![10]);
    }

    #[test]
    fn test_many_collects_until_failure() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let fives = cx
                    .many(|| async {
                        let v = cx.peek().await?;
                        if v == 5 {
                            cx.consume().await
                        } else {
                            Err(Failure::recoverable("not five"))
                        }
                    })
                    .await?;
                // Drain the stopper so the commit makes progress.
                cx.try_consume().await;
                Ok(Some(fives.len() as i64))
            })
        });
        assert_eq!(drive(engine, vec![5, 5, 5, 9]).unwrap(), vec![3]);
    }

    #[test]
    fn test_nothing_succeeds_without_consuming() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let before = cx.position().await;
                cx.nothing().await?;
                assert_eq!(cx.position().await, before);
                Ok(Some(cx.consume().await?))
            })
        });
        assert_eq!(drive(engine, vec![2]).unwrap(), vec![2]);
    }

    #[test]
    fn test_look_ahead_does_not_commit() {
        let engine = engine_with(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let entry = cx.position().await;
                let (value, reached) = cx.look_ahead(cx.consume()).await?;
                assert_eq!(reached, entry + 1);
                assert_eq!(cx.position().await, entry);
                cx.consume().await?;
                Ok(Some(value))
            })
        });
        assert_eq!(drive(engine, vec![4]).unwrap(), vec![4]);
    }
}
