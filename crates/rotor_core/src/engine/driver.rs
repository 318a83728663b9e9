//! The parser engine: a buffered, backtracking coroutine driver.
//!
//! An [`Engine`] owns a buffer of input items and a cursor into it.  Parsing
//! logic arrives as a *coroutine* (a [`genawaiter`] generator) that yields
//! [`Command`]s and resumes with [`Reply`]s.  The engine answers commands
//! against its buffer, suspends the coroutine when it demands input that has
//! not arrived yet, and *commits* each completed result by discarding the
//! consumed prefix of the buffer.
//!
//! Rewinds are safe within one coroutine invocation: every buffered item
//! between cursor 0 and the furthest cursor the coroutine has observed is
//! preserved until commit.  Across commits the cursor space is reset; a
//! coroutine must not attempt to restore a cursor from a previous
//! invocation.

use genawaiter::rc::{Co, Gen};
use genawaiter::GeneratorState;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;

use crate::engine::command::{Command, Failure, Reply};

/// What a parser coroutine resolves to.
///
/// `Ok(Some(out))` emits one output and commits.  `Ok(None)` commits without
/// emitting — the coroutine consumed trailing input (e.g. whitespace before
/// end of stream) and the stage is finished.  Either way the coroutine must
/// have consumed at least one item; completing at cursor 0 is an engine
/// invariant violation, since such a parser would loop forever.
pub type Outcome<O> = Result<Option<O>, Failure>;

type BoxedParse<O> = Pin<Box<dyn Future<Output = Outcome<O>>>>;

/// A suspended parser computation driven by the [`Engine`].
pub type ParserCoroutine<I, O> = Gen<Command, Reply<I>, BoxedParse<O>>;

/// Wrap an async block into a [`ParserCoroutine`].
///
/// The body receives the yield handle; wrap it in a
/// [`Ctx`](crate::engine::Ctx) to get the combinator API.
pub fn parser_coroutine<I, O, F, Fut>(body: F) -> ParserCoroutine<I, O>
where
    F: FnOnce(Co<Command, Reply<I>>) -> Fut,
    Fut: Future<Output = Outcome<O>> + 'static,
{
    Gen::new(move |co| Box::pin(body(co)) as BoxedParse<O>)
}

struct Running<I, O> {
    coroutine: ParserCoroutine<I, O>,
    /// The command the coroutine is currently suspended on.
    pending: Command,
}

/// The stage-agnostic parser engine.
///
/// Parameterised by input item `I` and output item `O`; the same driver runs
/// the lexical stage (`I = CodePoint`, `O = Token`) and the syntactic stage
/// (`I = Token`, `O = Stmt`).  Feed input batches with [`Engine::feed`],
/// terminate with [`Engine::finish`]; both pump the coroutine as far as the
/// buffered input allows and return the outputs produced along the way.
///
/// Dropping the engine cancels the stage: buffers and any in-flight
/// coroutine are released and nothing further is emitted.
pub struct Engine<I, O> {
    factory: Box<dyn FnMut() -> ParserCoroutine<I, O>>,
    buffer: VecDeque<I>,
    cursor: usize,
    running: Option<Running<I, O>>,
    at_end: bool,
    done: bool,
}

impl<I: Clone, O> Engine<I, O> {
    /// Create an engine that starts a fresh coroutine from `factory` for
    /// each output item.
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut() -> ParserCoroutine<I, O> + 'static,
    {
        Self {
            factory: Box::new(factory),
            buffer: VecDeque::new(),
            cursor: 0,
            running: None,
            at_end: false,
            done: false,
        }
    }

    /// Append one input batch and pump.  Returns the outputs completed by
    /// this batch, in production order.
    pub fn feed(&mut self, batch: impl IntoIterator<Item = I>) -> Result<Vec<O>, Failure> {
        self.buffer.extend(batch);
        let mut out = Vec::new();
        self.pump(&mut out)?;
        Ok(out)
    }

    /// Mark end of input and pump to completion.
    ///
    /// Fails with the residual-input diagnostic if the stage declared itself
    /// finished while unconsumed items remain.
    pub fn finish(&mut self) -> Result<Vec<O>, Failure> {
        self.at_end = true;
        let mut out = Vec::new();
        self.pump(&mut out)?;
        if self.done && !self.buffer.is_empty() {
            return Err(Failure::fatal("input remainder could not be parsed"));
        }
        Ok(out)
    }

    /// `true` once the stage has returned its no-more-output outcome.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Drive the coroutine until it blocks on missing input or the buffer
    /// has been fully parsed.
    fn pump(&mut self, out: &mut Vec<O>) -> Result<(), Failure> {
        loop {
            if self.running.is_none() {
                if self.done || self.cursor >= self.buffer.len() {
                    return Ok(());
                }
                let mut coroutine = (self.factory)();
                // The argument of the first resume is discarded; it only
                // starts the coroutine.
                match coroutine.resume_with(Reply::Cursor(0)) {
                    GeneratorState::Yielded(pending) => {
                        self.running = Some(Running { coroutine, pending });
                    }
                    GeneratorState::Complete(outcome) => {
                        self.commit(outcome, out)?;
                        continue;
                    }
                }
            }

            let pending = self
                .running
                .as_ref()
                .map(|r| r.pending)
                .expect("running coroutine");
            let reply = match pending {
                Command::Peek | Command::Consume => {
                    if self.cursor < self.buffer.len() {
                        let item = self.buffer[self.cursor].clone();
                        if pending == Command::Consume {
                            self.cursor += 1;
                        }
                        Reply::Item(item)
                    } else if self.at_end {
                        Reply::End
                    } else {
                        // Wait for the next feed.
                        return Ok(());
                    }
                }
                Command::Position(None) => Reply::Cursor(self.cursor),
                Command::Position(Some(new)) => {
                    if new > self.buffer.len() {
                        return Err(Failure::internal(format!(
                            "cursor {new} restored past buffer tip {}",
                            self.buffer.len()
                        )));
                    }
                    let previous = self.cursor;
                    self.cursor = new;
                    Reply::Cursor(previous)
                }
            };

            let running = self.running.as_mut().expect("running coroutine");
            match running.coroutine.resume_with(reply) {
                GeneratorState::Yielded(next) => running.pending = next,
                GeneratorState::Complete(outcome) => {
                    self.running = None;
                    self.commit(outcome, out)?;
                }
            }
        }
    }

    /// Accept a coroutine's outcome: enforce progress, emit, and drop the
    /// consumed buffer prefix.
    fn commit(&mut self, outcome: Outcome<O>, out: &mut Vec<O>) -> Result<(), Failure> {
        match outcome {
            Ok(produced) => {
                if self.cursor == 0 {
                    return Err(Failure::internal(
                        "parser completed without consuming input",
                    ));
                }
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
                match produced {
                    Some(o) => out.push(o),
                    None => self.done = true,
                }
                Ok(())
            }
            Err(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Ctx;

    /// A coroutine that consumes two integers and emits their sum.
    fn pair_summer() -> Engine<i64, i64> {
        Engine::new(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let a = cx.consume().await?;
                let b = cx.consume().await?;
                Ok(Some(a + b))
            })
        })
    }

    #[test]
    fn test_consumes_in_pairs() {
        let mut engine = pair_summer();
        assert_eq!(engine.feed([1, 2, 3, 4]).unwrap(), vec![3, 7]);
    }

    #[test]
    fn test_suspends_across_batches() {
        let mut engine = pair_summer();
        assert_eq!(engine.feed([1]).unwrap(), vec![]);
        assert_eq!(engine.feed([2, 3]).unwrap(), vec![3]);
        assert_eq!(engine.feed([4]).unwrap(), vec![7]);
        assert_eq!(engine.finish().unwrap(), vec![]);
    }

    #[test]
    fn test_end_of_input_mid_coroutine_is_reported() {
        let mut engine = pair_summer();
        engine.feed([1]).unwrap();
        let err = engine.finish().unwrap_err();
        assert!(err.at_end, "expected an end-of-input failure: {err:?}");
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut engine: Engine<i64, i64> = Engine::new(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let first = cx.peek().await?;
                let again = cx.peek().await?;
                assert_eq!(first, again);
                cx.consume().await?;
                Ok(Some(first))
            })
        });
        assert_eq!(engine.feed([9]).unwrap(), vec![9]);
    }

    #[test]
    fn test_rewind_within_invocation() {
        let mut engine: Engine<i64, i64> = Engine::new(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let entry = cx.position().await;
                let a = cx.consume().await?;
                let b = cx.consume().await?;
                cx.set_position(entry).await;
                let a2 = cx.consume().await?;
                assert_eq!(a, a2);
                cx.consume().await?;
                Ok(Some(a + b))
            })
        });
        assert_eq!(engine.feed([5, 6]).unwrap(), vec![11]);
    }

    #[test]
    fn test_commit_without_progress_is_internal_error() {
        let mut engine: Engine<i64, i64> = Engine::new(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                let v = cx.peek().await?;
                Ok(Some(v))
            })
        });
        let err = engine.feed([1]).unwrap_err();
        assert!(err.internal);
    }

    #[test]
    fn test_done_with_remainder_is_error() {
        let mut engine: Engine<i64, i64> = Engine::new(|| {
            parser_coroutine(|co| async move {
                let cx = Ctx::new(&co);
                cx.consume().await?;
                Ok(None)
            })
        });
        engine.feed([1, 2, 3]).unwrap();
        assert!(engine.finish().is_err());
    }

    #[test]
    fn test_empty_stream_finishes_clean() {
        let mut engine = pair_summer();
        assert_eq!(engine.finish().unwrap(), vec![]);
    }
}
