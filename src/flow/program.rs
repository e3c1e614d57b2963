//! The flow combinator algebra: `Flow<I, O>` and its constructors.
//!
//! A flow is a reusable continuation-passing task: each run takes an owned
//! input and a one-shot continuation receiving `Result<O, ExecutionError>`.
//! Sequencing composes types end to end; `from_transition`/`transition_to`
//! select the next flow from a runtime value, which is what decision
//! gateways, multi-step navigation, and recursive restarts compile into.

use std::cell::OnceCell;
use std::rc::{Rc, Weak};

use crate::error::ExecutionError;

use super::engine::Engine;
use super::step::Step;

pub(crate) type Continuation<O> = Box<dyn FnOnce(&Rc<Engine>, Result<O, ExecutionError>)>;
pub(crate) type RunFn<I, O> = dyn Fn(&Rc<Engine>, I, Continuation<O>);

/// A composable program from `I` to `O`. Cloning is cheap and shares the
/// underlying step; each run is independent.
pub struct Flow<I, O> {
    pub(crate) step: Rc<RunFn<I, O>>,
}

impl<I, O> std::fmt::Debug for Flow<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow").finish_non_exhaustive()
    }
}

impl<I, O> Clone for Flow<I, O> {
    fn clone(&self) -> Self {
        Flow {
            step: Rc::clone(&self.step),
        }
    }
}

impl<I: 'static, O: 'static> Flow<I, O> {
    pub(crate) fn from_run(run: impl Fn(&Rc<Engine>, I, Continuation<O>) + 'static) -> Self {
        Flow { step: Rc::new(run) }
    }

    pub(crate) fn run(&self, engine: &Rc<Engine>, input: I, done: Continuation<O>) {
        (self.step.as_ref())(engine, input, done);
    }

    /// A flow that applies a pure function.
    pub fn from_function(f: impl Fn(I) -> O + 'static) -> Self {
        Self::from_run(move |engine, input, done| done(engine, Ok(f(input))))
    }

    /// A flow that ignores its input and produces a fresh value per run.
    pub fn from_supplier(f: impl Fn() -> O + 'static) -> Self {
        Self::from_run(move |engine, _input, done| done(engine, Ok(f())))
    }

    /// A flow that ignores its input and yields a clone of `value`.
    pub fn constant(value: O) -> Self
    where
        O: Clone,
    {
        Self::from_run(move |engine, _input, done| done(engine, Ok(value.clone())))
    }

    /// A flow that fails every run with `error`. Used by transition selectors
    /// to surface runtime errors through the execution callback.
    pub fn fail(error: ExecutionError) -> Self {
        Self::from_run(move |engine, _input, done| done(engine, Err(error.clone())))
    }

    /// Lifts an interactive step. The step may complete synchronously or park
    /// its callback and fire it later; resumption re-enters through the
    /// engine queue.
    pub fn from_step(step: Rc<dyn Step<I, O>>) -> Self {
        Self::from_run(move |engine, input, done| {
            let resume = Rc::clone(engine);
            step.execute(
                input,
                Box::new(move |output| {
                    resume.submit(Box::new(move |engine| done(engine, Ok(output))));
                }),
            );
        })
    }

    /// A flow chosen from the input at run time, then run with that input.
    pub fn from_transition(select: impl Fn(&I) -> Flow<I, O> + 'static) -> Self {
        Self::from_run(move |engine, input, done| {
            let next = select(&input);
            engine.submit(Box::new(move |engine| next.run(engine, input, done)));
        })
    }

    /// Sequential composition: runs `self`, then feeds its output to `next`.
    pub fn and_then<P: 'static>(&self, next: &Flow<O, P>) -> Flow<I, P> {
        let first = self.clone();
        let second = next.clone();
        Flow::from_run(move |engine, input, done| {
            let second = second.clone();
            first.run(
                engine,
                input,
                Box::new(move |engine, result| match result {
                    Ok(mid) => second.run(engine, mid, done),
                    Err(e) => done(engine, Err(e)),
                }),
            );
        })
    }

    /// Dynamic continuation: runs `self`, selects the next flow from the
    /// output, and seeds it with that output.
    pub fn transition_to<P: 'static>(
        &self,
        select: impl Fn(&O) -> Flow<O, P> + 'static,
    ) -> Flow<I, P> {
        let first = self.clone();
        let select = Rc::new(select);
        Flow::from_run(move |engine, input, done| {
            let select = Rc::clone(&select);
            first.run(
                engine,
                input,
                Box::new(move |engine, result| match result {
                    Ok(out) => {
                        let next = select(&out);
                        engine.submit(Box::new(move |engine| next.run(engine, out, done)));
                    }
                    Err(e) => done(engine, Err(e)),
                }),
            );
        })
    }
}

impl<I: 'static> Flow<I, I> {
    /// The neutral flow: passes its input through unchanged.
    pub fn identity() -> Self {
        Self::from_run(|engine, input, done| done(engine, Ok(input)))
    }
}

/// One-shot forward reference to a flow that does not exist yet.
///
/// Back-edges to the diagram's start node compile into `cell.flow()` before
/// the top-level flow is finished; the compiler assigns the cell once and the
/// deferred flow resolves it lazily at run time. The cell holds a weak
/// reference so a compiled program does not keep itself alive through its own
/// restart edge.
pub struct FlowCell<I, O> {
    slot: Rc<OnceCell<Weak<RunFn<I, O>>>>,
}

impl<I: 'static, O: 'static> FlowCell<I, O> {
    pub fn new() -> Self {
        FlowCell {
            slot: Rc::new(OnceCell::new()),
        }
    }

    /// A flow that runs the cell's target, resolved at run time. Fails with
    /// `RecursionUnavailable` if the cell is unset or its target was dropped.
    pub fn flow(&self) -> Flow<I, O> {
        let slot = Rc::clone(&self.slot);
        Flow::from_run(move |engine, input, done| {
            match slot.get().and_then(Weak::upgrade) {
                Some(target) => (target.as_ref())(engine, input, done),
                None => done(engine, Err(ExecutionError::RecursionUnavailable)),
            }
        })
    }

    /// Assigns the target. Later assignments are ignored; the cell is one-shot.
    pub fn set(&self, flow: &Flow<I, O>) {
        let _ = self.slot.set(Rc::downgrade(&flow.step));
    }
}

impl<I: 'static, O: 'static> Default for FlowCell<I, O> {
    fn default() -> Self {
        Self::new()
    }
}
