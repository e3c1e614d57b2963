//! Single-threaded trampolined execution of compiled flows.
//!
//! One `Engine` is created per `execute` call. Combinators that pick their
//! continuation at runtime bounce through the engine's job queue instead of
//! calling inline, so recursive flows and long restart chains run in constant
//! native stack depth. Suspended steps resume by submitting a job from their
//! callback, which starts a fresh drain if none is in progress.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::ExecutionError;

use super::program::Flow;

pub(crate) type Job = Box<dyn FnOnce(&Rc<Engine>)>;

pub(crate) struct Engine {
    queue: RefCell<VecDeque<Job>>,
    draining: Cell<bool>,
}

impl Engine {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Engine {
            queue: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
        })
    }

    /// Enqueues a job and, unless a drain is already running further up the
    /// call stack, drains the queue to completion.
    pub(crate) fn submit(self: &Rc<Self>, job: Job) {
        self.queue.borrow_mut().push_back(job);
        if self.draining.get() {
            return;
        }
        self.draining.set(true);
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(job) => job(self),
                None => break,
            }
        }
        self.draining.set(false);
    }
}

/// Runs `flow` with `input`, invoking `on_done` exactly once with the result.
///
/// Completion may be synchronous (the callback fires before this returns) or
/// asynchronous (a suspended step fires it later from an external event).
/// Runtime failures are delivered through the same callback as `Err`.
pub fn execute<I, O, F>(input: I, flow: &Flow<I, O>, on_done: F)
where
    I: 'static,
    O: 'static,
    F: FnOnce(Result<O, ExecutionError>) + 'static,
{
    let engine = Engine::new();
    let flow = flow.clone();
    engine.submit(Box::new(move |engine| {
        flow.run(
            engine,
            input,
            Box::new(move |_engine, result| on_done(result)),
        );
    }));
}
