//! Flow combinator algebra and its single-threaded execution engine.
//!
//! `Flow<I, O>` is a continuation-passing task built from a handful of
//! combinators: sequencing (`and_then`), constants and functions, and
//! runtime-selected continuations (`from_transition` / `transition_to`).
//! The graph compiler emits `Flow<Value, Value>`; hosts run the result with
//! [`execute`].

mod command;
mod engine;
mod program;
mod step;
mod value;

pub use command::{Command, EnumConstant, FormOperation};
pub use engine::execute;
pub use program::{Flow, FlowCell};
pub use step::Step;
pub use value::Value;

pub(crate) use engine::Engine;
