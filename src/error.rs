//! Runtime execution errors.
//!
//! Surfaced through the execution callback as `Err`; each one is fatal to the
//! single run that hit it. They are defensive checks — a host that only
//! offers legal operations through its components never sees them.

use thiserror::Error;

use crate::flow::EnumConstant;

/// Error during execution of a compiled flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// A decision flow received an operation no branch is mapped to.
    #[error("received operation {0} but no mapping was provided")]
    UnmappedOperation(EnumConstant),

    /// A multi-step form received a command that is not a form operation.
    #[error("unrecognized form operation {0}")]
    UnrecognizedOperation(EnumConstant),

    /// A branching point expected a command value but got something else.
    #[error("expected a command at a branching point")]
    ExpectedCommand,

    /// PREVIOUS issued on the first step of a multi-step form.
    #[error("cannot go to previous on initial step")]
    PreviousOnInitialStep,

    /// NEXT issued on the last step of a multi-step form.
    #[error("cannot go to next on terminal step")]
    NextOnTerminalStep,

    /// SUBMIT issued before the last step of a multi-step form.
    #[error("cannot submit before terminal step")]
    SubmitBeforeTerminalStep,

    /// A recursive restart edge resolved to a flow that is unset or dropped.
    #[error("recursive flow target is no longer available")]
    RecursionUnavailable,
}
