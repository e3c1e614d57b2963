//! Structural compile errors.
//!
//! Returned by `FlowCompiler::compile` when a diagram violates a structural
//! invariant. Every failure aborts compilation immediately; a partial flow is
//! never returned.

use thiserror::Error;

use crate::flow::EnumConstant;

/// Error when compiling a flow graph.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The graph does not contain exactly one start node.
    #[error("there must be exactly one start node but found {0}")]
    MultipleOrMissingStart(usize),

    /// A step that contributes a flow part has no name to look it up by.
    #[error("{0} must have a name")]
    MissingStepName(&'static str),

    /// No flow part is registered under the step's lookup key.
    #[error("no flow part in context for \"{0}\"")]
    MissingFlowPart(String),

    /// A form step has no entity type to resolve its component by.
    #[error("form step \"{0}\" has no entity type")]
    MissingEntityType(String),

    /// The form-step resolver knows no component for the entity type.
    #[error("no form step found for \"{0}\"")]
    UnresolvedFormStep(String),

    /// Edges violate a branching invariant: a stray sequence edge, a
    /// non-matcher decision target, a broken multi-step chain, or similar.
    #[error("malformed branching: {0}")]
    MalformedBranching(String),

    /// Two matchers under one decision gateway resolve to the same operation.
    #[error("multiple matchers under one decision gateway mapped to operation {0}")]
    DuplicateMatcherMapping(EnumConstant),

    /// A matcher names an enum type absent from the enum registry.
    #[error("unrecognized enum type \"{0}\"")]
    UnrecognizedEnumType(String),

    /// A matcher names a constant absent from its (known) enum type.
    #[error("enum type \"{enum_type}\" has no constant \"{constant}\"")]
    UnresolvedEnumConstant { enum_type: String, constant: String },

    /// A node kind appeared somewhere the traversal cannot legally reach it.
    #[error("unexpected node: {0}")]
    UnexpectedNodeType(String),

    /// A multi step with no form-step children.
    #[error("multi step must have at least one form step child")]
    EmptyMultiStep,
}
