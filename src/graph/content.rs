//! Typed node contents and edge kinds of a designer diagram.

use serde::{Deserialize, Serialize};

/// Name and optional entity type carried by step-like nodes.
///
/// The pair forms the flow-part lookup key: `name`, or `name:entityType` when
/// the type is present and non-empty. For form steps, `name` is instead the
/// bound property on the composite model and `entity_type` names the form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStep {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

impl EntityStep {
    pub fn named(name: impl Into<String>) -> Self {
        EntityStep {
            name: name.into(),
            entity_type: None,
        }
    }

    pub fn typed(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        EntityStep {
            name: name.into(),
            entity_type: Some(entity_type.into()),
        }
    }
}

/// Matcher data: the guarded enum constant name plus its enum's simple type
/// name, both recorded as strings by the designer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    pub operation: String,
    pub enum_type: String,
}

impl Matcher {
    pub fn new(operation: impl Into<String>, enum_type: impl Into<String>) -> Self {
        Matcher {
            operation: operation.into(),
            enum_type: enum_type.into(),
        }
    }
}

/// Closed sum over the eight node kinds a diagram may contain. The compiler
/// matches this exhaustively; kinds it cannot legally reach in sequence
/// position fail compilation with `UnexpectedNodeType`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeContent {
    Start,
    RootStep(EntityStep),
    DataStep(EntityStep),
    FormStep(EntityStep),
    MultiStep,
    DecisionGateway,
    JoinGateway,
    MatcherStep(Matcher),
}

impl NodeContent {
    /// Short lowercase kind name for diagnostics and logging.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeContent::Start => "start",
            NodeContent::RootStep(_) => "root step",
            NodeContent::DataStep(_) => "data step",
            NodeContent::FormStep(_) => "form step",
            NodeContent::MultiStep => "multi step",
            NodeContent::DecisionGateway => "decision gateway",
            NodeContent::JoinGateway => "join gateway",
            NodeContent::MatcherStep(_) => "matcher step",
        }
    }
}

/// Relationship an edge expresses between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Control flow: the target happens after the source.
    Sequence,
    /// Structure: the target is nested inside the source.
    Containment,
}
