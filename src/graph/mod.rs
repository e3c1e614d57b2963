//! Diagram model: typed nodes, sequence and containment edges.
//!
//! The designer produces one of these graphs; the compiler walks it
//! read-only. Build with `add_node` / `sequence` / `containment`.

mod content;
mod flow_graph;

pub use content::{EdgeKind, EntityStep, Matcher, NodeContent};
pub use flow_graph::{Edge, FlowGraph, NodeId};
