//! Diagram container: nodes plus ordered edges.
//!
//! Built with `add_node` / `sequence` / `containment`, then handed read-only
//! to the compiler. Out-edge order per node is insertion order; decision
//! gateways rely on it for branch ordering.

use serde::{Deserialize, Serialize};

use super::content::{EdgeKind, NodeContent};

/// Handle to a node in the graph that created it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(usize);

/// A directed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct NodeData {
    content: NodeContent,
    out_edges: Vec<usize>,
    in_edges: Vec<usize>,
}

/// A designer diagram: typed nodes connected by sequence and containment
/// edges. Node ids are only valid for the graph that issued them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    nodes: Vec<NodeData>,
    edges: Vec<Edge>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its handle.
    pub fn add_node(&mut self, content: NodeContent) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            content,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        });
        id
    }

    /// Adds a sequence ("happens after") edge.
    pub fn sequence(&mut self, from: NodeId, to: NodeId) -> &mut Self {
        self.add_edge(EdgeKind::Sequence, from, to);
        self
    }

    /// Adds a containment ("nested inside") edge.
    pub fn containment(&mut self, parent: NodeId, child: NodeId) -> &mut Self {
        self.add_edge(EdgeKind::Containment, parent, child);
        self
    }

    fn add_edge(&mut self, kind: EdgeKind, source: NodeId, target: NodeId) {
        let index = self.edges.len();
        self.edges.push(Edge {
            kind,
            source,
            target,
        });
        self.nodes[source.0].out_edges.push(index);
        self.nodes[target.0].in_edges.push(index);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn content(&self, id: NodeId) -> &NodeContent {
        &self.nodes[id.0].content
    }

    /// Outgoing edges of `id` in insertion order.
    pub fn out_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.nodes[id.0].out_edges.iter().map(|&e| &self.edges[e])
    }

    /// Incoming edges of `id` in insertion order.
    pub fn in_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.nodes[id.0].in_edges.iter().map(|&e| &self.edges[e])
    }

    pub fn out_edge_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].out_edges.len()
    }

    /// The `index`-th outgoing edge of `id`, in insertion order.
    pub fn out_edge(&self, id: NodeId, index: usize) -> Option<&Edge> {
        self.nodes[id.0]
            .out_edges
            .get(index)
            .map(|&e| &self.edges[e])
    }
}
