//! Decision/join resolution: the stack machine behind nested gateways.
//!
//! Visiting a decision gateway opens a frame and starts its first branch on a
//! fresh accumulator. Reaching a join gateway, or dead-ending inside a
//! branch, advances the innermost frame: either the next branch is entered or
//! the gateway is folded into a single runtime-branching flow.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ExecutionError;
use crate::flow::{Command, EnumConstant, Flow, Value};
use crate::graph::{FlowGraph, Matcher, NodeContent, NodeId};

use super::compile_error::CompileError;
use super::flow_compiler::{append, FlowCompiler};

/// In-progress traversal of one decision gateway's branches.
pub(super) struct DecisionFrame {
    node: NodeId,
    branch_index: usize,
}

impl FlowCompiler {
    pub(super) fn process_decision_gateway(
        &self,
        graph: &FlowGraph,
        node: NodeId,
        flows: &mut Vec<Flow<Value, Value>>,
        decisions: &mut Vec<DecisionFrame>,
    ) -> Result<Option<NodeId>, CompileError> {
        if graph.out_edge_count(node) == 0 {
            return Err(CompileError::MalformedBranching(
                "decision gateway has no outbound edges".into(),
            ));
        }
        decisions.push(DecisionFrame {
            node,
            branch_index: 0,
        });
        self.enter_branch(graph, node, 0, flows)
    }

    /// Validates the indexed branch edge, opens a fresh accumulator for it,
    /// and resumes traversal at the matcher's sequence successor.
    fn enter_branch(
        &self,
        graph: &FlowGraph,
        gateway: NodeId,
        index: usize,
        flows: &mut Vec<Flow<Value, Value>>,
    ) -> Result<Option<NodeId>, CompileError> {
        let matcher = self.matcher_target(graph, gateway, index)?;
        flows.push(Flow::identity());
        self.single_sequence_successor(graph, matcher)
    }

    /// Advances the innermost open gateway. Returns the node traversal
    /// resumes at: the next branch's entry, the join's successor once the
    /// gateway is folded, or `None` when the path ends there.
    pub(super) fn resolve_top_decision(
        &self,
        graph: &FlowGraph,
        join: Option<NodeId>,
        flows: &mut Vec<Flow<Value, Value>>,
        decisions: &mut Vec<DecisionFrame>,
    ) -> Result<Option<NodeId>, CompileError> {
        let Some(frame) = decisions.last_mut() else {
            return Err(CompileError::MalformedBranching(
                "join gateway reached with no open decision gateway".into(),
            ));
        };
        frame.branch_index += 1;
        let (gateway, index) = (frame.node, frame.branch_index);

        if index < graph.out_edge_count(gateway) {
            return self.enter_branch(graph, gateway, index, flows);
        }

        decisions.pop();
        let mapped = self.branch_flows_by_operation(graph, gateway, flows)?;
        debug!(branches = mapped.len(), "resolved decision gateway");
        append(flows, &decision_flow(mapped));

        match join {
            Some(join) => self.single_sequence_successor(graph, join),
            None => Ok(None),
        }
    }

    /// Builds the operation-to-flow mapping for a fully traversed gateway.
    /// Branch flows are popped from the highest edge index down to 0 so pop
    /// order matches edge declaration order.
    fn branch_flows_by_operation(
        &self,
        graph: &FlowGraph,
        gateway: NodeId,
        flows: &mut Vec<Flow<Value, Value>>,
    ) -> Result<HashMap<EnumConstant, Flow<Value, Value>>, CompileError> {
        let count = graph.out_edge_count(gateway);
        let mut mapped = HashMap::with_capacity(count);
        for index in (0..count).rev() {
            let matcher = self.matcher_content(graph, gateway, index)?;
            let branch = flows.pop().expect("one branch flow per gateway edge");
            let op = self.enum_constant(matcher)?;
            if mapped.insert(op.clone(), branch).is_some() {
                return Err(CompileError::DuplicateMatcherMapping(op));
            }
        }
        Ok(mapped)
    }

    fn matcher_target(
        &self,
        graph: &FlowGraph,
        gateway: NodeId,
        index: usize,
    ) -> Result<NodeId, CompileError> {
        let edge = graph
            .out_edge(gateway, index)
            .expect("branch index stays within the gateway's out edges");
        match graph.content(edge.target) {
            NodeContent::MatcherStep(_) => Ok(edge.target),
            other => Err(CompileError::MalformedBranching(format!(
                "decision gateway must be immediately followed by matcher steps but found {}",
                other.kind()
            ))),
        }
    }

    fn matcher_content<'g>(
        &self,
        graph: &'g FlowGraph,
        gateway: NodeId,
        index: usize,
    ) -> Result<&'g Matcher, CompileError> {
        let edge = graph
            .out_edge(gateway, index)
            .expect("branch index stays within the gateway's out edges");
        match graph.content(edge.target) {
            NodeContent::MatcherStep(matcher) => Ok(matcher),
            other => Err(CompileError::MalformedBranching(format!(
                "decision gateway must be immediately followed by matcher steps but found {}",
                other.kind()
            ))),
        }
    }

    /// Resolves a matcher's recorded type and constant names through the
    /// enum registry.
    fn enum_constant(&self, matcher: &Matcher) -> Result<EnumConstant, CompileError> {
        let ty = self
            .enums
            .lookup(&matcher.enum_type)
            .ok_or_else(|| CompileError::UnrecognizedEnumType(matcher.enum_type.clone()))?;
        ty.constant(&matcher.operation)
            .ok_or_else(|| CompileError::UnresolvedEnumConstant {
                enum_type: matcher.enum_type.clone(),
                constant: matcher.operation.clone(),
            })
    }
}

/// Runtime branch selection: routes an incoming command to the branch mapped
/// to its operation, seeded with the command's value. Unmapped operations
/// and non-command inputs fail that execution.
fn decision_flow(mapped: HashMap<EnumConstant, Flow<Value, Value>>) -> Flow<Value, Value> {
    Flow::from_transition(move |input: &Value| {
        let Some(command) = input.downcast_ref::<Command>() else {
            return Flow::fail(ExecutionError::ExpectedCommand);
        };
        match mapped.get(&command.op) {
            Some(branch) => Flow::constant(command.value.clone()).and_then(branch),
            None => Flow::fail(ExecutionError::UnmappedOperation(command.op.clone())),
        }
    })
}
