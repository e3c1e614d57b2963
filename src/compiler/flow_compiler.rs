//! Graph-to-flow compiler: single-pass traversal of a designer diagram.
//!
//! Walks the sequence relation from the start node, dispatching on node
//! content and composing one flow on a stack of in-progress branch
//! accumulators. Decision gateways suspend the main walk per branch (see
//! `decision`), multi steps compile their contained forms (see `multi_step`),
//! and a back-edge to the start node closes the branch with a lazy reference
//! to the finished top-level flow.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::component::{Displayer, FormStepResolver};
use crate::flow::{Flow, FlowCell, Value};
use crate::graph::{EdgeKind, EntityStep, FlowGraph, NodeContent, NodeId};
use crate::oracle::ModelOracle;
use crate::registry::{EnumRegistry, FlowPartRegistry};

use super::compile_error::CompileError;
use super::decision::DecisionFrame;

/// Compiles designer diagrams into executable flows.
///
/// Holds the host collaborators every diagram name is resolved against: flow
/// parts, form components, the displayer, the model oracle, and the enum
/// types matchers may reference.
pub struct FlowCompiler {
    pub(super) flow_parts: FlowPartRegistry,
    pub(super) form_steps: Rc<dyn FormStepResolver>,
    pub(super) displayer: Rc<dyn Displayer>,
    pub(super) model_oracle: Rc<dyn ModelOracle>,
    pub(super) enums: EnumRegistry,
}

impl FlowCompiler {
    pub fn new(
        flow_parts: FlowPartRegistry,
        form_steps: Rc<dyn FormStepResolver>,
        displayer: Rc<dyn Displayer>,
        model_oracle: Rc<dyn ModelOracle>,
        enums: EnumRegistry,
    ) -> Self {
        FlowCompiler {
            flow_parts,
            form_steps,
            displayer,
            model_oracle,
            enums,
        }
    }

    /// Compiles `graph` into a single composed flow, or fails on the first
    /// structural invariant violation. Never returns a partial flow.
    pub fn compile(&self, graph: &FlowGraph) -> Result<Flow<Value, Value>, CompileError> {
        let starts: Vec<NodeId> = graph
            .nodes()
            .filter(|id| matches!(graph.content(*id), NodeContent::Start))
            .collect();
        if starts.len() != 1 {
            return Err(CompileError::MultipleOrMissingStart(starts.len()));
        }
        debug!(nodes = graph.node_count(), "compiling flow graph");

        let anchor: FlowCell<Value, Value> = FlowCell::new();
        let mut flows: Vec<Flow<Value, Value>> = vec![Flow::identity()];
        let mut decisions: Vec<DecisionFrame> = Vec::new();
        let mut current = self.single_sequence_successor(graph, starts[0])?;

        while let Some(node) = current {
            trace!(kind = graph.content(node).kind(), "visiting node");
            current = match graph.content(node) {
                NodeContent::RootStep(step) => {
                    self.process_root_step(graph, node, step, &mut flows)?
                }
                NodeContent::DataStep(step) => {
                    self.process_flow_part(graph, node, step, &mut flows)?
                }
                NodeContent::DecisionGateway => {
                    self.process_decision_gateway(graph, node, &mut flows, &mut decisions)?
                }
                NodeContent::JoinGateway => {
                    self.resolve_top_decision(graph, Some(node), &mut flows, &mut decisions)?
                }
                NodeContent::Start => {
                    // The single start was already consumed, so this is a
                    // back-edge: close the branch with a lazy restart of the
                    // eventual top-level flow.
                    let branch = flows.pop().expect("flow stack holds an open branch");
                    flows.push(branch.and_then(&anchor.flow()));
                    None
                }
                NodeContent::MatcherStep(_) => {
                    return Err(CompileError::UnexpectedNodeType(
                        "matcher step must have a single inbound edge from a decision gateway"
                            .into(),
                    ))
                }
                NodeContent::FormStep(_) => {
                    return Err(CompileError::UnexpectedNodeType(
                        "form step must be contained by a root step or multi step, \
                         not sequenced directly"
                            .into(),
                    ))
                }
                NodeContent::MultiStep => {
                    return Err(CompileError::UnexpectedNodeType(
                        "multi step must be contained by a root step".into(),
                    ))
                }
            };

            // A dead end inside a decision that never joins still has to
            // resolve the enclosing gateways.
            while current.is_none() && !decisions.is_empty() {
                current = self.resolve_top_decision(graph, None, &mut flows, &mut decisions)?;
            }
        }

        let flow = flows.pop().expect("exactly one composed flow remains");
        anchor.set(&flow);
        debug!("flow graph compiled");
        Ok(flow)
    }

    fn process_root_step(
        &self,
        graph: &FlowGraph,
        node: NodeId,
        step: &EntityStep,
        flows: &mut Vec<Flow<Value, Value>>,
    ) -> Result<Option<NodeId>, CompileError> {
        let part = self.lookup_flow_part(&part_key(step, "root step")?)?;
        append(flows, part);

        if let Some(child) = self.single_containment_child(graph, node)? {
            match graph.content(child) {
                NodeContent::MultiStep => {
                    let multi = self.compile_multi_step(graph, child)?;
                    append(flows, &multi);
                }
                NodeContent::FormStep(form) => {
                    let single = self.single_form_step_flow(form)?;
                    append(flows, &single);
                }
                other => {
                    return Err(CompileError::UnexpectedNodeType(format!(
                        "{} contained by a root step",
                        other.kind()
                    )))
                }
            }
        }

        self.single_sequence_successor(graph, node)
    }

    fn process_flow_part(
        &self,
        graph: &FlowGraph,
        node: NodeId,
        step: &EntityStep,
        flows: &mut Vec<Flow<Value, Value>>,
    ) -> Result<Option<NodeId>, CompileError> {
        let part = self.lookup_flow_part(&part_key(step, "data step")?)?;
        append(flows, part);
        self.single_sequence_successor(graph, node)
    }

    fn lookup_flow_part(&self, key: &str) -> Result<&Flow<Value, Value>, CompileError> {
        self.flow_parts
            .lookup(key)
            .ok_or_else(|| CompileError::MissingFlowPart(key.to_string()))
    }

    /// The node's sequence successor, if any. More than one outgoing
    /// sequence edge is only legal on decision gateways, which never come
    /// through here.
    pub(super) fn single_sequence_successor(
        &self,
        graph: &FlowGraph,
        node: NodeId,
    ) -> Result<Option<NodeId>, CompileError> {
        let mut targets = graph
            .out_edges(node)
            .filter(|e| e.kind == EdgeKind::Sequence)
            .map(|e| e.target);
        let first = targets.next();
        if targets.next().is_some() {
            return Err(CompileError::MalformedBranching(format!(
                "expected {} to have at most one outbound sequence edge",
                graph.content(node).kind()
            )));
        }
        Ok(first)
    }

    fn single_containment_child(
        &self,
        graph: &FlowGraph,
        node: NodeId,
    ) -> Result<Option<NodeId>, CompileError> {
        let mut children = graph
            .out_edges(node)
            .filter(|e| e.kind == EdgeKind::Containment)
            .map(|e| e.target);
        let first = children.next();
        if children.next().is_some() {
            return Err(CompileError::MalformedBranching(format!(
                "expected {} to have at most one contained child",
                graph.content(node).kind()
            )));
        }
        Ok(first)
    }
}

/// Sequences `next` onto the flow on top of the stack.
pub(super) fn append(flows: &mut Vec<Flow<Value, Value>>, next: &Flow<Value, Value>) {
    let current = flows
        .pop()
        .expect("flow stack is never empty while traversing");
    flows.push(current.and_then(next));
}

/// The flow-part lookup key: `name`, or `name:entityType` when the type is
/// present and non-empty. A missing name is fatal.
pub(super) fn part_key(step: &EntityStep, kind: &'static str) -> Result<String, CompileError> {
    if step.name.is_empty() {
        return Err(CompileError::MissingStepName(kind));
    }
    match step.entity_type.as_deref() {
        Some(entity_type) if !entity_type.is_empty() => {
            Ok(format!("{}:{}", step.name, entity_type))
        }
        _ => Ok(step.name.clone()),
    }
}
