//! Multi-step form compilation.
//!
//! A multi step contains an ordered chain of form steps that all edit one
//! composite model. Compilation resolves each form step to its interactive
//! component and wires a navigation transition after every step; the
//! per-execution state (working copy, nested models, the step flows
//! themselves) is created fresh when the compiled flow receives its root
//! model, so one compiled flow can run any number of times.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::rc::Rc;

use tracing::debug;

use crate::component::{Displayer, FormComponent};
use crate::error::ExecutionError;
use crate::flow::{Command, Flow, FormOperation, Step, Value};
use crate::graph::{EdgeKind, EntityStep, FlowGraph, NodeContent, NodeId};
use crate::oracle::ModelOracle;

use super::compile_error::CompileError;
use super::flow_compiler::FlowCompiler;

impl FlowCompiler {
    /// Compiles a multi step's contained form-step chain into one flow over
    /// the shared composite model.
    pub(super) fn compile_multi_step(
        &self,
        graph: &FlowGraph,
        multi: NodeId,
    ) -> Result<Flow<Value, Value>, CompileError> {
        let ordered = self.form_step_sequence(graph, multi)?;

        let mut parts = Vec::with_capacity(ordered.len());
        for id in ordered {
            let NodeContent::FormStep(step) = graph.content(id) else {
                unreachable!("form_step_sequence only yields form steps");
            };
            if step.name.is_empty() {
                return Err(CompileError::MissingStepName("form step"));
            }
            parts.push((step.name.clone(), self.resolve_component(step)?));
        }

        if let Some((_, first)) = parts.first() {
            first.set_start();
        }
        if let Some((_, last)) = parts.last() {
            last.set_end();
        }
        debug!(steps = parts.len(), "compiled multi step");

        Ok(multi_step_flow(
            parts,
            Rc::clone(&self.displayer),
            Rc::clone(&self.model_oracle),
        ))
    }

    /// A root step containing a single form step compiles into that form
    /// alone: the step edits the root model directly and its command passes
    /// straight through.
    pub(super) fn single_form_step_flow(
        &self,
        step: &EntityStep,
    ) -> Result<Flow<Value, Value>, CompileError> {
        let component = self.resolve_component(step)?;
        component.set_start();
        component.set_end();
        Ok(form_step_flow(component, Rc::clone(&self.displayer)))
    }

    fn resolve_component(&self, step: &EntityStep) -> Result<Rc<dyn FormComponent>, CompileError> {
        let entity_type = match step.entity_type.as_deref() {
            Some(entity_type) if !entity_type.is_empty() => entity_type,
            _ => return Err(CompileError::MissingEntityType(step.name.clone())),
        };
        self.form_steps
            .resolve(entity_type)
            .ok_or_else(|| CompileError::UnresolvedFormStep(entity_type.to_string()))
    }

    /// The multi step's contained form steps in chain order. The children
    /// must all be form steps and must be linked by sequence edges into one
    /// unbranched chain covering every child.
    fn form_step_sequence(
        &self,
        graph: &FlowGraph,
        multi: NodeId,
    ) -> Result<Vec<NodeId>, CompileError> {
        let children: Vec<NodeId> = graph
            .out_edges(multi)
            .filter(|e| e.kind == EdgeKind::Containment)
            .map(|e| e.target)
            .collect();
        if children.is_empty() {
            return Err(CompileError::EmptyMultiStep);
        }
        for &child in &children {
            if !matches!(graph.content(child), NodeContent::FormStep(_)) {
                return Err(CompileError::UnexpectedNodeType(format!(
                    "{} contained by a multi step",
                    graph.content(child).kind()
                )));
            }
        }

        let members: HashSet<NodeId> = children.iter().copied().collect();
        let before = chain_from(graph, children[0], &members, false)?;
        let after = chain_from(graph, children[0], &members, true)?;

        let mut ordered: Vec<NodeId> = before.into_iter().rev().collect();
        ordered.push(children[0]);
        ordered.extend(after);
        if ordered.len() != children.len() {
            return Err(CompileError::MalformedBranching(
                "multi step form steps must form a single connected chain".into(),
            ));
        }
        Ok(ordered)
    }
}

/// Walks the sequence chain out of `start` in one direction, staying inside
/// `members`. Nearest node first.
fn chain_from(
    graph: &FlowGraph,
    start: NodeId,
    members: &HashSet<NodeId>,
    forward: bool,
) -> Result<Vec<NodeId>, CompileError> {
    let mut chain = Vec::new();
    let mut current = start;
    loop {
        let neighbors: Vec<NodeId> = if forward {
            graph
                .out_edges(current)
                .filter(|e| e.kind == EdgeKind::Sequence)
                .map(|e| e.target)
                .collect()
        } else {
            graph
                .in_edges(current)
                .filter(|e| e.kind == EdgeKind::Sequence)
                .map(|e| e.source)
                .collect()
        };
        if neighbors.len() > 1 {
            return Err(CompileError::MalformedBranching(
                "form step in a multi step has more than one sequence edge per direction".into(),
            ));
        }
        let Some(&next) = neighbors.first() else {
            return Ok(chain);
        };
        if !members.contains(&next) {
            return Err(CompileError::MalformedBranching(
                "sequence edge leaves the multi step's contained form steps".into(),
            ));
        }
        if chain.len() == members.len() {
            return Err(CompileError::MalformedBranching(
                "multi step form chain contains a cycle".into(),
            ));
        }
        chain.push(next);
        current = next;
    }
}

/// Builds the composed multi-step flow. All per-run state lives inside the
/// transition closure so every execution starts clean: a fresh working copy,
/// freshly memoized nested models, and fresh step flows.
fn multi_step_flow(
    parts: Vec<(String, Rc<dyn FormComponent>)>,
    displayer: Rc<dyn Displayer>,
    oracle: Rc<dyn ModelOracle>,
) -> Flow<Value, Value> {
    let parts = Rc::new(parts);
    Flow::from_transition(move |root: &Value| {
        let root = root.clone();
        let working = oracle.working_copy(&root);

        let models: Vec<Value> = parts
            .iter()
            .map(|(name, _)| match oracle.get_property(&working, name) {
                Some(model) => model,
                None => {
                    let model = oracle.create_nested_model(&working, name);
                    oracle.set_property(&working, name, model.clone());
                    model
                }
            })
            .collect();

        // The step flows reference each other through navigation, so they are
        // shared through a cell assigned once they all exist.
        let runs: Rc<OnceCell<Vec<Flow<Value, Value>>>> = Rc::new(OnceCell::new());
        let flows: Vec<Flow<Value, Value>> = parts
            .iter()
            .enumerate()
            .map(|(index, (_, component))| {
                let step = form_step_flow(Rc::clone(component), Rc::clone(&displayer));
                let transition = StepTransition {
                    index,
                    count: parts.len(),
                    runs: Rc::clone(&runs),
                    oracle: Rc::clone(&oracle),
                    root: root.clone(),
                    working: working.clone(),
                };
                Flow::constant(models[index].clone())
                    .and_then(&step)
                    .transition_to(move |output: &Value| transition.next_flow(output))
            })
            .collect();

        let first = flows[0].clone();
        let _ = runs.set(flows);
        first
    })
}

/// Presents one form step's component and completes with the user's command.
fn form_step_flow(component: Rc<dyn FormComponent>, displayer: Rc<dyn Displayer>) -> Flow<Value, Value> {
    Flow::from_step(Rc::new(DisplayedFormStep {
        component,
        displayer,
    }))
}

/// Interactive step that keeps its component visible while it awaits input.
struct DisplayedFormStep {
    component: Rc<dyn FormComponent>,
    displayer: Rc<dyn Displayer>,
}

impl Step<Value, Value> for DisplayedFormStep {
    fn name(&self) -> String {
        self.component.name().to_string()
    }

    fn execute(&self, input: Value, done: Box<dyn FnOnce(Value)>) {
        self.displayer.show(self.component.as_ref());
        let displayer = Rc::clone(&self.displayer);
        let component = Rc::clone(&self.component);
        self.component.start(
            input,
            Box::new(move |command| {
                displayer.hide(component.as_ref());
                done(Value::new(command));
            }),
        );
    }
}

/// Navigation after one form step of a run: routes the step's command to the
/// neighboring step, the untouched root on cancel, or the merged root on
/// submit.
struct StepTransition {
    index: usize,
    count: usize,
    runs: Rc<OnceCell<Vec<Flow<Value, Value>>>>,
    oracle: Rc<dyn ModelOracle>,
    root: Value,
    working: Value,
}

impl StepTransition {
    fn next_flow(&self, output: &Value) -> Flow<Value, Value> {
        let Some(command) = output.downcast_ref::<Command>() else {
            return Flow::fail(ExecutionError::ExpectedCommand);
        };
        let Some(op) = FormOperation::from_constant(&command.op) else {
            return Flow::fail(ExecutionError::UnrecognizedOperation(command.op.clone()));
        };
        match op {
            FormOperation::Cancel => self.finish(FormOperation::Cancel),
            FormOperation::Previous => {
                if self.index == 0 {
                    Flow::fail(ExecutionError::PreviousOnInitialStep)
                } else {
                    self.step_flow(self.index - 1)
                }
            }
            FormOperation::Next => {
                if self.index + 1 == self.count {
                    Flow::fail(ExecutionError::NextOnTerminalStep)
                } else {
                    self.step_flow(self.index + 1)
                }
            }
            FormOperation::Submit => {
                if self.index + 1 != self.count {
                    Flow::fail(ExecutionError::SubmitBeforeTerminalStep)
                } else {
                    self.oracle.merge_changes(&self.root, &self.working);
                    self.finish(FormOperation::Submit)
                }
            }
        }
    }

    fn step_flow(&self, index: usize) -> Flow<Value, Value> {
        self.runs
            .get()
            .expect("step flows are assigned before any step runs")[index]
            .clone()
    }

    /// The whole multi step completes with a command carrying the root model:
    /// untouched on cancel, merged on submit.
    fn finish(&self, op: FormOperation) -> Flow<Value, Value> {
        Flow::constant(Value::new(Command::new(op.constant(), self.root.clone())))
    }
}
