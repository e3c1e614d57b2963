//! Structural compile errors: every malformed diagram fails with the
//! matching CompileError and never yields a partial flow.

use formflow::{
    CompileError, EntityStep, FlowCompiler, FlowGraph, FlowPartRegistry, NodeContent,
};

use super::common::*;

fn bare_compiler() -> FlowCompiler {
    compiler(letter_parts(), MapResolver::new())
}

fn letter_parts() -> FlowPartRegistry {
    let mut parts = FlowPartRegistry::new();
    for key in ["a", "b", "person"] {
        parts.insert(key, part_const(key.to_string()));
    }
    parts
}

fn compile_err(graph: &FlowGraph) -> CompileError {
    bare_compiler().compile(graph).unwrap_err()
}

/// **Scenario**: zero or several start nodes both fail, reporting the count.
#[test]
fn start_node_must_be_unique() {
    let graph = FlowGraph::new();
    assert!(matches!(
        compile_err(&graph),
        CompileError::MultipleOrMissingStart(0)
    ));

    let mut graph = FlowGraph::new();
    graph.add_node(NodeContent::Start);
    graph.add_node(NodeContent::Start);
    assert!(matches!(
        compile_err(&graph),
        CompileError::MultipleOrMissingStart(2)
    ));
}

/// **Scenario**: a decision gateway followed by anything but matcher steps.
#[test]
fn decision_target_must_be_a_matcher() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let gateway = graph.add_node(NodeContent::DecisionGateway);
    let a = graph.add_node(data("a"));
    graph.sequence(start, gateway).sequence(gateway, a);

    let err = compile_err(&graph);
    assert!(matches!(err, CompileError::MalformedBranching(_)), "{err}");
    assert!(err.to_string().contains("matcher"), "{err}");
}

/// **Scenario**: a decision gateway with no outbound edges.
#[test]
fn decision_gateway_needs_branches() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let gateway = graph.add_node(NodeContent::DecisionGateway);
    graph.sequence(start, gateway);
    assert!(matches!(
        compile_err(&graph),
        CompileError::MalformedBranching(_)
    ));
}

/// **Scenario**: two matchers under one gateway resolving to one operation.
#[test]
fn duplicate_matcher_mapping_is_rejected() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let gateway = graph.add_node(NodeContent::DecisionGateway);
    let first = graph.add_node(matcher("CREATE"));
    let second = graph.add_node(matcher("CREATE"));
    let a = graph.add_node(data("a"));
    let b = graph.add_node(data("b"));
    graph.sequence(start, gateway);
    graph.sequence(gateway, first).sequence(first, a);
    graph.sequence(gateway, second).sequence(second, b);

    match compile_err(&graph) {
        CompileError::DuplicateMatcherMapping(op) => assert_eq!(op, crud("CREATE")),
        other => panic!("unexpected error: {other}"),
    }
}

/// **Scenario**: a matcher naming an unregistered enum type, and one naming a
/// missing constant of a known type.
#[test]
fn matcher_enum_resolution_failures() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let gateway = graph.add_node(NodeContent::DecisionGateway);
    let bad = graph.add_node(NodeContent::MatcherStep(formflow::Matcher::new(
        "CREATE",
        "GhostOperation",
    )));
    let a = graph.add_node(data("a"));
    graph.sequence(start, gateway);
    graph.sequence(gateway, bad).sequence(bad, a);
    match compile_err(&graph) {
        CompileError::UnrecognizedEnumType(name) => assert_eq!(name, "GhostOperation"),
        other => panic!("unexpected error: {other}"),
    }

    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let gateway = graph.add_node(NodeContent::DecisionGateway);
    let bad = graph.add_node(matcher("ARCHIVE"));
    let a = graph.add_node(data("a"));
    graph.sequence(start, gateway);
    graph.sequence(gateway, bad).sequence(bad, a);
    match compile_err(&graph) {
        CompileError::UnresolvedEnumConstant { enum_type, constant } => {
            assert_eq!(enum_type, "CrudOperation");
            assert_eq!(constant, "ARCHIVE");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// **Scenario**: a join gateway with no decision gateway open.
#[test]
fn join_without_open_decision_is_rejected() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let join = graph.add_node(NodeContent::JoinGateway);
    graph.sequence(start, join);
    let err = compile_err(&graph);
    assert!(err.to_string().contains("no open decision"), "{err}");
}

/// **Scenario**: node kinds the sequence walk cannot legally reach.
#[test]
fn misplaced_node_kinds_are_rejected() {
    for content in [
        form("name", "NameForm"),
        matcher("CREATE"),
        NodeContent::MultiStep,
    ] {
        let mut graph = FlowGraph::new();
        let start = graph.add_node(NodeContent::Start);
        let node = graph.add_node(content);
        graph.sequence(start, node);
        assert!(matches!(
            compile_err(&graph),
            CompileError::UnexpectedNodeType(_)
        ));
    }
}

/// **Scenario**: steps without names cannot form lookup keys.
#[test]
fn nameless_steps_are_rejected() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let anon = graph.add_node(NodeContent::DataStep(EntityStep::named("")));
    graph.sequence(start, anon);
    assert!(matches!(
        compile_err(&graph),
        CompileError::MissingStepName("data step")
    ));

    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let person = graph.add_node(root("person"));
    let multi = graph.add_node(NodeContent::MultiStep);
    let anon = graph.add_node(form("", "NameForm"));
    graph.sequence(start, person);
    graph.containment(person, multi);
    graph.containment(multi, anon);
    let err = compiler(
        letter_parts(),
        MapResolver::new().with("NameForm", ScriptedComponent::new("NameForm")),
    )
    .compile(&graph)
    .unwrap_err();
    assert!(matches!(err, CompileError::MissingStepName("form step")));
}

/// **Scenario**: a step whose lookup key has no registered flow part.
#[test]
fn unregistered_flow_part_is_rejected() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let ghost = graph.add_node(data("ghost"));
    graph.sequence(start, ghost);
    match compile_err(&graph) {
        CompileError::MissingFlowPart(key) => assert_eq!(key, "ghost"),
        other => panic!("unexpected error: {other}"),
    }
}

/// **Scenario**: form steps need an entity type, and the type must resolve
/// to a component.
#[test]
fn form_step_resolution_failures() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let person = graph.add_node(root("person"));
    let untyped = graph.add_node(NodeContent::FormStep(EntityStep::named("name")));
    graph.sequence(start, person);
    graph.containment(person, untyped);
    match compile_err(&graph) {
        CompileError::MissingEntityType(name) => assert_eq!(name, "name"),
        other => panic!("unexpected error: {other}"),
    }

    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let person = graph.add_node(root("person"));
    let ghost = graph.add_node(form("name", "GhostForm"));
    graph.sequence(start, person);
    graph.containment(person, ghost);
    match compile_err(&graph) {
        CompileError::UnresolvedFormStep(entity_type) => assert_eq!(entity_type, "GhostForm"),
        other => panic!("unexpected error: {other}"),
    }
}

/// **Scenario**: a root step containing something that is neither a form
/// step nor a multi step.
#[test]
fn root_step_child_must_be_form_or_multi() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let person = graph.add_node(root("person"));
    let stray = graph.add_node(data("a"));
    graph.sequence(start, person);
    graph.containment(person, stray);
    assert!(matches!(
        compile_err(&graph),
        CompileError::UnexpectedNodeType(_)
    ));
}

fn multi_graph() -> (FlowGraph, formflow::NodeId) {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let person = graph.add_node(root("person"));
    let multi = graph.add_node(NodeContent::MultiStep);
    graph.sequence(start, person);
    graph.containment(person, multi);
    (graph, multi)
}

fn forms() -> MapResolver {
    MapResolver::new()
        .with("NameForm", ScriptedComponent::new("NameForm"))
        .with("AddressForm", ScriptedComponent::new("AddressForm"))
}

/// **Scenario**: a multi step with no contained form steps.
#[test]
fn empty_multi_step_is_rejected() {
    let (graph, _) = multi_graph();
    let err = compiler(letter_parts(), forms()).compile(&graph).unwrap_err();
    assert!(matches!(err, CompileError::EmptyMultiStep));
}

/// **Scenario**: a multi step containing a non-form node.
#[test]
fn multi_step_child_must_be_a_form_step() {
    let (mut graph, multi) = multi_graph();
    let stray = graph.add_node(data("a"));
    graph.containment(multi, stray);
    let err = compiler(letter_parts(), forms()).compile(&graph).unwrap_err();
    assert!(matches!(err, CompileError::UnexpectedNodeType(_)));
}

/// **Scenario**: contained form steps split into two disconnected chains.
#[test]
fn disconnected_form_chain_is_rejected() {
    let (mut graph, multi) = multi_graph();
    let a = graph.add_node(form("a", "NameForm"));
    let b = graph.add_node(form("b", "AddressForm"));
    let c = graph.add_node(form("c", "NameForm"));
    graph.containment(multi, a);
    graph.containment(multi, b);
    graph.containment(multi, c);
    graph.sequence(a, b);

    let err = compiler(letter_parts(), forms()).compile(&graph).unwrap_err();
    assert!(err.to_string().contains("single connected chain"), "{err}");
}

/// **Scenario**: a form step branching into two chain successors.
#[test]
fn branching_form_chain_is_rejected() {
    let (mut graph, multi) = multi_graph();
    let a = graph.add_node(form("a", "NameForm"));
    let b = graph.add_node(form("b", "AddressForm"));
    let c = graph.add_node(form("c", "NameForm"));
    graph.containment(multi, a);
    graph.containment(multi, b);
    graph.containment(multi, c);
    graph.sequence(a, b);
    graph.sequence(a, c);

    let err = compiler(letter_parts(), forms()).compile(&graph).unwrap_err();
    assert!(matches!(err, CompileError::MalformedBranching(_)));
}

/// **Scenario**: a chain edge pointing outside the multi step's children.
#[test]
fn chain_edge_leaving_the_multi_step_is_rejected() {
    let (mut graph, multi) = multi_graph();
    let a = graph.add_node(form("a", "NameForm"));
    let outside = graph.add_node(data("b"));
    graph.containment(multi, a);
    graph.sequence(a, outside);

    let err = compiler(letter_parts(), forms()).compile(&graph).unwrap_err();
    assert!(err.to_string().contains("leaves the multi step"), "{err}");
}

/// **Scenario**: form steps linked into a cycle.
#[test]
fn cyclic_form_chain_is_rejected() {
    let (mut graph, multi) = multi_graph();
    let a = graph.add_node(form("a", "NameForm"));
    let b = graph.add_node(form("b", "AddressForm"));
    graph.containment(multi, a);
    graph.containment(multi, b);
    graph.sequence(a, b);
    graph.sequence(b, a);

    let err = compiler(letter_parts(), forms()).compile(&graph).unwrap_err();
    assert!(matches!(err, CompileError::MalformedBranching(_)));
}

/// **Scenario**: a data step with two outbound sequence edges.
#[test]
fn stray_branching_outside_a_gateway_is_rejected() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let a = graph.add_node(data("a"));
    let b = graph.add_node(data("b"));
    let person = graph.add_node(data("person"));
    graph.sequence(start, a);
    graph.sequence(a, b);
    graph.sequence(a, person);
    assert!(matches!(
        compile_err(&graph),
        CompileError::MalformedBranching(_)
    ));
}
