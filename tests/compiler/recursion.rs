//! Back-edges to the start node: flows that restart themselves.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use formflow::{Command, FlowGraph, FlowPartRegistry, NodeContent, Value};

use super::common::*;

/// start -> ask -> gateway; CREATE and UPDATE branches record a letter and
/// loop back to start, DELETE records and exits through the join.
fn looping_graph() -> FlowGraph {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let ask = graph.add_node(data("ask"));
    let gateway = graph.add_node(NodeContent::DecisionGateway);
    let create = graph.add_node(matcher("CREATE"));
    let update = graph.add_node(matcher("UPDATE"));
    let delete = graph.add_node(matcher("DELETE"));
    let a = graph.add_node(data("a"));
    let b = graph.add_node(data("b"));
    let c = graph.add_node(data("c"));
    let join = graph.add_node(NodeContent::JoinGateway);
    graph.sequence(start, ask).sequence(ask, gateway);
    graph.sequence(gateway, create).sequence(create, a).sequence(a, start);
    graph.sequence(gateway, update).sequence(update, b).sequence(b, start);
    graph.sequence(gateway, delete).sequence(delete, c).sequence(c, join);
    graph
}

fn scripted_parts(
    script: Vec<&'static str>,
    log: &Rc<RefCell<Vec<&'static str>>>,
) -> FlowPartRegistry {
    let queue = Rc::new(RefCell::new(VecDeque::from(script)));
    let mut parts = FlowPartRegistry::new();
    parts.insert(
        "ask",
        part_supplier(move || {
            let op = queue
                .borrow_mut()
                .pop_front()
                .expect("an operation is scripted for every pass");
            Command::new(crud(op), Value::unit())
        }),
    );
    for (key, letter) in [("a", "a"), ("b", "b"), ("c", "c")] {
        let log = Rc::clone(log);
        parts.insert(
            key,
            part_fn(move |_: &()| {
                log.borrow_mut().push(letter);
            }),
        );
    }
    parts
}

/// **Scenario**: each looping branch restarts the whole flow; every pass asks
/// again until the exit branch runs.
#[test]
fn back_edges_restart_the_flow() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let parts = scripted_parts(vec!["CREATE", "UPDATE", "DELETE"], &log);

    let graph = looping_graph();
    let flow = compiler(parts, MapResolver::new()).compile(&graph).unwrap();
    run_ok(Value::unit(), &flow);

    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
}

/// **Scenario**: tens of thousands of restarts complete without growing the
/// native stack per pass.
#[test]
fn deep_recursion_runs_in_constant_stack() {
    let mut script = vec!["CREATE"; 50_000];
    script.push("DELETE");
    let log = Rc::new(RefCell::new(Vec::new()));
    let parts = scripted_parts(script, &log);

    let graph = looping_graph();
    let flow = compiler(parts, MapResolver::new()).compile(&graph).unwrap();
    run_ok(Value::unit(), &flow);

    assert_eq!(log.borrow().len(), 50_001);
}
