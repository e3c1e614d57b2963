//! Straight-line diagrams: start, data steps, root steps without children.

use formflow::{FlowGraph, FlowPartRegistry, NodeContent, Value};

use super::common::*;

/// **Scenario**: a chain of data steps composes their parts in diagram order.
#[test]
fn data_step_chain_composes_in_order() {
    let mut parts = FlowPartRegistry::new();
    parts.insert("double", part_fn(|n: &i32| n * 2));
    parts.insert("text", part_fn(|n: &i32| n.to_string()));

    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let double = graph.add_node(data("double"));
    let text = graph.add_node(data("text"));
    graph.sequence(start, double).sequence(double, text);

    let flow = compiler(parts, MapResolver::new()).compile(&graph).unwrap();
    let out = run_ok(Value::new(1_i32), &flow);
    assert_eq!(out.downcast_ref::<String>().unwrap(), "2");
}

/// **Scenario**: a data step with an entity type looks its part up under the
/// `name:entityType` key.
#[test]
fn typed_data_step_uses_composite_key() {
    let mut parts = FlowPartRegistry::new();
    parts.insert("double:Integer", part_fn(|n: &i32| n * 2));

    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let double = graph.add_node(NodeContent::DataStep(
        formflow::EntityStep::typed("double", "Integer"),
    ));
    graph.sequence(start, double);

    let flow = compiler(parts, MapResolver::new()).compile(&graph).unwrap();
    let out = run_ok(Value::new(21_i32), &flow);
    assert_eq!(out.downcast_ref::<i32>(), Some(&42));
}

/// **Scenario**: a start node with no successor compiles to the identity flow.
#[test]
fn lone_start_compiles_to_identity() {
    let mut graph = FlowGraph::new();
    graph.add_node(NodeContent::Start);

    let flow = compiler(FlowPartRegistry::new(), MapResolver::new())
        .compile(&graph)
        .unwrap();
    let out = run_ok(Value::new("untouched".to_string()), &flow);
    assert_eq!(out.downcast_ref::<String>().unwrap(), "untouched");
}

/// **Scenario**: a root step with no contained child contributes only its
/// flow part and the chain continues past it.
#[test]
fn root_step_without_child_is_just_its_part() {
    let mut parts = FlowPartRegistry::new();
    parts.insert(
        "person",
        part_supplier(|| {
            let record = Record::new();
            record.set("kind", Value::new("person".to_string()));
            record
        }),
    );
    parts.insert("kind", part_fn(|r: &Record| r.text("kind").unwrap()));

    let mut graph = FlowGraph::new();
    let start = graph.add_node(NodeContent::Start);
    let person = graph.add_node(root("person"));
    let kind = graph.add_node(data("kind"));
    graph.sequence(start, person).sequence(person, kind);

    let flow = compiler(parts, MapResolver::new()).compile(&graph).unwrap();
    let out = run_ok(Value::unit(), &flow);
    assert_eq!(out.downcast_ref::<String>().unwrap(), "person");
}
