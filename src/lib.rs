//! formflow compiles visual process diagrams into executable flows.
//!
//! A designer produces a [`graph::FlowGraph`] of typed nodes; the
//! [`compiler::FlowCompiler`] walks it once and composes a single
//! [`flow::Flow`] in a small combinator algebra. Interactive form steps
//! suspend the flow until their component completes, decision gateways branch
//! on the operation of the incoming command, and an edge back to the start
//! node restarts the whole flow without growing the native stack.
//!
//! ```no_run
//! use std::rc::Rc;
//! use formflow::{
//!     execute, EnumRegistry, Flow, FlowCompiler, FlowGraph, FlowPartRegistry,
//!     NodeContent, EntityStep, Value,
//! };
//! # use formflow::{Displayer, FormComponent, FormStepResolver, ModelOracle};
//! # struct NoForms;
//! # impl FormStepResolver for NoForms {
//! #     fn resolve(&self, _: &str) -> Option<Rc<dyn FormComponent>> { None }
//! # }
//! # struct NoUi;
//! # impl Displayer for NoUi {
//! #     fn show(&self, _: &dyn FormComponent) {}
//! #     fn hide(&self, _: &dyn FormComponent) {}
//! # }
//! # struct NoModels;
//! # impl ModelOracle for NoModels {
//! #     fn working_copy(&self, model: &Value) -> Value { model.clone() }
//! #     fn get_property(&self, _: &Value, _: &str) -> Option<Value> { None }
//! #     fn create_nested_model(&self, _: &Value, _: &str) -> Value { Value::unit() }
//! #     fn set_property(&self, _: &Value, _: &str, _: Value) {}
//! #     fn merge_changes(&self, _: &Value, _: &Value) {}
//! # }
//!
//! let mut parts = FlowPartRegistry::new();
//! parts.insert(
//!     "double",
//!     Flow::from_function(|v: Value| {
//!         Value::new(v.downcast_ref::<i32>().copied().unwrap_or(0) * 2)
//!     }),
//! );
//!
//! let mut graph = FlowGraph::new();
//! let start = graph.add_node(NodeContent::Start);
//! let double = graph.add_node(NodeContent::DataStep(EntityStep::named("double")));
//! graph.sequence(start, double);
//!
//! let compiler = FlowCompiler::new(
//!     parts,
//!     Rc::new(NoForms),
//!     Rc::new(NoUi),
//!     Rc::new(NoModels),
//!     EnumRegistry::new(),
//! );
//! let flow = compiler.compile(&graph).unwrap();
//! execute(Value::new(21_i32), &flow, |result| {
//!     assert_eq!(result.unwrap().downcast_ref::<i32>(), Some(&42));
//! });
//! ```

pub mod compiler;
pub mod component;
pub mod error;
pub mod flow;
pub mod graph;
pub mod oracle;
pub mod registry;

pub use compiler::{CompileError, FlowCompiler};
pub use component::{Displayer, FormComponent, FormStepResolver};
pub use error::ExecutionError;
pub use flow::{execute, Command, EnumConstant, Flow, FlowCell, FormOperation, Step, Value};
pub use graph::{Edge, EdgeKind, EntityStep, FlowGraph, Matcher, NodeContent, NodeId};
pub use oracle::ModelOracle;
pub use registry::{EnumRegistry, EnumType, FlowPartRegistry};
