//! Compilation of designer diagrams into executable flows.

mod compile_error;
mod decision;
mod flow_compiler;
mod multi_step;

pub use compile_error::CompileError;
pub use flow_compiler::FlowCompiler;
