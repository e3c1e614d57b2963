//! Model oracle: external handling of composite form models.

use crate::flow::Value;

/// Abstracts nested-model creation, property access, and merge-back for the
/// composite models edited by multi-step forms. The compiler never inspects
/// model internals; every access goes through the oracle.
pub trait ModelOracle {
    /// A working copy of `model` that edits can be made against without
    /// touching the original until merge.
    fn working_copy(&self, model: &Value) -> Value;

    /// The nested value bound to `name`, if present.
    fn get_property(&self, model: &Value, name: &str) -> Option<Value>;

    /// A fresh nested model suitable for the property `name`.
    fn create_nested_model(&self, model: &Value, name: &str) -> Value;

    fn set_property(&self, model: &Value, name: &str, value: Value);

    /// Applies everything recorded on `working` back onto `original`.
    fn merge_changes(&self, original: &Value, working: &Value);
}
