//! Host-provided registries the compiler resolves diagram names against.

use std::collections::HashMap;

use crate::flow::{EnumConstant, Flow, FormOperation, Value};

/// Named, prebuilt atomic computations referenced from diagrams by name.
/// Lookup is an exact string match; absence is fatal at the point of use.
#[derive(Default)]
pub struct FlowPartRegistry {
    parts: HashMap<String, Flow<Value, Value>>,
}

impl FlowPartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a part under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, flow: Flow<Value, Value>) -> &mut Self {
        self.parts.insert(key.into(), flow);
        self
    }

    pub fn lookup(&self, key: &str) -> Option<&Flow<Value, Value>> {
        self.parts.get(key)
    }
}

/// An enum type the compiler may resolve matcher steps against: a simple
/// type name plus its constant names.
#[derive(Clone, Debug)]
pub struct EnumType {
    name: String,
    constants: Vec<String>,
}

impl EnumType {
    pub fn new(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        EnumType {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves a constant of this type by name.
    pub fn constant(&self, name: &str) -> Option<EnumConstant> {
        self.constants
            .iter()
            .any(|c| c == name)
            .then(|| EnumConstant::new(self.name.clone(), name))
    }

    /// The built-in multi-step form operations as a registrable type.
    pub fn form_operations() -> Self {
        EnumType::new(
            FormOperation::TYPE_NAME,
            FormOperation::ALL.iter().map(|op| op.name()),
        )
    }
}

/// Enum types known to the compiler, keyed by simple type name.
#[derive(Default)]
pub struct EnumRegistry {
    types: HashMap<String, EnumType>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, ty: EnumType) -> &mut Self {
        self.types.insert(ty.name().to_string(), ty);
        self
    }

    pub fn lookup(&self, simple_name: &str) -> Option<&EnumType> {
        self.types.get(simple_name)
    }
}
